//! Domain models for the MB Bank MCP server
//!
//! Two families of types live here:
//! - `Raw*` structs mirror the entries returned by the banking gateway
//!   (camelCase upstream keys, deserialize only)
//! - Summary/record structs are the public tool response shapes
//!   (re-keyed, serialize only)
//!
//! Top-level response objects keep any upstream sibling fields they do not
//! reshape in a flattened `extra` map.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// =============================================================================
// Tool argument enumerations
// =============================================================================

/// Savings account kind accepted by the savings detail lookup
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema,
)]
pub enum SavingAccountType {
    /// Online Savings Account
    #[serde(rename = "OSA")]
    Online,
    /// Saving Bank Account (term deposit)
    #[serde(rename = "SBA")]
    Term,
}

impl SavingAccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "OSA",
            Self::Term => "SBA",
        }
    }
}

impl std::str::FromStr for SavingAccountType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "OSA" | "ONLINE" => Ok(Self::Online),
            "SBA" | "TERM" => Ok(Self::Term),
            _ => Err(format!("Unknown savings account type: {}", s)),
        }
    }
}

impl std::fmt::Display for SavingAccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Currencies with published savings interest rates
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum RateCurrency {
    Vnd,
    Usd,
    Eur,
}

impl RateCurrency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vnd => "VND",
            Self::Usd => "USD",
            Self::Eur => "EUR",
        }
    }
}

impl std::str::FromStr for RateCurrency {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "VND" => Ok(Self::Vnd),
            "USD" => Ok(Self::Usd),
            "EUR" => Ok(Self::Eur),
            _ => Err(format!("Unsupported currency: {}", s)),
        }
    }
}

impl std::fmt::Display for RateCurrency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Raw gateway entries
// =============================================================================

/// Account entry from the balance query
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAccount {
    pub acct_no: String,
    pub acct_alias: String,
    pub ccy_cd: String,
    pub current_balance: String,
}

/// Ledger entry from the account history query
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTransaction {
    pub transaction_date: String,
    pub ref_no: String,
    pub description: String,
    pub credit_amount: String,
    pub debit_amount: String,
    pub currency: String,
    #[serde(default)]
    pub ben_account_no: Option<String>,
    #[serde(default)]
    pub ben_account_name: Option<String>,
    #[serde(default)]
    pub bank_name: Option<String>,
}

/// Ledger entry from the card history query
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCardTransaction {
    pub transaction_date: String,
    pub description: String,
    pub credit_amount: String,
    pub debit_amount: String,
    pub currency: String,
}

/// Card entry from any of the card list buckets
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCard {
    pub card_no: String,
    pub card_number: String,
    pub embossed_name: String,
    pub card_class_detail: String,
    pub card_cat_cd: String,
    pub valid_through: String,
    pub card_status_detail: String,
}

/// Savings entry from the savings list query
///
/// Amounts, dates and flags are passed through untouched, so they stay as
/// JSON values whatever type the gateway uses for them.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSaving {
    pub account_number: String,
    pub account_name: Value,
    pub currency: Value,
    pub principal_amount: Value,
    pub accrued_interest_amount: Value,
    pub open_date: Value,
    pub maturity_date: Value,
    pub is_send_more: Value,
    pub rate: Value,
    pub nominated_account: Value,
}

/// `detailSaving` object from the savings detail query
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSavingDetail {
    pub savings_account_no: String,
    pub product_name: Value,
    pub principal_amount: Value,
    pub accrued_interest_amount: Value,
    pub total_maturity_amount: Value,
    pub currency: Value,
    pub start_date: Value,
    pub maturity_date: Value,
    pub interest_payment_type: Value,
    pub maturity_instructions: Value,
    pub interest_rate: Value,
    pub beneficiary_account: Value,
}

// =============================================================================
// Normalized entries
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    pub account_number: String,
    pub account_name: String,
    pub currency: String,
    /// Decimal string exactly as reported upstream
    pub balance: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferTarget {
    pub account_number: String,
    pub account_name: String,
    pub bank_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub transaction_date: String,
    pub transaction_id: String,
    pub description: String,
    /// "+credit" or "-debit"
    pub amount: String,
    pub currency: String,
    /// Serialized as `null` when the entry has no counterparty
    pub transferred_to: Option<TransferTarget>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardTransactionRecord {
    pub transaction_date: String,
    pub description: String,
    pub amount: String,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardSummary {
    pub card_id: String,
    pub card_number: String,
    pub card_name: String,
    pub card_class_detail: String,
    pub card_type: String,
    /// MM/YY
    pub valid_through: String,
    pub card_status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsSummary {
    pub account_number: String,
    pub account_name: Value,
    pub currency: Value,
    pub principal_amount: Value,
    pub accrued_interest_amount: Value,
    pub open_date: Value,
    pub maturity_date: Value,
    pub is_add_more_able: Value,
    pub rate_percent_per_year: Value,
    pub beneficiary_account: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsDetail {
    pub account_number: String,
    pub product_name: Value,
    pub principal_amount: Value,
    pub accrued_interest_amount: Value,
    pub total_maturity_amount: Value,
    pub currency: Value,
    pub start_date: Value,
    pub maturity_date: Value,
    pub interest_payment_type: Value,
    pub maturity_instructions: Value,
    pub rate_percent_per_year: Value,
    pub beneficiary_account: Value,
}

// =============================================================================
// Tool responses
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalancesResult {
    pub account: Vec<AccountSummary>,
    pub international_account: Vec<AccountSummary>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionsResult {
    pub transactions: Vec<TransactionRecord>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardTransactionsResult {
    pub transactions: Vec<CardTransactionRecord>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardsResult {
    pub card_closed: Vec<CardSummary>,
    /// Active cards, minus cards that were issued but never activated
    pub cards_list: Vec<CardSummary>,
    pub card_other: Vec<CardSummary>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsResult {
    /// Online savings accounts
    pub osa_list: Vec<SavingsSummary>,
    /// Term savings accounts
    pub sba_list: Vec<SavingsSummary>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Savings detail lookup outcome
///
/// An account without details is an expected business outcome, so it is a
/// successful response shaped as `{"error": "..."}` rather than an `Err`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SavingDetailResult {
    Found {
        #[serde(rename = "detailSaving")]
        detail_saving: SavingsDetail,
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
    Missing {
        error: String,
    },
}

impl SavingDetailResult {
    pub const MISSING_MESSAGE: &'static str = "No details found for this account.";

    pub fn missing() -> Self {
        Self::Missing {
            error: Self::MISSING_MESSAGE.to_string(),
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterestRatesResult {
    /// Upstream rate tiers, `productName` removed
    pub interest_rate_list: Vec<Map<String, Value>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
