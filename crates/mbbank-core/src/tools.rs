//! MCP Tool implementations for the MB Bank server
//!
//! Each tool delegates to exactly one banking query and reshapes the raw
//! gateway mapping into a smaller, stable response:
//! - the upstream reference number is dropped
//! - entry lists are re-keyed into the summary types in `models`
//! - every other top-level field is passed through untouched
//!
//! The reshaping itself lives in pure `normalize_*` functions so it can be
//! tested without a client. All tools are read-only.

use chrono::{Local, NaiveDate};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::client::BankingBackend;
use crate::error::{Error, Result};
use crate::models::{
    AccountSummary, BalancesResult, CardSummary, CardTransactionRecord, CardTransactionsResult,
    CardsResult, InterestRatesResult, RateCurrency, RawAccount, RawCard, RawCardTransaction,
    RawSaving, RawSavingDetail, RawTransaction, SavingAccountType, SavingDetailResult,
    SavingsDetail, SavingsResult, SavingsSummary, TransactionRecord, TransactionsResult,
    TransferTarget,
};

// =============================================================================
// Date Helper (shared utility)
// =============================================================================

/// Date format used by every tool argument: dd-mm-yyyy
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// Parse a dd-mm-yyyy range bound
pub fn parse_bank_date(date_str: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date_str, DATE_FORMAT)
        .map_err(|_| Error::InvalidDateFormat(date_str.to_string()))
}

/// Format a date the way the tools accept it
pub fn format_bank_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Today's local date as dd-mm-yyyy
pub fn today_date() -> String {
    format_bank_date(Local::now().date_naive())
}

// =============================================================================
// Payload helpers
// =============================================================================

/// Raw status of an issued card that has not been activated yet
pub const NEW_CARD_STATUS: &str = "New Card";

/// Top-level object of a raw payload, minus the reference number
fn into_object(raw: Value) -> Result<Map<String, Value>> {
    match raw {
        Value::Object(mut map) => {
            map.remove("refNo");
            Ok(map)
        }
        other => Err(Error::MalformedPayload(format!(
            "expected a JSON object, got {}",
            other
        ))),
    }
}

/// Remove a list from the payload; absent or null counts as empty
fn take_list<T: DeserializeOwned>(map: &mut Map<String, Value>, key: &str) -> Result<Vec<T>> {
    match map.remove(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(value) => serde_json::from_value(value)
            .map_err(|e| Error::MalformedPayload(format!("{}: {}", key, e))),
    }
}

/// Whether a decimal integer string is nonzero, with no width limit
fn is_nonzero_integer(raw: &str) -> Option<bool> {
    let trimmed = raw.trim();
    let digits = trimmed.strip_prefix(['+', '-']).unwrap_or(trimmed);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(digits.bytes().any(|b| b != b'0'))
}

/// "+credit" when the credit amount is a nonzero integer, "-debit" otherwise
pub fn signed_amount(credit_amount: &str, debit_amount: &str) -> Result<String> {
    let nonzero = is_nonzero_integer(credit_amount).ok_or_else(|| {
        Error::MalformedPayload(format!("credit amount is not an integer: {}", credit_amount))
    })?;

    if nonzero {
        Ok(format!("+{}", credit_amount))
    } else {
        Ok(format!("-{}", debit_amount))
    }
}

/// Re-window a four-digit card expiry: characters 2..4, "/", characters 0..2
///
/// "2506" becomes "06/25".
pub fn format_valid_through(raw: &str) -> Result<String> {
    if raw.len() != 4 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::InvalidCardExpiry(raw.to_string()));
    }
    Ok(format!("{}/{}", &raw[2..4], &raw[0..2]))
}

// =============================================================================
// get_balances
// =============================================================================

/// Arguments for tools that take none
#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct NoParams {}

fn account_summary(account: RawAccount) -> AccountSummary {
    AccountSummary {
        account_number: account.acct_no,
        account_name: account.acct_alias,
        currency: account.ccy_cd,
        balance: account.current_balance,
    }
}

pub fn normalize_balances(raw: Value) -> Result<BalancesResult> {
    let mut map = into_object(raw)?;
    let accounts: Vec<RawAccount> = take_list(&mut map, "acct_list")?;
    let international: Vec<RawAccount> = take_list(&mut map, "internationalAcctList")?;
    map.remove("account");
    map.remove("internationalAccount");

    Ok(BalancesResult {
        account: accounts.into_iter().map(account_summary).collect(),
        international_account: international.into_iter().map(account_summary).collect(),
        extra: map,
    })
}

pub async fn get_balances<B: BankingBackend + ?Sized>(client: &B) -> Result<BalancesResult> {
    let raw = client.get_balance().await?;
    normalize_balances(raw)
}

// =============================================================================
// get_today_date
// =============================================================================

pub fn get_today_date() -> String {
    today_date()
}

// =============================================================================
// get_transactions
// =============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct TransactionsParams {
    #[schemars(
        description = "The account number to get transactions from. Obtain this from the get_balances tool."
    )]
    pub account_number: String,

    #[schemars(description = "Start date for the transactions in dd-mm-yyyy format")]
    pub from_date: String,

    #[schemars(description = "End date for the transactions in dd-mm-yyyy format")]
    pub to_date: String,
}

fn transaction_record(tx: RawTransaction) -> Result<TransactionRecord> {
    let amount = signed_amount(&tx.credit_amount, &tx.debit_amount)?;
    let transferred_to = tx
        .ben_account_no
        .filter(|account_number| !account_number.is_empty())
        .map(|account_number| TransferTarget {
            account_number,
            account_name: tx.ben_account_name.unwrap_or_default(),
            bank_name: tx.bank_name.unwrap_or_default(),
        });

    Ok(TransactionRecord {
        transaction_date: tx.transaction_date,
        transaction_id: tx.ref_no,
        description: tx.description,
        amount,
        currency: tx.currency,
        transferred_to,
    })
}

pub fn normalize_transactions(raw: Value) -> Result<TransactionsResult> {
    let mut map = into_object(raw)?;
    let raw_transactions: Vec<RawTransaction> = take_list(&mut map, "transactionHistoryList")?;
    map.remove("transactions");

    let transactions = raw_transactions
        .into_iter()
        .map(transaction_record)
        .collect::<Result<Vec<_>>>()?;

    Ok(TransactionsResult {
        transactions,
        extra: map,
    })
}

pub async fn get_transactions<B: BankingBackend + ?Sized>(
    client: &B,
    params: TransactionsParams,
) -> Result<TransactionsResult> {
    let from_date = parse_bank_date(&params.from_date)?;
    let to_date = parse_bank_date(&params.to_date)?;

    let raw = client
        .get_transaction_account_history(&params.account_number, from_date, to_date)
        .await?;
    let result = normalize_transactions(raw)?;

    debug!(
        account = %params.account_number,
        count = result.transactions.len(),
        "Normalized account transactions"
    );
    Ok(result)
}

// =============================================================================
// get_cards
// =============================================================================

fn card_summary(card: RawCard) -> Result<CardSummary> {
    Ok(CardSummary {
        valid_through: format_valid_through(&card.valid_through)?,
        card_id: card.card_no,
        card_number: card.card_number,
        card_name: card.embossed_name,
        card_class_detail: card.card_class_detail,
        card_type: card.card_cat_cd,
        card_status: card.card_status_detail,
    })
}

fn card_summaries(cards: Vec<RawCard>) -> Result<Vec<CardSummary>> {
    cards.into_iter().map(card_summary).collect()
}

pub fn normalize_cards(raw: Value) -> Result<CardsResult> {
    let mut map = into_object(raw)?;
    let closed: Vec<RawCard> = take_list(&mut map, "cardClosed")?;
    let active: Vec<RawCard> = take_list(&mut map, "cardList")?;
    let other: Vec<RawCard> = take_list(&mut map, "cardOther")?;
    map.remove("cardsList");

    let issued = active.len();
    let active: Vec<RawCard> = active
        .into_iter()
        .filter(|card| card.card_status_detail != NEW_CARD_STATUS)
        .collect();
    if active.len() < issued {
        debug!(
            skipped = issued - active.len(),
            "Skipping cards that are not activated yet"
        );
    }

    Ok(CardsResult {
        card_closed: card_summaries(closed)?,
        cards_list: card_summaries(active)?,
        card_other: card_summaries(other)?,
        extra: map,
    })
}

pub async fn get_cards<B: BankingBackend + ?Sized>(client: &B) -> Result<CardsResult> {
    let raw = client.get_card_list().await?;
    normalize_cards(raw)
}

// =============================================================================
// get_card_transactions
// =============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CardTransactionsParams {
    #[schemars(
        description = "The card ID to get transactions from. Obtain this from the get_cards tool."
    )]
    pub card_id: String,

    #[schemars(description = "Start date for the transactions in dd-mm-yyyy format")]
    pub from_date: String,

    #[schemars(description = "End date for the transactions in dd-mm-yyyy format")]
    pub to_date: String,
}

fn card_transaction_record(tx: RawCardTransaction) -> Result<CardTransactionRecord> {
    Ok(CardTransactionRecord {
        amount: signed_amount(&tx.credit_amount, &tx.debit_amount)?,
        transaction_date: tx.transaction_date,
        description: tx.description,
        currency: tx.currency,
    })
}

pub fn normalize_card_transactions(raw: Value) -> Result<CardTransactionsResult> {
    let mut map = into_object(raw)?;
    let raw_transactions: Vec<RawCardTransaction> =
        take_list(&mut map, "transactionHistoryList")?;
    map.remove("transactions");

    let transactions = raw_transactions
        .into_iter()
        .map(card_transaction_record)
        .collect::<Result<Vec<_>>>()?;

    Ok(CardTransactionsResult {
        transactions,
        extra: map,
    })
}

pub async fn get_card_transactions<B: BankingBackend + ?Sized>(
    client: &B,
    params: CardTransactionsParams,
) -> Result<CardTransactionsResult> {
    let from_date = parse_bank_date(&params.from_date)?;
    let to_date = parse_bank_date(&params.to_date)?;

    let raw = client
        .get_card_transaction_history(&params.card_id, from_date, to_date)
        .await?;
    normalize_card_transactions(raw)
}

// =============================================================================
// get_savings
// =============================================================================

fn savings_summary(saving: RawSaving) -> SavingsSummary {
    SavingsSummary {
        account_number: saving.account_number,
        account_name: saving.account_name,
        currency: saving.currency,
        principal_amount: saving.principal_amount,
        accrued_interest_amount: saving.accrued_interest_amount,
        open_date: saving.open_date,
        maturity_date: saving.maturity_date,
        is_add_more_able: saving.is_send_more,
        rate_percent_per_year: saving.rate,
        beneficiary_account: saving.nominated_account,
    }
}

pub fn normalize_savings(raw: Value) -> Result<SavingsResult> {
    let mut map = into_object(raw)?;
    let online: Vec<RawSaving> = take_list(&mut map, "osaList")?;
    let term: Vec<RawSaving> = take_list(&mut map, "sbaList")?;

    Ok(SavingsResult {
        osa_list: online.into_iter().map(savings_summary).collect(),
        sba_list: term.into_iter().map(savings_summary).collect(),
        extra: map,
    })
}

pub async fn get_savings<B: BankingBackend + ?Sized>(client: &B) -> Result<SavingsResult> {
    let raw = client.get_saving_list().await?;
    normalize_savings(raw)
}

// =============================================================================
// get_saving_details
// =============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SavingDetailsParams {
    #[schemars(
        description = "The account number to get details from. Obtain this from the get_savings tool."
    )]
    pub account_number: String,

    #[schemars(
        description = "The type of the account: \"OSA\" for Online Savings Account or \"SBA\" for Saving Bank Account"
    )]
    pub account_type: SavingAccountType,
}

fn savings_detail(detail: RawSavingDetail) -> SavingsDetail {
    SavingsDetail {
        account_number: detail.savings_account_no,
        product_name: detail.product_name,
        principal_amount: detail.principal_amount,
        accrued_interest_amount: detail.accrued_interest_amount,
        total_maturity_amount: detail.total_maturity_amount,
        currency: detail.currency,
        start_date: detail.start_date,
        maturity_date: detail.maturity_date,
        interest_payment_type: detail.interest_payment_type,
        maturity_instructions: detail.maturity_instructions,
        rate_percent_per_year: detail.interest_rate,
        beneficiary_account: detail.beneficiary_account,
    }
}

pub fn normalize_saving_details(raw: Value) -> Result<SavingDetailResult> {
    let mut map = into_object(raw)?;

    let detail = match map.remove("detailSaving") {
        None | Some(Value::Null) => return Ok(SavingDetailResult::missing()),
        Some(value) => serde_json::from_value::<RawSavingDetail>(value)
            .map_err(|e| Error::MalformedPayload(format!("detailSaving: {}", e)))?,
    };

    Ok(SavingDetailResult::Found {
        detail_saving: savings_detail(detail),
        extra: map,
    })
}

pub async fn get_saving_details<B: BankingBackend + ?Sized>(
    client: &B,
    params: SavingDetailsParams,
) -> Result<SavingDetailResult> {
    let raw = client
        .get_saving_detail(&params.account_number, params.account_type)
        .await?;
    let result = normalize_saving_details(raw)?;

    if result.is_missing() {
        debug!(account = %params.account_number, "No savings detail returned");
    }
    Ok(result)
}

// =============================================================================
// get_interest_rates
// =============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct InterestRatesParams {
    #[schemars(description = "The currency for which to get the interest rates")]
    pub currency: RateCurrency,
}

pub fn normalize_interest_rates(raw: Value) -> Result<InterestRatesResult> {
    let mut map = into_object(raw)?;
    let mut entries: Vec<Map<String, Value>> = take_list(&mut map, "interestRateList")?;
    for entry in &mut entries {
        entry.remove("productName");
    }

    Ok(InterestRatesResult {
        interest_rate_list: entries,
        extra: map,
    })
}

pub async fn get_interest_rates<B: BankingBackend + ?Sized>(
    client: &B,
    params: InterestRatesParams,
) -> Result<InterestRatesResult> {
    let raw = client.get_interest_rate(params.currency).await?;
    normalize_interest_rates(raw)
}

// =============================================================================
// Tool Registry
// =============================================================================

/// Name, description and argument schema of one tool
#[derive(Debug, Clone, Serialize)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
}

impl ToolSpec {
    pub fn new(name: &'static str, description: &'static str, input_schema: Value) -> Self {
        Self {
            name,
            description,
            input_schema,
        }
    }
}

pub const GET_BALANCES_DESCRIPTION: &str = "Get the balance from all accounts in MB Bank.";
pub const GET_TODAY_DATE_DESCRIPTION: &str =
    "Get today's date in the format dd-mm-yyyy used for MB Bank transactions.";
pub const GET_TRANSACTIONS_DESCRIPTION: &str =
    "Get the transactions for a specific account in MB Bank. Dates use dd-mm-yyyy.";
pub const GET_CARDS_DESCRIPTION: &str = "Get the cards associated with the MB Bank account.";
pub const GET_CARD_TRANSACTIONS_DESCRIPTION: &str =
    "Get the transactions for a specific card in MB Bank. Dates use dd-mm-yyyy.";
pub const GET_SAVINGS_DESCRIPTION: &str = "Get the savings accounts associated with the MB Bank account. \
     osa stands for Online Savings Account. sba stands for Saving Bank Account.";
pub const GET_SAVING_DETAILS_DESCRIPTION: &str =
    "Get the details of a specific savings account in MB Bank.";
pub const GET_INTEREST_RATES_DESCRIPTION: &str =
    "Get the interest rates for savings accounts in MB Bank.";

/// All MB Bank tools, in registration order
pub fn bank_tools() -> Vec<ToolSpec> {
    vec![
        ToolSpec::new(
            "get_balances",
            GET_BALANCES_DESCRIPTION,
            schemars::schema_for!(NoParams).into(),
        ),
        ToolSpec::new(
            "get_today_date",
            GET_TODAY_DATE_DESCRIPTION,
            schemars::schema_for!(NoParams).into(),
        ),
        ToolSpec::new(
            "get_transactions",
            GET_TRANSACTIONS_DESCRIPTION,
            schemars::schema_for!(TransactionsParams).into(),
        ),
        ToolSpec::new(
            "get_cards",
            GET_CARDS_DESCRIPTION,
            schemars::schema_for!(NoParams).into(),
        ),
        ToolSpec::new(
            "get_card_transactions",
            GET_CARD_TRANSACTIONS_DESCRIPTION,
            schemars::schema_for!(CardTransactionsParams).into(),
        ),
        ToolSpec::new(
            "get_savings",
            GET_SAVINGS_DESCRIPTION,
            schemars::schema_for!(NoParams).into(),
        ),
        ToolSpec::new(
            "get_saving_details",
            GET_SAVING_DETAILS_DESCRIPTION,
            schemars::schema_for!(SavingDetailsParams).into(),
        ),
        ToolSpec::new(
            "get_interest_rates",
            GET_INTEREST_RATES_DESCRIPTION,
            schemars::schema_for!(InterestRatesParams).into(),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{MockBankClient, MOCK_SAVING_ACCOUNT};
    use chrono::Datelike;
    use serde_json::json;

    fn raw_transaction(credit: &str, debit: &str, ben_account_no: Option<&str>) -> Value {
        let mut tx = json!({
            "transactionDate": "01/06/2025 08:15:00",
            "refNo": "FT0001",
            "description": "TEST",
            "creditAmount": credit,
            "debitAmount": debit,
            "currency": "VND",
            "benAccountName": "TRAN THI B",
            "bankName": "Vietcombank"
        });
        if let Some(no) = ben_account_no {
            tx["benAccountNo"] = json!(no);
        }
        tx
    }

    fn raw_card(card_no: &str, valid_through: &str, status: &str) -> Value {
        json!({
            "cardNo": card_no,
            "cardNumber": "9704 **** 0000",
            "embossedName": "NGUYEN VAN A",
            "cardClassDetail": "MB Classic",
            "cardCatCd": "DEBIT",
            "validThrough": valid_through,
            "cardStatusDetail": status
        })
    }

    // ========== Date helper ==========

    #[test]
    fn test_parse_bank_date() {
        let date = parse_bank_date("01-06-2025").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
    }

    #[test]
    fn test_parse_bank_date_wrong_order() {
        let err = parse_bank_date("2025-06-01").unwrap_err();
        assert!(matches!(err, Error::InvalidDateFormat(s) if s == "2025-06-01"));
    }

    #[test]
    fn test_parse_bank_date_rejects_garbage() {
        assert!(parse_bank_date("").is_err());
        assert!(parse_bank_date("31-02-2025").is_err());
        assert!(parse_bank_date("yesterday").is_err());
        assert!(parse_bank_date(" 01-06-2025 ").is_err());
        assert!(parse_bank_date("01-06-2025\n").is_err());
    }

    #[test]
    fn test_today_date_round_trips() {
        let today = today_date();
        let parsed = parse_bank_date(&today).unwrap();
        assert_eq!(parsed, Local::now().date_naive());
        assert_eq!(format_bank_date(parsed), today);
    }

    #[test]
    fn test_get_today_date_is_plain_text() {
        let today = get_today_date();
        assert_eq!(today.len(), 10);
        assert_eq!(&today[2..3], "-");
        assert_eq!(&today[5..6], "-");
    }

    // ========== Amounts and expiry ==========

    #[test]
    fn test_signed_amount_credit() {
        assert_eq!(signed_amount("5000000", "0").unwrap(), "+5000000");
    }

    #[test]
    fn test_signed_amount_debit() {
        assert_eq!(signed_amount("0", "250000").unwrap(), "-250000");
    }

    #[test]
    fn test_signed_amount_does_not_reformat() {
        assert_eq!(signed_amount(" 0 ", "1,000").unwrap(), "-1,000");
        assert_eq!(signed_amount("00", "7").unwrap(), "-7");
    }

    #[test]
    fn test_signed_amount_non_integer_credit() {
        for credit in ["12.5", "", "+", "1e3", "5,000"] {
            let err = signed_amount(credit, "0").unwrap_err();
            assert!(matches!(err, Error::MalformedPayload(_)), "{credit}");
        }
    }

    #[test]
    fn test_signed_amount_beyond_i64() {
        assert_eq!(
            signed_amount("10000000000000000000", "0").unwrap(),
            "+10000000000000000000"
        );
        assert_eq!(signed_amount("00000000000000000000000", "42").unwrap(), "-42");
        assert_eq!(signed_amount("-0", "3").unwrap(), "-3");
    }

    #[test]
    fn test_format_valid_through() {
        assert_eq!(format_valid_through("2506").unwrap(), "06/25");
        assert_eq!(format_valid_through("3012").unwrap(), "12/30");
    }

    #[test]
    fn test_format_valid_through_rejects_bad_shape() {
        for raw in ["", "250", "25061", "25/6", "ab12"] {
            let err = format_valid_through(raw).unwrap_err();
            assert!(matches!(err, Error::InvalidCardExpiry(_)), "{raw}");
        }
    }

    // ========== Balances ==========

    #[test]
    fn test_normalize_balances() {
        let raw = json!({
            "refNo": "REF",
            "totalBalanceEquivalent": "100",
            "acct_list": [
                {"acctNo": "1", "acctAlias": "A", "ccyCd": "VND", "currentBalance": "10"},
                {"acctNo": "2", "acctAlias": "B", "ccyCd": "VND", "currentBalance": "90"}
            ],
            "internationalAcctList": [
                {"acctNo": "3", "acctAlias": "C", "ccyCd": "USD", "currentBalance": "1.50"}
            ]
        });

        let result = normalize_balances(raw).unwrap();
        assert_eq!(result.account.len(), 2);
        assert_eq!(result.account[0].account_number, "1");
        assert_eq!(result.account[1].account_number, "2");
        assert_eq!(result.international_account[0].balance, "1.50");
        assert!(!result.extra.contains_key("refNo"));
        assert_eq!(result.extra["totalBalanceEquivalent"], "100");
    }

    #[test]
    fn test_normalize_balances_output_shape() {
        let raw = json!({
            "acct_list": [
                {"acctNo": "1", "acctAlias": "A", "ccyCd": "VND", "currentBalance": "10"}
            ]
        });

        let json = serde_json::to_value(normalize_balances(raw).unwrap()).unwrap();
        assert_eq!(
            json,
            json!({
                "account": [
                    {"accountNumber": "1", "accountName": "A", "currency": "VND", "balance": "10"}
                ],
                "internationalAccount": []
            })
        );
    }

    #[test]
    fn test_normalize_balances_missing_lists() {
        let result = normalize_balances(json!({"refNo": "REF"})).unwrap();
        assert!(result.account.is_empty());
        assert!(result.international_account.is_empty());
        assert!(result.extra.is_empty());
    }

    #[test]
    fn test_normalize_balances_malformed_entry() {
        let raw = json!({"acct_list": [{"acctNo": "1"}]});
        let err = normalize_balances(raw).unwrap_err();
        assert!(matches!(err, Error::MalformedPayload(_)));
    }

    #[test]
    fn test_normalize_rejects_non_object() {
        let err = normalize_balances(json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, Error::MalformedPayload(_)));
    }

    // ========== Transactions ==========

    #[test]
    fn test_normalize_transactions_signs_and_targets() {
        let raw = json!({
            "refNo": "REF",
            "transactionHistoryList": [
                raw_transaction("5000", "0", Some("")),
                raw_transaction("0", "250", Some("0011223344")),
                raw_transaction("0", "75", None)
            ]
        });

        let result = normalize_transactions(raw).unwrap();
        let txs = &result.transactions;
        assert_eq!(txs.len(), 3);

        assert_eq!(txs[0].amount, "+5000");
        assert!(txs[0].transferred_to.is_none());

        assert_eq!(txs[1].amount, "-250");
        let target = txs[1].transferred_to.as_ref().unwrap();
        assert_eq!(target.account_number, "0011223344");
        assert_eq!(target.account_name, "TRAN THI B");
        assert_eq!(target.bank_name, "Vietcombank");

        assert_eq!(txs[2].amount, "-75");
        assert!(txs[2].transferred_to.is_none());
        assert_eq!(txs[2].transaction_id, "FT0001");
    }

    #[test]
    fn test_transaction_without_target_serializes_null() {
        let raw = json!({"transactionHistoryList": [raw_transaction("1", "0", None)]});
        let json = serde_json::to_value(normalize_transactions(raw).unwrap()).unwrap();
        let tx = &json["transactions"][0];
        assert!(tx.get("transferredTo").unwrap().is_null());
        assert_eq!(tx["transactionId"], "FT0001");
    }

    #[test]
    fn test_normalize_transactions_keeps_order() {
        let mut list = Vec::new();
        for i in 0..5 {
            let mut tx = raw_transaction("0", "1", None);
            tx["refNo"] = json!(format!("FT{i}"));
            list.push(tx);
        }
        let result = normalize_transactions(json!({ "transactionHistoryList": list })).unwrap();
        let ids: Vec<_> = result
            .transactions
            .iter()
            .map(|t| t.transaction_id.as_str())
            .collect();
        assert_eq!(ids, ["FT0", "FT1", "FT2", "FT3", "FT4"]);
    }

    // ========== Cards ==========

    #[test]
    fn test_normalize_cards_filters_new_cards_from_active_only() {
        let raw = json!({
            "refNo": "REF",
            "cardClosed": [raw_card("C1", "2301", "New Card")],
            "cardList": [
                raw_card("C2", "2806", "Active"),
                raw_card("C3", "3006", "New Card")
            ],
            "cardOther": [raw_card("C4", "2712", "New Card")]
        });

        let result = normalize_cards(raw).unwrap();
        assert_eq!(result.card_closed.len(), 1);
        assert_eq!(result.card_closed[0].card_id, "C1");
        assert_eq!(result.cards_list.len(), 1);
        assert_eq!(result.cards_list[0].card_id, "C2");
        assert_eq!(result.cards_list[0].valid_through, "06/28");
        assert_eq!(result.card_other.len(), 1);
        assert_eq!(result.card_other[0].card_status, "New Card");
    }

    #[test]
    fn test_normalize_cards_output_keys() {
        let raw = json!({"cardList": [raw_card("C2", "2506", "Active")]});
        let json = serde_json::to_value(normalize_cards(raw).unwrap()).unwrap();

        assert!(json.get("cardList").is_none());
        let card = &json["cardsList"][0];
        assert_eq!(card["cardId"], "C2");
        assert_eq!(card["cardName"], "NGUYEN VAN A");
        assert_eq!(card["cardType"], "DEBIT");
        assert_eq!(card["validThrough"], "06/25");
        assert_eq!(card["cardStatus"], "Active");
        assert_eq!(json["cardClosed"], json!([]));
        assert_eq!(json["cardOther"], json!([]));
    }

    #[test]
    fn test_normalize_cards_bad_expiry_fails() {
        let raw = json!({"cardOther": [raw_card("C9", "25-06", "Active")]});
        let err = normalize_cards(raw).unwrap_err();
        assert!(matches!(err, Error::InvalidCardExpiry(_)));
    }

    // ========== Card transactions ==========

    #[test]
    fn test_normalize_card_transactions_omits_id_and_target() {
        let raw = json!({
            "refNo": "REF",
            "transactionHistoryList": [
                {
                    "transactionDate": "03/06/2025",
                    "description": "GRAB",
                    "creditAmount": "0",
                    "debitAmount": "89000",
                    "currency": "VND",
                    "refNo": "CT1",
                    "benAccountNo": "123"
                }
            ]
        });

        let json = serde_json::to_value(normalize_card_transactions(raw).unwrap()).unwrap();
        assert_eq!(
            json,
            json!({
                "transactions": [
                    {
                        "transactionDate": "03/06/2025",
                        "description": "GRAB",
                        "amount": "-89000",
                        "currency": "VND"
                    }
                ]
            })
        );
    }

    // ========== Savings ==========

    #[test]
    fn test_normalize_savings_renames_fields() {
        let raw = json!({
            "refNo": "REF",
            "osaList": [{
                "accountNumber": "OSA1",
                "accountName": "Online",
                "currency": "VND",
                "principalAmount": 1000,
                "accruedInterestAmount": "5",
                "openDate": "01/01/2025",
                "maturityDate": "01/07/2025",
                "isSendMore": true,
                "rate": "4.7",
                "nominatedAccount": "0123"
            }]
        });

        let result = normalize_savings(raw).unwrap();
        assert!(result.sba_list.is_empty());
        let json = serde_json::to_value(&result.osa_list[0]).unwrap();
        assert_eq!(json["accountNumber"], "OSA1");
        assert_eq!(json["principalAmount"], 1000);
        assert_eq!(json["isAddMoreAble"], true);
        assert_eq!(json["ratePercentPerYear"], "4.7");
        assert_eq!(json["beneficiaryAccount"], "0123");
        assert!(json.get("isSendMore").is_none());
    }

    // ========== Saving details ==========

    #[test]
    fn test_normalize_saving_details_missing() {
        let raw = json!({"refNo": "REF", "result": {"ok": true}});
        let result = normalize_saving_details(raw).unwrap();
        assert!(result.is_missing());
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"error": "No details found for this account."})
        );
    }

    #[test]
    fn test_normalize_saving_details_null_is_missing() {
        let result = normalize_saving_details(json!({"detailSaving": null})).unwrap();
        assert!(result.is_missing());
    }

    #[test]
    fn test_normalize_saving_details_found() {
        let raw = json!({
            "refNo": "REF",
            "result": {"ok": true},
            "detailSaving": {
                "savingsAccountNo": "OSA1",
                "productName": "Flexible",
                "principalAmount": "100",
                "accruedInterestAmount": "1",
                "totalMaturityAmount": "102",
                "currency": "VND",
                "startDate": "01/01/2025",
                "maturityDate": "01/07/2025",
                "interestPaymentType": "End of term",
                "maturityInstructions": "Roll over",
                "interestRate": "4.7",
                "beneficiaryAccount": "0123"
            }
        });

        let json = serde_json::to_value(normalize_saving_details(raw).unwrap()).unwrap();
        assert!(json.get("error").is_none());
        assert!(json.get("refNo").is_none());
        assert_eq!(json["result"]["ok"], true);
        let detail = &json["detailSaving"];
        assert_eq!(detail["accountNumber"], "OSA1");
        assert_eq!(detail["ratePercentPerYear"], "4.7");
        assert_eq!(detail["totalMaturityAmount"], "102");
    }

    // ========== Interest rates ==========

    #[test]
    fn test_normalize_interest_rates_strips_product_name() {
        let raw = json!({
            "refNo": "REF",
            "currency": "USD",
            "interestRateList": [
                {"productName": "A", "term": "1M", "interestRate": "0.1"},
                {"productName": "B", "term": "6M", "interestRate": "0.5", "extra": {"x": 1}}
            ]
        });

        let result = normalize_interest_rates(raw).unwrap();
        assert_eq!(result.interest_rate_list.len(), 2);
        for entry in &result.interest_rate_list {
            assert!(!entry.contains_key("productName"));
        }
        assert_eq!(result.interest_rate_list[1]["extra"], json!({"x": 1}));
        assert_eq!(result.extra["currency"], "USD");
    }

    // ========== Purity ==========

    fn assert_deterministic<T: Serialize>(raw: Value, normalize: fn(Value) -> Result<T>) {
        let first = serde_json::to_string(&normalize(raw.clone()).unwrap()).unwrap();
        let second = serde_json::to_string(&normalize(raw).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_normalizers_are_deterministic() {
        use crate::client::mock;

        assert_deterministic(mock::balance_payload(), normalize_balances);
        assert_deterministic(
            mock::account_history_payload("0123456789"),
            normalize_transactions,
        );
        assert_deterministic(mock::card_list_payload(), normalize_cards);
        assert_deterministic(mock::card_history_payload(), normalize_card_transactions);
        assert_deterministic(mock::saving_list_payload(), normalize_savings);
        assert_deterministic(
            mock::saving_detail_payload(MOCK_SAVING_ACCOUNT),
            normalize_saving_details,
        );
        assert_deterministic(mock::saving_detail_payload("UNKNOWN"), normalize_saving_details);
        assert_deterministic(
            mock::interest_rate_payload(RateCurrency::Usd),
            normalize_interest_rates,
        );
    }

    // ========== Output keys win over upstream keys ==========

    #[test]
    fn test_balances_output_keys_replace_upstream_fields() {
        let raw = json!({"account": "x", "internationalAccount": 7, "acct_list": []});
        let result = normalize_balances(raw).unwrap();
        assert!(result.extra.is_empty());
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"account": [], "internationalAccount": []})
        );
    }

    #[test]
    fn test_ledger_output_keys_replace_upstream_fields() {
        let raw = json!({"transactions": "stale", "transactionHistoryList": []});
        let result = normalize_transactions(raw.clone()).unwrap();
        assert!(result.extra.is_empty());
        assert_eq!(serde_json::to_value(&result).unwrap(), json!({"transactions": []}));

        let result = normalize_card_transactions(raw).unwrap();
        assert!(result.extra.is_empty());
        assert_eq!(serde_json::to_value(&result).unwrap(), json!({"transactions": []}));
    }

    #[test]
    fn test_cards_output_keys_replace_upstream_fields() {
        let raw = json!({"cardsList": "stale", "cardList": [raw_card("C2", "2806", "Active")]});
        let result = normalize_cards(raw).unwrap();
        assert!(result.extra.is_empty());
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["cardsList"][0]["cardId"], "C2");
    }

    // ========== Async tools over the mock backend ==========

    #[tokio::test]
    async fn test_get_balances_mock() {
        let client = MockBankClient::new();
        let result = get_balances(&client).await.unwrap();
        assert_eq!(result.account.len(), 2);
        assert_eq!(result.international_account.len(), 1);
        assert_eq!(result.international_account[0].currency, "USD");
    }

    #[tokio::test]
    async fn test_get_transactions_mock() {
        let client = MockBankClient::new();
        let params = TransactionsParams {
            account_number: "0123456789".to_string(),
            from_date: "01-06-2025".to_string(),
            to_date: "30-06-2025".to_string(),
        };

        let result = get_transactions(&client, params).await.unwrap();
        assert_eq!(result.transactions[0].amount, "+5000000");
        assert_eq!(result.transactions[1].amount, "-250000");
        assert!(result.transactions[1].transferred_to.is_some());
    }

    #[tokio::test]
    async fn test_get_transactions_invalid_date() {
        let client = MockBankClient::new();
        let params = TransactionsParams {
            account_number: "0123456789".to_string(),
            from_date: "2025-06-01".to_string(),
            to_date: "30-06-2025".to_string(),
        };

        let err = get_transactions(&client, params).await.unwrap_err();
        assert!(matches!(err, Error::InvalidDateFormat(_)));
    }

    #[tokio::test]
    async fn test_get_card_transactions_invalid_to_date() {
        let client = MockBankClient::new();
        let params = CardTransactionsParams {
            card_id: "C-0002".to_string(),
            from_date: "01-06-2025".to_string(),
            to_date: "06/30/2025".to_string(),
        };

        let err = get_card_transactions(&client, params).await.unwrap_err();
        assert!(matches!(err, Error::InvalidDateFormat(s) if s == "06/30/2025"));
    }

    #[tokio::test]
    async fn test_get_cards_mock_hides_new_card() {
        let client = MockBankClient::new();
        let result = get_cards(&client).await.unwrap();
        assert!(result
            .cards_list
            .iter()
            .all(|c| c.card_status != NEW_CARD_STATUS));
        assert_eq!(result.cards_list.len(), 1);
    }

    #[tokio::test]
    async fn test_get_saving_details_mock() {
        let client = MockBankClient::new();

        let found = get_saving_details(
            &client,
            SavingDetailsParams {
                account_number: MOCK_SAVING_ACCOUNT.to_string(),
                account_type: SavingAccountType::Online,
            },
        )
        .await
        .unwrap();
        assert!(!found.is_missing());

        let missing = get_saving_details(
            &client,
            SavingDetailsParams {
                account_number: "UNKNOWN".to_string(),
                account_type: SavingAccountType::Term,
            },
        )
        .await
        .unwrap();
        assert_eq!(missing, SavingDetailResult::missing());
    }

    #[tokio::test]
    async fn test_get_interest_rates_mock() {
        let client = MockBankClient::new();
        let result = get_interest_rates(
            &client,
            InterestRatesParams {
                currency: RateCurrency::Eur,
            },
        )
        .await
        .unwrap();
        assert_eq!(result.extra["currency"], "EUR");
        assert_eq!(result.interest_rate_list.len(), 2);
    }

    // ========== Params and registry ==========

    #[test]
    fn test_params_reject_unknown_enum_values() {
        let ok: SavingDetailsParams =
            serde_json::from_value(json!({"account_number": "1", "account_type": "SBA"})).unwrap();
        assert_eq!(ok.account_type, SavingAccountType::Term);

        let bad = serde_json::from_value::<SavingDetailsParams>(
            json!({"account_number": "1", "account_type": "CASA"}),
        );
        assert!(bad.is_err());

        let bad = serde_json::from_value::<InterestRatesParams>(json!({"currency": "JPY"}));
        assert!(bad.is_err());
    }

    #[test]
    fn test_bank_tools_registry() {
        let tools = bank_tools();
        let names: Vec<_> = tools.iter().map(|t| t.name).collect();
        assert_eq!(
            names,
            [
                "get_balances",
                "get_today_date",
                "get_transactions",
                "get_cards",
                "get_card_transactions",
                "get_savings",
                "get_saving_details",
                "get_interest_rates",
            ]
        );
        for tool in &tools {
            assert!(!tool.description.is_empty());
            assert!(tool.input_schema.is_object());
        }
    }

    #[test]
    fn test_transactions_schema_lists_required_fields() {
        let tools = bank_tools();
        let tool = tools.iter().find(|t| t.name == "get_transactions").unwrap();
        let required = tool.input_schema["required"].as_array().unwrap();
        for field in ["account_number", "from_date", "to_date"] {
            assert!(required.iter().any(|r| r == field), "{field}");
        }
    }

    #[test]
    fn test_today_is_a_real_date() {
        let today = parse_bank_date(&today_date()).unwrap();
        assert!(today.year() >= 2024);
    }
}
