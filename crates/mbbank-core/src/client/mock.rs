//! Mock banking backend for testing
//!
//! Returns fixed gateway payloads shaped like the real ones. Useful for unit
//! tests and for running the MCP server without bank credentials.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::{json, Value};

use crate::error::Result;
use crate::models::{RateCurrency, SavingAccountType};

use super::BankingBackend;

/// Savings account number that has a detail record in the fixtures
pub const MOCK_SAVING_ACCOUNT: &str = "MB0000123456";

/// Mock banking backend
#[derive(Clone, Default)]
pub struct MockBankClient;

impl MockBankClient {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl BankingBackend for MockBankClient {
    async fn authenticate(&self) -> Result<()> {
        Ok(())
    }

    async fn get_balance(&self) -> Result<Value> {
        Ok(balance_payload())
    }

    async fn get_transaction_account_history(
        &self,
        account_no: &str,
        _from_date: NaiveDate,
        _to_date: NaiveDate,
    ) -> Result<Value> {
        Ok(account_history_payload(account_no))
    }

    async fn get_card_list(&self) -> Result<Value> {
        Ok(card_list_payload())
    }

    async fn get_card_transaction_history(
        &self,
        _card_no: &str,
        _from_date: NaiveDate,
        _to_date: NaiveDate,
    ) -> Result<Value> {
        Ok(card_history_payload())
    }

    async fn get_saving_list(&self) -> Result<Value> {
        Ok(saving_list_payload())
    }

    async fn get_saving_detail(
        &self,
        account_no: &str,
        _account_type: SavingAccountType,
    ) -> Result<Value> {
        Ok(saving_detail_payload(account_no))
    }

    async fn get_interest_rate(&self, currency: RateCurrency) -> Result<Value> {
        Ok(interest_rate_payload(currency))
    }
}

fn ok_result() -> Value {
    json!({ "message": "OK", "responseCode": "00", "ok": true })
}

pub(crate) fn balance_payload() -> Value {
    json!({
        "refNo": "DEMO-20250601120000000",
        "result": ok_result(),
        "totalBalanceEquivalent": "15250000",
        "currencyEquivalent": "VND",
        "acct_list": [
            {
                "acctNo": "0123456789",
                "acctAlias": "NGUYEN VAN A",
                "ccyCd": "VND",
                "currentBalance": "15250000",
                "acctTypCd": "CA"
            },
            {
                "acctNo": "9876543210",
                "acctAlias": "SALARY",
                "ccyCd": "VND",
                "currentBalance": "0",
                "acctTypCd": "CA"
            }
        ],
        "internationalAcctList": [
            {
                "acctNo": "0123456789001",
                "acctAlias": "USD ACCOUNT",
                "ccyCd": "USD",
                "currentBalance": "120.50",
                "acctTypCd": "FCA"
            }
        ]
    })
}

pub(crate) fn account_history_payload(account_no: &str) -> Value {
    json!({
        "refNo": "DEMO-20250601120000001",
        "result": ok_result(),
        "transactionHistoryList": [
            {
                "postingDate": "01/06/2025 08:15:00",
                "transactionDate": "01/06/2025 08:15:00",
                "accountNo": account_no,
                "creditAmount": "5000000",
                "debitAmount": "0",
                "currency": "VND",
                "description": "LUONG THANG 5",
                "availableBalance": "15250000",
                "refNo": "FT25152000001",
                "benAccountName": "",
                "bankName": "",
                "benAccountNo": ""
            },
            {
                "postingDate": "02/06/2025 19:40:12",
                "transactionDate": "02/06/2025 19:40:12",
                "accountNo": account_no,
                "creditAmount": "0",
                "debitAmount": "250000",
                "currency": "VND",
                "description": "CHUYEN TIEN AN TOI",
                "availableBalance": "15000000",
                "refNo": "FT25153000002",
                "benAccountName": "TRAN THI B",
                "bankName": "Vietcombank",
                "benAccountNo": "0011223344"
            }
        ]
    })
}

pub(crate) fn card_list_payload() -> Value {
    json!({
        "refNo": "DEMO-20250601120000002",
        "result": ok_result(),
        "cardClosed": [
            {
                "cardNo": "C-0001",
                "cardNumber": "9704 22** **** 1111",
                "embossedName": "NGUYEN VAN A",
                "cardClassDetail": "MB Classic",
                "cardCatCd": "DEBIT",
                "validThrough": "2301",
                "cardStatusDetail": "Closed"
            }
        ],
        "cardList": [
            {
                "cardNo": "C-0002",
                "cardNumber": "4211 11** **** 2222",
                "embossedName": "NGUYEN VAN A",
                "cardClassDetail": "MB Visa Platinum",
                "cardCatCd": "CREDIT",
                "validThrough": "2806",
                "cardStatusDetail": "Active"
            },
            {
                "cardNo": "C-0003",
                "cardNumber": "4211 11** **** 3333",
                "embossedName": "NGUYEN VAN A",
                "cardClassDetail": "MB Visa Platinum",
                "cardCatCd": "CREDIT",
                "validThrough": "3006",
                "cardStatusDetail": "New Card"
            }
        ],
        "cardOther": []
    })
}

pub(crate) fn card_history_payload() -> Value {
    json!({
        "refNo": "DEMO-20250601120000003",
        "result": ok_result(),
        "transactionHistoryList": [
            {
                "transactionDate": "03/06/2025 12:01:44",
                "description": "GRAB*FOOD HCM",
                "creditAmount": "0",
                "debitAmount": "89000",
                "currency": "VND",
                "refNo": "CT0001"
            },
            {
                "transactionDate": "04/06/2025 09:30:00",
                "description": "REFUND GRAB*FOOD",
                "creditAmount": "89000",
                "debitAmount": "0",
                "currency": "VND",
                "refNo": "CT0002"
            }
        ]
    })
}

pub(crate) fn saving_list_payload() -> Value {
    json!({
        "refNo": "DEMO-20250601120000004",
        "result": ok_result(),
        "totalPrincipalAmount": "60000000",
        "osaList": [
            {
                "accountNumber": MOCK_SAVING_ACCOUNT,
                "accountName": "Tiet kiem online",
                "currency": "VND",
                "principalAmount": "50000000",
                "accruedInterestAmount": "125000",
                "openDate": "01/03/2025",
                "maturityDate": "01/09/2025",
                "isSendMore": true,
                "rate": "4.7",
                "nominatedAccount": "0123456789"
            }
        ],
        "sbaList": [
            {
                "accountNumber": "SB0000654321",
                "accountName": "Tiet kiem co ky han",
                "currency": "VND",
                "principalAmount": "10000000",
                "accruedInterestAmount": "40000",
                "openDate": "15/01/2025",
                "maturityDate": "15/01/2026",
                "isSendMore": false,
                "rate": "5.2",
                "nominatedAccount": "0123456789"
            }
        ]
    })
}

pub(crate) fn saving_detail_payload(account_no: &str) -> Value {
    if account_no != MOCK_SAVING_ACCOUNT {
        return json!({
            "refNo": "DEMO-20250601120000005",
            "result": ok_result()
        });
    }

    json!({
        "refNo": "DEMO-20250601120000005",
        "result": ok_result(),
        "detailSaving": {
            "savingsAccountNo": MOCK_SAVING_ACCOUNT,
            "productName": "Tiet kiem online linh hoat",
            "principalAmount": "50000000",
            "accruedInterestAmount": "125000",
            "totalMaturityAmount": "51175000",
            "currency": "VND",
            "startDate": "01/03/2025",
            "maturityDate": "01/09/2025",
            "interestPaymentType": "End of term",
            "maturityInstructions": "Roll over principal and interest",
            "interestRate": "4.7",
            "beneficiaryAccount": "0123456789"
        }
    })
}

pub(crate) fn interest_rate_payload(currency: RateCurrency) -> Value {
    json!({
        "refNo": "DEMO-20250601120000006",
        "result": ok_result(),
        "currency": currency.as_str(),
        "interestRateList": [
            {
                "productName": "Tiet kiem online",
                "productCode": "OSA",
                "termCode": "1M",
                "term": "1 month",
                "interestRate": "3.5"
            },
            {
                "productName": "Tiet kiem online",
                "productCode": "OSA",
                "termCode": "6M",
                "term": "6 months",
                "interestRate": "4.7"
            }
        ]
    })
}
