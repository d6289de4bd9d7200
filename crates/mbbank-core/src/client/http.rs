//! HTTP banking gateway client
//!
//! JSON-over-HTTP client for a gateway exposing the MB Bank retail
//! operations. Login posts `userId`, `password` and `refNo` and expects a
//! `sessionId` back. Every later call is a POST carrying that session id, a
//! fresh reference number, and the call's own arguments. Dates travel as
//! `dd/mm/yyyy`.
//!
//! The bank's public web endpoints additionally require captcha and device
//! fields this client does not send, so the base URL must point at a
//! compatible gateway or proxy.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use reqwest::Client;
use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::models::{RateCurrency, SavingAccountType};

use super::{BankConfig, BankingBackend};

pub(crate) const LOGIN_PATH: &str = "/api/retail_web/internetbanking/v2.0/doLogin";
pub(crate) const BALANCE_PATH: &str = "/api/retail-web-accountms/getBalance";
pub(crate) const ACCOUNT_HISTORY_PATH: &str =
    "/api/retail-transactionms/transactionms/get-account-transaction-history";
pub(crate) const CARD_LIST_PATH: &str = "/api/retail_web/card/getList";
pub(crate) const CARD_HISTORY_PATH: &str = "/api/retail_web/card/getCardTransactionHistory";
pub(crate) const SAVING_LIST_PATH: &str = "/api/retail_web/saving/getList";
pub(crate) const SAVING_DETAIL_PATH: &str = "/api/retail_web/saving/getDetail";
pub(crate) const INTEREST_RATE_PATH: &str = "/api/retail_web/common/getInterestRate";

/// Date format the gateway expects in request bodies
const WIRE_DATE_FORMAT: &str = "%d/%m/%Y";

/// MB Bank gateway client
///
/// Cloning shares the HTTP connection pool and the session.
#[derive(Clone)]
pub struct MbBankClient {
    http_client: Client,
    base_url: String,
    username: String,
    password: String,
    session_id: Arc<RwLock<Option<String>>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginRequest<'a> {
    user_id: &'a str,
    password: &'a str,
    ref_no: String,
}

impl MbBankClient {
    /// Create a client; no request is made until `authenticate`
    pub fn new(config: &BankConfig) -> Result<Self> {
        if config.username.is_empty() || config.password.is_empty() {
            return Err(Error::Config("username and password are required".into()));
        }
        if !config.has_base_url() {
            return Err(Error::Config(
                "gateway URL is required (set MBBANK_API_URL or --api-url)".into(),
            ));
        }

        let http_client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            username: config.username.clone(),
            password: config.password.clone(),
            session_id: Arc::new(RwLock::new(None)),
        })
    }

    /// Get the base URL (for logging)
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Whether a session has been established
    pub fn is_authenticated(&self) -> bool {
        self.session_id
            .read()
            .map(|session| session.is_some())
            .unwrap_or(false)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Reference number for one request: `<user>-<local timestamp>`
    fn ref_no(&self) -> String {
        format!("{}-{}", self.username, Local::now().format("%Y%m%d%H%M%S%3f"))
    }

    fn current_session(&self) -> Result<String> {
        let session = self
            .session_id
            .read()
            .map_err(|_| Error::Authentication("Failed to acquire session lock".into()))?;
        session
            .clone()
            .ok_or_else(|| Error::Authentication("not logged in; call authenticate first".into()))
    }

    /// POST a gateway call and return its raw payload
    async fn call(&self, path: &str, args: Map<String, Value>) -> Result<Value> {
        let mut body = Map::new();
        body.insert("sessionId".into(), Value::String(self.current_session()?));
        body.insert("refNo".into(), Value::String(self.ref_no()));
        body.extend(args);

        debug!(path, "Calling banking gateway");

        let response = self
            .http_client
            .post(self.url(path))
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let payload: Value = response.json().await?;
        check_result(&payload)?;
        Ok(payload)
    }
}

/// Turn a non-OK `result` block into an upstream error
///
/// Payloads without a `result` block are accepted as-is.
pub(crate) fn check_result(payload: &Value) -> Result<()> {
    let Some(result) = payload.get("result") else {
        return Ok(());
    };
    if result.get("ok").and_then(Value::as_bool).unwrap_or(true) {
        return Ok(());
    }

    let field = |key: &str| match result.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    };
    Err(Error::Upstream {
        code: field("responseCode"),
        message: field("message"),
    })
}

fn wire_date(date: NaiveDate) -> Value {
    Value::String(date.format(WIRE_DATE_FORMAT).to_string())
}

fn args(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

#[async_trait]
impl BankingBackend for MbBankClient {
    async fn authenticate(&self) -> Result<()> {
        let request = LoginRequest {
            user_id: &self.username,
            password: &self.password,
            ref_no: self.ref_no(),
        };

        let response = self
            .http_client
            .post(self.url(LOGIN_PATH))
            .json(&request)
            .send()
            .await?
            .error_for_status()?;

        let payload: Value = response.json().await?;
        check_result(&payload).map_err(|e| match e {
            Error::Upstream { code, message } => {
                Error::Authentication(format!("login rejected ({}): {}", code, message))
            }
            other => other,
        })?;

        let session_id = payload
            .get("sessionId")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| Error::Authentication("login response has no sessionId".into()))?
            .to_string();

        let mut session = self
            .session_id
            .write()
            .map_err(|_| Error::Authentication("Failed to acquire session lock".into()))?;
        *session = Some(session_id);

        info!(user = %self.username, "Authenticated with banking gateway");
        Ok(())
    }

    async fn get_balance(&self) -> Result<Value> {
        self.call(BALANCE_PATH, Map::new()).await
    }

    async fn get_transaction_account_history(
        &self,
        account_no: &str,
        from_date: NaiveDate,
        to_date: NaiveDate,
    ) -> Result<Value> {
        self.call(
            ACCOUNT_HISTORY_PATH,
            args(json!({
                "accountNo": account_no,
                "fromDate": wire_date(from_date),
                "toDate": wire_date(to_date),
            })),
        )
        .await
    }

    async fn get_card_list(&self) -> Result<Value> {
        self.call(CARD_LIST_PATH, Map::new()).await
    }

    async fn get_card_transaction_history(
        &self,
        card_no: &str,
        from_date: NaiveDate,
        to_date: NaiveDate,
    ) -> Result<Value> {
        self.call(
            CARD_HISTORY_PATH,
            args(json!({
                "cardNo": card_no,
                "fromDate": wire_date(from_date),
                "toDate": wire_date(to_date),
            })),
        )
        .await
    }

    async fn get_saving_list(&self) -> Result<Value> {
        self.call(SAVING_LIST_PATH, Map::new()).await
    }

    async fn get_saving_detail(
        &self,
        account_no: &str,
        account_type: SavingAccountType,
    ) -> Result<Value> {
        self.call(
            SAVING_DETAIL_PATH,
            args(json!({
                "accNo": account_no,
                "accType": account_type.as_str(),
            })),
        )
        .await
    }

    async fn get_interest_rate(&self, currency: RateCurrency) -> Result<Value> {
        self.call(
            INTEREST_RATE_PATH,
            args(json!({ "currency": currency.as_str() })),
        )
        .await
    }
}
