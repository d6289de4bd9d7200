//! Authenticated banking client abstraction
//!
//! The normalizers never talk HTTP themselves: they call one of the seven
//! gateway operations on a `BankingBackend` and reshape the raw mapping it
//! returns.
//!
//! # Architecture
//!
//! - `BankingBackend` trait: the seven raw queries plus one-time login
//! - `BankClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `MbBankClient` (HTTP gateway), `MockBankClient`
//!
//! # Configuration
//!
//! Environment variables (read by `BankConfig::from_env_with_credentials`):
//! - `MBBANK_BACKEND`: Backend to use (http, mock). Default: http
//! - `MBBANK_API_URL`: Base URL of a JSON banking gateway. No default; the http
//!   backend refuses to start without one
//! - `MBBANK_TIMEOUT_SECS`: Per-request timeout. Default: 30
//!
//! The http backend speaks a simplified session protocol (see `http`). It is
//! meant for a gateway or proxy that exposes that protocol, not for the bank's
//! public web endpoints, which also require captcha and device fields.

pub(crate) mod http;
pub(crate) mod mock;

pub use http::MbBankClient;
pub use mock::{MockBankClient, MOCK_SAVING_ACCOUNT};

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;

use crate::error::Result;
use crate::models::{RateCurrency, SavingAccountType};

/// Default per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Trait defining the raw banking queries
///
/// Every query returns the gateway's JSON mapping as-is. Failures (network,
/// expired session, non-OK result block) surface as `Err` and are never
/// retried here.
#[async_trait]
pub trait BankingBackend: Send + Sync {
    /// Log in once; later calls reuse the session
    async fn authenticate(&self) -> Result<()>;

    /// Balances for all current and international accounts
    async fn get_balance(&self) -> Result<Value>;

    /// Ledger of one account between two dates (inclusive)
    async fn get_transaction_account_history(
        &self,
        account_no: &str,
        from_date: NaiveDate,
        to_date: NaiveDate,
    ) -> Result<Value>;

    /// Closed, active and other cards
    async fn get_card_list(&self) -> Result<Value>;

    /// Ledger of one card between two dates (inclusive)
    async fn get_card_transaction_history(
        &self,
        card_no: &str,
        from_date: NaiveDate,
        to_date: NaiveDate,
    ) -> Result<Value>;

    /// Online and term savings accounts
    async fn get_saving_list(&self) -> Result<Value>;

    /// Detail of one savings account; `detailSaving` may be absent
    async fn get_saving_detail(
        &self,
        account_no: &str,
        account_type: SavingAccountType,
    ) -> Result<Value>;

    /// Published rate tiers for a currency
    async fn get_interest_rate(&self, currency: RateCurrency) -> Result<Value>;
}

/// Which backend `BankClient::from_config` builds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    #[default]
    Http,
    Mock,
}

impl std::str::FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "http" | "mbbank" => Ok(Self::Http),
            "mock" => Ok(Self::Mock),
            _ => Err(format!("Unknown banking backend: {}", s)),
        }
    }
}

/// Banking client configuration
#[derive(Clone)]
pub struct BankConfig {
    pub backend: BackendKind,
    pub base_url: String,
    pub username: String,
    pub password: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for BankConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BankConfig")
            .field("backend", &self.backend)
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl BankConfig {
    /// Configuration with built-in defaults for everything but credentials
    ///
    /// The gateway URL starts empty and must be set before building an http client.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            backend: BackendKind::default(),
            base_url: String::new(),
            username: username.into(),
            password: password.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Credentials from the caller, everything else from the environment
    pub fn from_env_with_credentials(
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self::from_lookup(username, password, |key| std::env::var(key).ok())
    }

    /// Credentials from the caller, everything else from `lookup`
    pub fn from_lookup(
        username: impl Into<String>,
        password: impl Into<String>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let mut config = Self::new(username, password);

        if let Some(backend) = lookup("MBBANK_BACKEND") {
            match backend.parse() {
                Ok(kind) => config.backend = kind,
                Err(e) => tracing::warn!(error = %e, "Ignoring MBBANK_BACKEND, using http"),
            }
        }
        if let Some(url) = lookup("MBBANK_API_URL") {
            if !url.trim().is_empty() {
                config = config.with_base_url(&url);
            }
        }
        if let Some(secs) = lookup("MBBANK_TIMEOUT_SECS") {
            match secs.parse::<u64>() {
                Ok(secs) if secs > 0 => config.timeout = Duration::from_secs(secs),
                _ => tracing::warn!(value = %secs, "Ignoring invalid MBBANK_TIMEOUT_SECS"),
            }
        }

        config
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_backend(mut self, backend: BackendKind) -> Self {
        self.backend = backend;
        self
    }

    /// Whether a gateway URL has been configured
    pub fn has_base_url(&self) -> bool {
        !self.base_url.trim().is_empty()
    }
}

/// Concrete banking client enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
/// All variants implement the same BankingBackend operations.
#[derive(Clone)]
pub enum BankClient {
    /// JSON gateway over HTTP
    Http(MbBankClient),
    /// Canned payloads for testing and offline runs
    Mock(MockBankClient),
}

impl BankClient {
    /// Build the client selected by `config.backend`
    pub fn from_config(config: &BankConfig) -> Result<Self> {
        match config.backend {
            BackendKind::Http => Ok(BankClient::Http(MbBankClient::new(config)?)),
            BackendKind::Mock => Ok(BankClient::Mock(MockBankClient::new())),
        }
    }

    /// Create a mock client for testing
    pub fn mock() -> Self {
        BankClient::Mock(MockBankClient::new())
    }

    /// Backend name (for logging)
    pub fn backend_name(&self) -> &'static str {
        match self {
            BankClient::Http(_) => "http",
            BankClient::Mock(_) => "mock",
        }
    }
}

#[async_trait]
impl BankingBackend for BankClient {
    async fn authenticate(&self) -> Result<()> {
        match self {
            BankClient::Http(c) => c.authenticate().await,
            BankClient::Mock(c) => c.authenticate().await,
        }
    }

    async fn get_balance(&self) -> Result<Value> {
        match self {
            BankClient::Http(c) => c.get_balance().await,
            BankClient::Mock(c) => c.get_balance().await,
        }
    }

    async fn get_transaction_account_history(
        &self,
        account_no: &str,
        from_date: NaiveDate,
        to_date: NaiveDate,
    ) -> Result<Value> {
        match self {
            BankClient::Http(c) => {
                c.get_transaction_account_history(account_no, from_date, to_date)
                    .await
            }
            BankClient::Mock(c) => {
                c.get_transaction_account_history(account_no, from_date, to_date)
                    .await
            }
        }
    }

    async fn get_card_list(&self) -> Result<Value> {
        match self {
            BankClient::Http(c) => c.get_card_list().await,
            BankClient::Mock(c) => c.get_card_list().await,
        }
    }

    async fn get_card_transaction_history(
        &self,
        card_no: &str,
        from_date: NaiveDate,
        to_date: NaiveDate,
    ) -> Result<Value> {
        match self {
            BankClient::Http(c) => {
                c.get_card_transaction_history(card_no, from_date, to_date)
                    .await
            }
            BankClient::Mock(c) => {
                c.get_card_transaction_history(card_no, from_date, to_date)
                    .await
            }
        }
    }

    async fn get_saving_list(&self) -> Result<Value> {
        match self {
            BankClient::Http(c) => c.get_saving_list().await,
            BankClient::Mock(c) => c.get_saving_list().await,
        }
    }

    async fn get_saving_detail(
        &self,
        account_no: &str,
        account_type: SavingAccountType,
    ) -> Result<Value> {
        match self {
            BankClient::Http(c) => c.get_saving_detail(account_no, account_type).await,
            BankClient::Mock(c) => c.get_saving_detail(account_no, account_type).await,
        }
    }

    async fn get_interest_rate(&self, currency: RateCurrency) -> Result<Value> {
        match self {
            BankClient::Http(c) => c.get_interest_rate(currency).await,
            BankClient::Mock(c) => c.get_interest_rate(currency).await,
        }
    }
}
