//! Error types for the MB Bank MCP server

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid date format: {0}. Use dd-mm-yyyy")]
    InvalidDateFormat(String),

    #[error("Invalid card expiry: {0:?}. Expected four digits")]
    InvalidCardExpiry(String),

    #[error("Malformed upstream payload: {0}")]
    MalformedPayload(String),

    #[error("Banking API error {code}: {message}")]
    Upstream { code: String, message: String },

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
