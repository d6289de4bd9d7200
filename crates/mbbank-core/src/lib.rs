//! MB Bank MCP Core Library
//!
//! Shared functionality for the MB Bank MCP server:
//! - Banking client abstraction (HTTP gateway and mock backends)
//! - Raw gateway payload and normalized response models
//! - Tool implementations that reshape raw payloads into stable responses
//! - Tool registry with JSON Schemas for tool arguments

pub mod client;
pub mod error;
pub mod models;
pub mod tools;

/// Test utilities including mock banking gateway
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use client::{
    BackendKind, BankClient, BankConfig, BankingBackend, MbBankClient, MockBankClient,
};
pub use error::{Error, Result};
pub use models::{RateCurrency, SavingAccountType, SavingDetailResult};
pub use tools::{bank_tools, parse_bank_date, today_date, ToolSpec};
