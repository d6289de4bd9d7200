//! CLI command implementations
//!
//! - `serve` - Credential resolution, authentication, transport selection
//! - `tools` - Tool registry listing

pub mod serve;
pub mod tools;

// Re-export command functions for main.rs
pub use serve::*;
pub use tools::*;
