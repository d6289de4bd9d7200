//! MB Bank MCP Server
//!
//! Hosts the MB Bank tool set over the Model Context Protocol, either on
//! standard input/output or over Streamable HTTP.

pub mod mcp;

pub use mcp::{serve_stdio, start_mcp_server, BankMcpServer};
