//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use clap::{Parser, Subcommand};

/// MB Bank MCP - Query your MB Bank account from an MCP client
#[derive(Parser)]
#[command(name = "mbbank-mcp")]
#[command(about = "MCP server for MB Bank accounts", long_about = None)]
#[command(version)]
pub struct Cli {
    /// MB Bank username
    ///
    /// If not provided, it will be read from the MBBANK_USERNAME environment variable.
    #[arg(long, global = true)]
    pub username: Option<String>,

    /// MB Bank password
    ///
    /// If not provided, it will be read from the MBBANK_PASSWORD environment variable.
    #[arg(long, global = true)]
    pub password: Option<String>,

    /// Banking gateway base URL (overrides MBBANK_API_URL)
    ///
    /// Required for the http backend; there is no default. The URL must point at
    /// a gateway or proxy speaking the simplified JSON session protocol (login
    /// returns a sessionId), not at the bank's public web endpoints.
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Host to bind the HTTP transport to
    #[arg(long, default_value = "localhost")]
    pub host: String,

    /// Port for the HTTP transport
    #[arg(short, long, default_value = "3000")]
    pub port: u16,

    /// Serve over Streamable HTTP instead of stdio
    ///
    /// The endpoint is http://<host>:<port>/mcp. Without this flag the server
    /// speaks MCP on standard input/output.
    #[arg(long, alias = "sse")]
    pub http: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the tools this server exposes
    Tools {
        /// Also print each tool's JSON input schema
        #[arg(long)]
        schema: bool,
    },
}
