//! MB Bank MCP CLI - MCP server for an MB Bank account
//!
//! Usage:
//!   mbbank-mcp                       Serve over stdio (credentials from env)
//!   mbbank-mcp --http --port 3000    Serve over Streamable HTTP
//!   mbbank-mcp tools --schema        List tools and their argument schemas

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    // Logs go to stderr; stdout carries the stdio MCP transport
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();

    match cli.command {
        Some(Commands::Tools { schema }) => commands::cmd_tools(schema),
        None => {
            let config = commands::resolve_config(
                cli.username.as_deref(),
                cli.password.as_deref(),
                cli.api_url.as_deref(),
            )?;
            commands::cmd_serve(config, cli.http, &cli.host, cli.port).await
        }
    }
}
