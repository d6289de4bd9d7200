//! MCP (Model Context Protocol) Server for MB Bank
//!
//! Exposes read-only MB Bank queries to LLMs via MCP tools.
//! The authenticated banking client is injected at construction; the server
//! keeps no other state, so concurrent tool calls are independent.
//!
//! # Transports
//!
//! - stdio (default): one client over standard input/output
//! - Streamable HTTP: `http://<host>:<port>/mcp`
//!
//! # Example
//!
//! ```bash
//! # stdio, for desktop MCP clients
//! mbbank-mcp --username 0912345678 --password ...
//!
//! # HTTP
//! mbbank-mcp --http --host 0.0.0.0 --port 3000
//! ```
//!
//! # Available Tools
//!
//! - `get_balances` - Balances of all current and international accounts
//! - `get_today_date` - Today's date in the dd-mm-yyyy argument format
//! - `get_transactions` - Account ledger for a date range
//! - `get_cards` - Closed, active and other cards
//! - `get_card_transactions` - Card ledger for a date range
//! - `get_savings` - Online and term savings accounts
//! - `get_saving_details` - Detail of one savings account
//! - `get_interest_rates` - Savings rate tiers for VND, USD or EUR

mod tools;

use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{
        CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
    },
    tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler, ServiceExt,
};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::info;

use mbbank_core::{BankClient, Error};

pub use tools::*;

/// MB Bank MCP Server state
#[derive(Clone)]
pub struct BankMcpServer {
    /// Authenticated banking client shared by all tool calls
    client: BankClient,
    /// Tool router for MCP operations
    tool_router: ToolRouter<Self>,
}

impl BankMcpServer {
    /// Create a new MCP server around an authenticated client
    pub fn new(client: BankClient) -> Self {
        Self {
            client,
            tool_router: Self::bank_tool_router(),
        }
    }

    /// Tool router with descriptions taken from the shared tool registry
    fn bank_tool_router() -> ToolRouter<Self> {
        let mut router = Self::tool_router();
        for tool in bank_tools() {
            if let Some(route) = router.map.get_mut(tool.name) {
                route.attr.description = Some(tool.description.into());
            }
        }
        router
    }
}

/// Map a core error onto an MCP error
///
/// Bad caller input is reported as invalid params; everything else is an
/// internal error of this invocation.
fn to_mcp_error(e: Error) -> McpError {
    match e {
        Error::InvalidDateFormat(_) => McpError::invalid_params(e.to_string(), None),
        _ => McpError::internal_error(e.to_string(), None),
    }
}

/// Render a tool result as pretty JSON text content
fn json_content<T: Serialize>(result: mbbank_core::Result<T>) -> Result<CallToolResult, McpError> {
    let value = result.map_err(to_mcp_error)?;
    let text = serde_json::to_string_pretty(&value)
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

#[tool_handler]
impl ServerHandler for BankMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "mbbank-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: Some("MB Bank".to_string()),
                website_url: Some("https://github.com/thedtvn/mbbank-mcp".to_string()),
                icons: None,
            },
            instructions: Some(
                "Read-only access to an MB Bank account: balances, transactions, cards, \
                 savings and interest rates. Get account numbers from get_balances, card IDs \
                 from get_cards and savings account numbers from get_savings. Dates are \
                 dd-mm-yyyy; call get_today_date to build a valid range."
                    .to_string(),
            ),
        }
    }
}

#[tool_router]
impl BankMcpServer {
    /// Balances of all accounts
    #[tool]
    async fn get_balances(&self) -> Result<CallToolResult, McpError> {
        json_content(tools::get_balances(&self.client).await)
    }

    /// Today's date in the argument format
    #[tool]
    async fn get_today_date(&self) -> Result<CallToolResult, McpError> {
        Ok(CallToolResult::success(vec![Content::text(tools::get_today_date())]))
    }

    /// Account ledger for a date range
    #[tool]
    async fn get_transactions(
        &self,
        Parameters(params): Parameters<TransactionsParams>,
    ) -> Result<CallToolResult, McpError> {
        json_content(tools::get_transactions(&self.client, params).await)
    }

    /// Card buckets
    #[tool]
    async fn get_cards(&self) -> Result<CallToolResult, McpError> {
        json_content(tools::get_cards(&self.client).await)
    }

    /// Card ledger for a date range
    #[tool]
    async fn get_card_transactions(
        &self,
        Parameters(params): Parameters<CardTransactionsParams>,
    ) -> Result<CallToolResult, McpError> {
        json_content(tools::get_card_transactions(&self.client, params).await)
    }

    /// Online and term savings
    #[tool]
    async fn get_savings(&self) -> Result<CallToolResult, McpError> {
        json_content(tools::get_savings(&self.client).await)
    }

    /// Detail of one savings account
    #[tool]
    async fn get_saving_details(
        &self,
        Parameters(params): Parameters<SavingDetailsParams>,
    ) -> Result<CallToolResult, McpError> {
        json_content(tools::get_saving_details(&self.client, params).await)
    }

    /// Rate tiers for one currency
    #[tool]
    async fn get_interest_rates(
        &self,
        Parameters(params): Parameters<InterestRatesParams>,
    ) -> Result<CallToolResult, McpError> {
        json_content(tools::get_interest_rates(&self.client, params).await)
    }
}

/// Serve MCP over standard input/output until the client disconnects
pub async fn serve_stdio(client: BankClient) -> anyhow::Result<()> {
    info!("Starting MCP server on stdio");

    let service = BankMcpServer::new(client)
        .serve(rmcp::transport::stdio())
        .await?;
    service.waiting().await?;

    info!("MCP stdio session closed");
    Ok(())
}

/// Start the MCP server on the given port
pub async fn start_mcp_server(client: BankClient, host: &str, port: u16) -> anyhow::Result<()> {
    use rmcp::transport::streamable_http_server::session::local::LocalSessionManager;
    use rmcp::transport::streamable_http_server::StreamableHttpService;

    info!("Starting MCP server at http://{}:{}/mcp", host, port);

    let service = StreamableHttpService::new(
        move || Ok(BankMcpServer::new(client.clone())),
        LocalSessionManager::default().into(),
        Default::default(),
    );

    let router = axum::Router::new()
        .nest_service("/mcp", service)
        .layer(TraceLayer::new_for_http());
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("MCP server ready at http://{}/mcp", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            // Wait for shutdown signal
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;

    Ok(())
}
