//! Server command implementation

use anyhow::{bail, Context, Result};
use mbbank_core::{BackendKind, BankClient, BankConfig, BankingBackend};

/// Flag value if given, else the looked-up variable; blank counts as unset
fn flag_or_env(
    flag: Option<&str>,
    env_var: &str,
    lookup: &impl Fn(&str) -> Option<String>,
) -> Option<String> {
    flag.map(str::to_string)
        .or_else(|| lookup(env_var))
        .filter(|value| !value.trim().is_empty())
}

/// Both credentials, or an error naming what is missing
pub fn require_credentials(
    username: Option<String>,
    password: Option<String>,
) -> Result<(String, String)> {
    match (username, password) {
        (Some(username), Some(password)) => Ok((username, password)),
        _ => bail!(
            "Username and password must be provided (--username/--password or \
             MBBANK_USERNAME/MBBANK_PASSWORD), check --help"
        ),
    }
}

/// Build the banking configuration from flags and the process environment
pub fn resolve_config(
    username: Option<&str>,
    password: Option<&str>,
    api_url: Option<&str>,
) -> Result<BankConfig> {
    resolve_config_with(username, password, api_url, |key| std::env::var(key).ok())
}

/// Build the banking configuration from flags and `lookup`
///
/// Flags win over variables. The http backend needs a gateway URL; there is
/// no built-in one.
pub fn resolve_config_with(
    username: Option<&str>,
    password: Option<&str>,
    api_url: Option<&str>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<BankConfig> {
    let (username, password) = require_credentials(
        flag_or_env(username, "MBBANK_USERNAME", &lookup),
        flag_or_env(password, "MBBANK_PASSWORD", &lookup),
    )?;

    let mut config = BankConfig::from_lookup(username, password, &lookup);
    if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
        config = config.with_base_url(url);
    }

    if config.backend == BackendKind::Http && !config.has_base_url() {
        bail!(
            "No banking gateway configured: set --api-url or MBBANK_API_URL to a compatible \
             JSON gateway (or MBBANK_BACKEND=mock for canned data)"
        );
    }
    Ok(config)
}

pub async fn cmd_serve(config: BankConfig, http: bool, host: &str, port: u16) -> Result<()> {
    // stdout belongs to the stdio transport, so all status output goes to stderr
    eprintln!("Starting MB Bank MCP server...");
    eprintln!("   Gateway: {}", config.base_url);
    eprintln!("   User: {}", config.username);

    let client = BankClient::from_config(&config).context("Failed to create banking client")?;
    tracing::debug!(backend = client.backend_name(), "Banking client ready");

    // Fail fast on bad credentials before any MCP client connects
    client
        .authenticate()
        .await
        .context("Failed to authenticate with MB Bank")?;
    eprintln!("Authenticated successfully.");

    if http {
        eprintln!("   Streamable HTTP: http://{}:{}/mcp", host, port);
        eprintln!("   Press Ctrl+C to stop");
        mbbank_server::start_mcp_server(client, host, port).await
    } else {
        eprintln!("Start stdio server");
        mbbank_server::serve_stdio(client).await
    }
}
