use anyhow::{bail, Context, Result};

use crate::saas_client::DEFAULT_API_BASE;

/// Which hosting protocol the binary speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    /// MCP JSON-RPC over stdin/stdout.
    Stdio,
    /// axum HTTP server.
    Http,
}

impl Binding {
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "stdio" | "mcp" => Ok(Binding::Stdio),
            "http" => Ok(Binding::Http),
            other => bail!("MCP_TRANSPORT must be 'stdio' or 'http', got '{other}'"),
        }
    }
}

/// Application configuration loaded from environment variables.
///
/// A missing `API_KEY` is not a startup error: every network-bound tool
/// reports it when called, and `check` exposes it for diagnostics.
#[derive(Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub api_base: String,
    pub binding: Binding,
    pub port: u16,
    pub rust_log: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_base", &self.api_base)
            .field("binding", &self.binding)
            .field("port", &self.port)
            .field("rust_log", &self.rust_log)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            api_key: optional_env("API_KEY"),
            api_base: optional_env("RESUME_API_BASE")
                .map(|base| base.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            binding: Binding::parse(&optional_env("MCP_TRANSPORT").unwrap_or_default())?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
