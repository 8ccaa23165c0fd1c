mod config;
mod errors;
mod gateway;
mod mcp;
mod routes;
mod saas_client;
mod state;
mod tools;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::BufReader;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Binding, Config};
use crate::gateway::{Credential, ResumeGateway};
use crate::routes::build_router;
use crate::saas_client::HttpTransport;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // stdout carries MCP frames; logs go to stderr
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting resume gateway v{}", env!("CARGO_PKG_VERSION"));
    info!("API base: {}", config.api_base);

    let credential = config.api_key.clone().and_then(Credential::new);
    if credential.is_none() {
        warn!("API_KEY is not set; network tools will fail until it is configured");
    }

    let gateway = Arc::new(ResumeGateway::new(
        credential,
        Arc::new(HttpTransport::new(&config.api_base)),
    ));

    match config.binding {
        Binding::Stdio => {
            info!("Serving MCP over stdio");
            mcp::serve(gateway, BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await?;
        }
        Binding::Http => {
            let app = build_router(AppState { gateway })
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive());

            let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
            info!("Listening on {addr}");

            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
