//! Wagerbook Server
//!
//! Record-keeping service for betting activity and its cash wallet, guarded
//! by role-based bearer tokens.
//!
//! # Usage
//!
//! ```bash
//! # Start with a signing key from the environment
//! SIGNING_KEY=... wagerbook-server
//!
//! # Start with a custom config file
//! wagerbook-server --config /path/to/config.toml
//!
//! # Start with environment overrides
//! WAGERBOOK__SERVER__PORT=8080 wagerbook-server
//! ```

mod config;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::signal;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use wagerbook_api::{create_router, ApiConfig, AppState};
use wagerbook_auth::{TokenAuthority, TokenConfig};
use wagerbook_ledger::{BetBook, LedgerGuard};

use crate::config::ServerConfig;

// =============================================================================
// CLI Arguments
// =============================================================================

/// Wagerbook Server - betting records and wallet ledger
#[derive(Parser, Debug)]
#[command(name = "wagerbook-server")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (TOML, JSON, or YAML)
    #[arg(short, long, env = "WAGERBOOK_CONFIG")]
    config: Option<String>,

    /// Host to bind to
    #[arg(long, env = "WAGERBOOK_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "WAGERBOOK_PORT")]
    port: Option<u16>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "WAGERBOOK_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format (json, pretty)
    #[arg(long, env = "WAGERBOOK_LOG_FORMAT")]
    log_format: Option<String>,

    /// Token signing key
    #[arg(long, env = "SIGNING_KEY", hide_env_values = true)]
    signing_key: Option<String>,

    /// Token lifetime in seconds
    #[arg(long, env = "TOKEN_LIFETIME_SECS")]
    token_lifetime_secs: Option<u64>,
}

impl Args {
    /// Apply CLI overrides on top of the loaded configuration
    fn apply(self, config: &mut ServerConfig) {
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(level) = self.log_level {
            config.logging.level = level;
        }
        if let Some(format) = self.log_format {
            config.logging.format = format;
        }
        if let Some(key) = self.signing_key {
            config.auth.signing_key = key;
        }
        if let Some(secs) = self.token_lifetime_secs {
            config.auth.token_lifetime = Duration::from_secs(secs);
        }
    }
}

// =============================================================================
// Main Entry Point
// =============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut server_config = ServerConfig::load(args.config.as_deref())?;
    args.apply(&mut server_config);

    init_logging(&server_config.logging);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting Wagerbook server"
    );

    let auth = init_auth(&server_config.auth)?;

    let state = Arc::new(AppState::with_stores(auth, LedgerGuard::new(), BetBook::new()));

    let api_config = ApiConfig {
        enable_cors: server_config.api.enable_cors,
        cors_origins: server_config.api.cors_origins.clone(),
        enable_tracing: server_config.api.enable_tracing,
    };

    let app = create_router(state, api_config);

    if server_config.metrics.enabled {
        start_metrics_server(&server_config.metrics)?;
    }

    let addr = server_config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(
        host = %server_config.server.host,
        port = %server_config.server.port,
        "Server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

// =============================================================================
// Initialization Functions
// =============================================================================

/// Initialize tracing/logging
fn init_logging(config: &config::LoggingConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let subscriber = tracing_subscriber::registry().with(env_filter);

    match config.format.as_str() {
        "json" => {
            subscriber
                .with(fmt::layer().json().with_target(true))
                .init();
        }
        _ => {
            subscriber
                .with(fmt::layer().pretty().with_target(true))
                .init();
        }
    }
}

/// Build the token authority; a missing or invalid signing key is fatal
fn init_auth(config: &TokenConfig) -> anyhow::Result<Arc<TokenAuthority>> {
    let authority = TokenAuthority::new(config.clone())
        .map_err(|e| anyhow::anyhow!("cannot start token authority: {}", e))?;

    tracing::info!(
        issuer = %config.issuer,
        lifetime = ?config.token_lifetime,
        "Token authority initialized"
    );

    Ok(Arc::new(authority))
}

/// Install the Prometheus exporter on its own port
fn start_metrics_server(config: &config::MetricsConfig) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;

    tracing::info!(port = config.port, "Metrics exporter started");
    Ok(())
}

// =============================================================================
// Graceful Shutdown
// =============================================================================

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
