//! Locale router service.
//!
//! Serves a host route table in every configured locale, resolving the
//! locale of each request and redirecting where the strategy requires it.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────────┐
//!                      │                  LOCALE ROUTER                    │
//!                      │                                                   │
//!   Client Request     │  ┌─────────┐   ┌──────────┐   ┌──────────────┐   │
//!   ───────────────────┼─▶│  http   │──▶│ resolve  │──▶│   redirect   │   │
//!                      │  │ server  │   │ resolver │   │    engine    │   │
//!                      │  └─────────┘   └────┬─────┘   └──────┬───────┘   │
//!                      │                     │                │           │
//!                      │                     ▼                ▼           │
//!                      │              ┌────────────┐   ┌────────────┐     │
//!                      │              │  routing   │   │    seo     │     │
//!                      │              │ generated  │   │ alternates │     │
//!                      │              │   table    │   └────────────┘     │
//!                      │              └────────────┘                      │
//!   Redirect / Page    │                                                   │
//!   ◀──────────────────┼── Location + Set-Cookie, or NavigationContext     │
//!                      │                                                   │
//!                      │  ┌──────────────────────────────────────────────┐ │
//!                      │  │ config (TOML) · locale registry · observability│
//!                      │  └──────────────────────────────────────────────┘ │
//!                      └──────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use locale_router::config::{load_config, log_config_warnings, I18nConfig};
use locale_router::observability::{logging, metrics};
use locale_router::HttpServer;

#[derive(Parser)]
#[command(name = "locale-router")]
#[command(about = "Locale-aware routing service", long_about = None)]
struct Args {
    /// Configuration file (TOML); defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => I18nConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.server.bind_address = bind;
    }

    logging::init_logging(&config.observability)?;

    tracing::info!("locale-router v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.server.bind_address,
        strategy = %config.i18n.strategy,
        locales = config.i18n.locales.len(),
        routes = config.routes.len(),
        request_timeout_secs = config.server.request_secs,
        "Configuration loaded"
    );
    log_config_warnings(&config);

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.server.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(config)?;
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
