//! consent-edge
//!
//! Edge routing shim for a consent-management SDK.
//!
//! # Architecture Overview
//!
//! ```text
//!     CDN request / HTTP request
//!     ───────────────────────────▶ ┌────────────┐    ┌──────────────┐
//!                                  │    edge    │───▶│   routing    │
//!                                  │   model    │    │  rewriter +  │
//!                                  └────────────┘    │  rule table  │
//!                                                    └──────┬───────┘
//!                 ┌────────────────────────┬────────────────┼──────────────────┐
//!                 ▼                        ▼                ▼                  ▼
//!           ┌──────────┐            ┌───────────┐    ┌────────────┐     ┌────────────┐
//!           │ preflight│            │ 404 Not   │    │  rewritten │     │   proxy    │──▶ SDK / API
//!           │  (cors)  │            │  Found    │    │  request   │     │   client   │    upstream
//!           └──────────┘            └───────────┘    └────────────┘     └────────────┘
//! ```
//!
//! # Commands
//! - `serve` (default): local HTTP server answering every request through the proxy client
//! - `event`: read one CDN event JSON on stdin, print the handler output JSON on stdout

use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::PathBuf;
use tokio::net::TcpListener;

use consent_edge::config::load_or_default;
use consent_edge::edge::EdgeEvent;
use consent_edge::observability::logging;
use consent_edge::{EdgeHandler, HttpServer};

#[derive(Parser)]
#[command(name = "consent-edge")]
#[command(about = "Edge routing shim for the consent SDK", long_about = None)]
struct Cli {
    /// Optional TOML configuration; built-in production values otherwise.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve HTTP locally, proxying to the upstream hosts
    Serve {
        /// Override listener.bind_address
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Handle one CDN event from stdin in origin-request mode
    Event,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let cli = Cli::parse();
    let mut config = load_or_default(cli.config.as_deref())?;

    match cli.command.unwrap_or(Commands::Serve { bind: None }) {
        Commands::Serve { bind } => {
            if let Some(bind) = bind {
                config.listener.bind_address = bind;
            }

            tracing::info!(
                bind_address = %config.listener.bind_address,
                sdk_base_url = %config.upstream.sdk_base_url,
                api_base_url = %config.upstream.api_base_url,
                timeout_ms = config.upstream.timeout_ms,
                "Configuration loaded"
            );

            let listener = TcpListener::bind(&config.listener.bind_address).await?;
            let server = HttpServer::new(config)?;
            server.run(listener, shutdown_signal()).await?;
            tracing::info!("Shutdown complete");
        }
        Commands::Event => {
            let mut raw = String::new();
            std::io::stdin().read_to_string(&mut raw)?;

            let handler = EdgeHandler::new(&config)?;
            let request = EdgeEvent::from_json(&raw)?.into_request()?;
            let output = handler.rewrite(request);
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

/// Wait for Ctrl+C.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
