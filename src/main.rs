//! Churn prediction service.
//!
//! Serves a pre-trained churn classifier over HTTP.
//!
//! # Architecture Overview
//!
//! ```text
//!                          ┌──────────────────────────────────────────────────────┐
//!                          │                     CHURN SERVE                       │
//!                          │                                                       │
//!   POST /predict          │  ┌─────────┐   ┌───────────┐   ┌─────────┐           │
//!   ───────────────────────┼─▶│  http   │──▶│ features  │──▶│ features│           │
//!                          │  │ server  │   │ validator │   │ mapper  │           │
//!                          │  └─────────┘   └───────────┘   └────┬────┘           │
//!                          │                                     │                 │
//!                          │                                     ▼                 │
//!   {churn_label,          │  ┌─────────┐                  ┌───────────┐          │
//!    probability,          │  │response │◀─────────────────│   model   │          │
//!    model_version}        │  │  JSON   │                  │ predictor │          │
//!   ◀──────────────────────┼──└─────────┘                  └─────┬─────┘          │
//!                          │                                     │ fire & forget   │
//!                          │                                     ▼                 │
//!                          │                              ┌─────────────┐          │
//!                          │                              │ persistence │          │
//!                          │                              │  recorder   │          │
//!                          │                              └─────────────┘          │
//!                          │  ┌─────────────────────────────────────────────────┐  │
//!                          │  │ config · observability · lifecycle              │  │
//!                          │  └─────────────────────────────────────────────────┘  │
//!                          └──────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tokio::net::TcpListener;

use churn_serve::config::{load_config, ServiceConfig};
use churn_serve::http::HttpServer;
use churn_serve::lifecycle::{bootstrap, signals, Shutdown};
use churn_serve::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "churn-serve")]
#[command(about = "Serve churn predictions from a pre-trained model", long_about = None)]
struct Args {
    /// Path to a TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => ServiceConfig::default(),
    };

    logging::init_logging(&config.observability)?;

    tracing::info!("churn-serve v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        artifact = %config.model.artifact_path.display(),
        store_enabled = config.store.enabled,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let app = match bootstrap(config) {
        Ok(app) => app,
        Err(e) => {
            tracing::error!(error = %e, "Startup failed, refusing to serve");
            return Err(e.into());
        }
    };

    if app.config.observability.metrics_enabled {
        if let Ok(addr) = app.config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %app.config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    // Bind TCP listener
    let listener = TcpListener::bind(&app.config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!(
        address = %local_addr,
        "Listening for connections"
    );

    let grace = Duration::from_secs(app.config.timeouts.shutdown_grace_secs);
    let shutdown = Shutdown::new();
    let server = HttpServer::new(app);
    let server_task = tokio::spawn(server.run(listener, shutdown.subscribe()));

    signals::wait_for_shutdown_signal().await;
    shutdown.drain(server_task, grace).await;

    tracing::info!("Shutdown complete");
    Ok(())
}
