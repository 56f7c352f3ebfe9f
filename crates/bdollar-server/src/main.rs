//! Binary Dollar token server
//!
//! Serves the token management and connection endpoints over HTTP, backed by
//! an in-memory store that lives as long as the process.
//!
//! # Usage
//!
//! ```bash
//! # Defaults: 127.0.0.1:3000, routes under /api/binary-dollar
//! bdollar-server
//!
//! # Custom config and bind address, no simulated latency or failures
//! bdollar-server --config ./server.toml --bind 0.0.0.0:8080 --no-faults
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use bdollar_server::{AppState, secret_generator};
use bdollar_server::config::ServerConfig;
use bdollar_server::error::Result;
use bdollar_server::fault::FixedFaultInjector;
use bdollar_server::routes::build_router;
use bdollar_server::server::Server;
use clap::Parser;
use signal_hook::consts::signal::{SIGINT, SIGTERM};
use signal_hook_tokio::Signals;
use tokio::sync::broadcast;
use tracing::{error, info};

/// Binary Dollar token server
#[derive(Parser, Debug)]
#[command(name = "bdollar-server")]
#[command(about = "Demo HTTP service for Binary Dollar API tokens")]
#[command(version)]
struct Args {
    /// Path to a TOML config file (default: ~/.config/bdollar/server.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bind address, overrides the config file
    #[arg(short, long)]
    bind: Option<String>,

    /// Answer /connect immediately and never inject failures
    #[arg(long)]
    no_faults: bool,
}

/// Initializes structured logging with tracing.
///
/// Supports two output formats via `BDOLLAR_LOG_FORMAT` environment variable:
/// - `json`: Machine-readable JSON logs
/// - `pretty`: Human-readable formatted logs (default)
///
/// Log level is controlled via `RUST_LOG` environment variable.
fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt};

    let format = std::env::var("BDOLLAR_LOG_FORMAT")
        .unwrap_or_else(|_| "pretty".to_string())
        .to_lowercase();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("bdollar_server=info,tower_http=info"));

    match format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .init();
        }
        _ => {
            fmt()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .init();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_tracing();

    info!("Starting Binary Dollar token server");

    let mut config = match ServerConfig::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {e}");
            error!("Expected config at: {:?}", ServerConfig::config_path());
            return Err(e);
        }
    };

    if let Some(bind) = args.bind {
        config.server.bind = bind;
        config.validate()?;
    }

    let state = if args.no_faults {
        info!("Fault injection disabled");
        AppState::with_faults(
            &config,
            secret_generator(&config),
            Arc::new(FixedFaultInjector::healthy()),
        )?
    } else {
        info!(
            delay_ms = config.simulation.connect_delay_ms,
            failure_probability = config.simulation.failure_probability,
            "Simulating connect latency and failures"
        );
        AppState::from_config(&config)?
    };

    let router = build_router(Arc::new(state), &config.server.base_path);

    // Create shutdown channel
    let (shutdown_tx, _) = broadcast::channel(1);

    // Set up signal handlers
    let mut signals = Signals::new([SIGTERM, SIGINT])?;
    let shutdown_tx_clone = shutdown_tx.clone();
    tokio::spawn(async move {
        use futures::stream::StreamExt;
        while let Some(signal) = signals.next().await {
            match signal {
                SIGTERM => {
                    info!("Received SIGTERM, initiating graceful shutdown");
                    let _ = shutdown_tx_clone.send(());
                    break;
                }
                SIGINT => {
                    info!("Received SIGINT, initiating graceful shutdown");
                    let _ = shutdown_tx_clone.send(());
                    break;
                }
                _ => {}
            }
        }
    });

    let server = Server::bind(config.bind_addr()?, router, shutdown_tx).await?;

    info!(
        "API base: http://{}{}",
        server.local_addr()?,
        config.server.base_path
    );

    server.run().await?;

    info!("Server shutdown complete");

    Ok(())
}
