//! Method override demo server.
//!
//! ```text
//!     Client (POST + X-HTTP-Method-Override: DELETE)
//!        │
//!        ▼
//!   ┌──────────┐    ┌───────────────────┐    ┌──────────┐
//!   │ listener │───▶│ MethodOverride    │───▶│  Router  │──▶ DELETE handler
//!   └──────────┘    │ (before routing)  │    └──────────┘
//!                   └───────────────────┘
//!                            │
//!                            └── Vary: X-HTTP-Method-Override
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use method_override::config::{load_config, validate_config, ServerConfig};
use method_override::lifecycle::{signals, Shutdown};
use method_override::observability::{logging, metrics};
use method_override::HttpServer;

#[derive(Parser)]
#[command(name = "method-override")]
#[command(about = "Demo server applying HTTP method override ahead of routing", long_about = None)]
struct Cli {
    /// Path to a TOML config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,

    /// Header name (`X-` prefix) or query key to read the override from.
    #[arg(short, long)]
    source: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }
    if let Some(source) = cli.source {
        config.method_override.source = source;
    }

    logging::init_logging(&config.observability);
    tracing::info!("method-override v{} starting", env!("CARGO_PKG_VERSION"));

    if let Err(errors) = validate_config(&config) {
        for error in &errors {
            tracing::error!(error = %error, "Invalid configuration");
        }
        return Err(format!("{} configuration error(s)", errors.len()).into());
    }

    tracing::info!(
        bind_address = %config.listener.bind_address,
        source = %config.method_override.source,
        methods = %config.method_override.methods,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(signals::trigger_on_signal(shutdown.clone()));

    let server = HttpServer::new(config)?;
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
