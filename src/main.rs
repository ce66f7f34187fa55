//! User-agent resolution service.
//!
//! Serves every path with a JSON echo of the resolved client user-agent.
//!
//! ```text
//! Client Request
//!     → request ID → trace → timeout
//!     → user-agent layer (resolve, attach attribute)
//!     → echo handler
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use agent_resolver::config::{load_config, ServiceConfig};
use agent_resolver::observability::{logging, metrics};
use agent_resolver::HttpServer;

#[derive(Parser)]
#[command(name = "agent-resolver")]
#[command(about = "Resolve client user-agents behind trusted proxies", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServiceConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(&config.observability);

    tracing::info!("agent-resolver v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        config_path = ?cli.config,
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        trusted_proxies = config.user_agent.trusted_proxies.len(),
        headers = ?config.user_agent.headers_to_inspect,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(config);
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
