use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use evdir_core::EvdirConfig;
use evdir_server::AppState;

#[derive(Parser)]
#[command(name = "evdir-server", version, about = "Event directory HTTP server")]
struct Args {
    /// Path to config file (default: ~/.config/evdir/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON file holding the event records
    #[arg(long)]
    data_file: Option<PathBuf>,

    /// Directory with the browser client
    #[arg(long)]
    public_dir: Option<PathBuf>,

    #[arg(long)]
    host: Option<String>,

    #[arg(long)]
    port: Option<u16>,
}

impl Args {
    fn apply(self, config: &mut EvdirConfig) {
        if let Some(data_file) = self.data_file {
            config.data_file = data_file;
        }
        if let Some(public_dir) = self.public_dir {
            config.public_dir = public_dir;
        }
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "evdir_server=info,evdir_core=info,tower_http=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let mut config = EvdirConfig::load(args.config.as_deref())?;
    args.apply(&mut config);

    let state = AppState::from_config(&config);

    // A broken data file is reported per request, so only warn here
    match state.store().load() {
        Ok(events) => tracing::info!(
            count = events.len(),
            path = %state.store().path().display(),
            "Event store ready"
        ),
        Err(e) => tracing::warn!("{}", e),
    }

    let app = evdir_server::app(&config);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("evdir-server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
