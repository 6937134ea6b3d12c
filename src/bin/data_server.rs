//! Pulseboard Dataset Server
//!
//! Run with: cargo run --bin pulseboard-data
//!
//! Serves the exported datasets over HTTP for dashboards configured with
//! `source = "http"`.
//!
//! # Configuration
//!
//! Settings come from the config file (see `pulseboard config`), then
//! environment variables, then the flags below:
//! - `PULSEBOARD_DATA_DIR`: Directory to serve (default: ./data)
//! - `PULSEBOARD_SERVER_HOST`: Host to bind to (default: 127.0.0.1)
//! - `PULSEBOARD_SERVER_PORT`: Port to listen on (default: 8090)
//! - `RUST_LOG`: Log filter (default: from `[logging]`)

use std::path::PathBuf;

use clap::Parser;
use pulseboard::api::{serve, AppState};
use pulseboard::config::Config;
use pulseboard::logging::init_logging;

#[derive(Parser)]
#[command(name = "pulseboard-data")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Serve Pulseboard datasets over HTTP")]
struct Args {
    /// Config file (default: standard locations)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory of dataset files
    #[arg(short, long)]
    dir: Option<String>,

    /// Host to bind to
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(dir) = args.dir {
        config.data.dir = dir;
    }
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    init_logging(&config.logging)?;
    tracing::info!("Starting Pulseboard dataset server v{}", env!("CARGO_PKG_VERSION"));

    let state = AppState::new(&config.data.dir);
    serve(state, &config.server).await?;

    tracing::info!("Pulseboard dataset server stopped");
    Ok(())
}
