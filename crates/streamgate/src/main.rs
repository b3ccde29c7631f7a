//! StreamGate - log/telemetry ingest gateway
//!
//! # Usage
//!
//! ```bash
//! # Run with defaults (TCP :8081, UDP :8082, control store on :6379)
//! streamgate
//!
//! # Run with a config file and verbose logging
//! streamgate --config configs/config.toml --log-level debug
//! ```

mod cmd;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// StreamGate - log/telemetry ingest-and-forwarding gateway
#[derive(Parser, Debug)]
#[command(name = "streamgate")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level)?;
    cmd::serve::run(cli.config).await
}

/// Initialize the tracing subscriber for logging
fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(level)
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| anyhow::anyhow!("invalid log level: {}", e))?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(false))
        .with(filter)
        .init();

    Ok(())
}
