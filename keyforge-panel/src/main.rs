//! KeyForge operator panel
//!
//! Serves the JSON-lines console on stdin/stdout. Logs go to stderr.
//!
//! Usage:
//!   keyforge-panel --config panel.json

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use keyforge_panel::{Panel, PanelConfig, console};
use tokio::io::BufReader;
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "keyforge-panel")]
#[command(about = "KeyForge operator panel")]
struct Args {
    /// Path to the JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let config = match &args.config {
        Some(path) => PanelConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => {
            warn!("No config given, starting with defaults and no operators");
            PanelConfig::default()
        }
    };

    let panel = Panel::bootstrap(&config).context("Failed to bootstrap panel")?;
    info!("KeyForge panel listening on stdin");

    let handled = console::run(&panel, BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await
        .context("Console I/O failed")?;

    info!(requests = handled, "Input closed, shutting down");
    Ok(())
}
