// src/main.rs

//! dropwatch: Share-Link Archive Monitor CLI
//!
//! Performs one fetch / diff / notify run and exits. Periodic execution
//! is expected to come from an external scheduler such as cron.

use std::path::PathBuf;

use clap::Parser;

use dropwatch::config::Config;
use dropwatch::error::Result;
use dropwatch::pipeline::run_monitor;

#[derive(Parser, Debug)]
#[command(
    name = "dropwatch",
    version = "0.1.0",
    about = "Share-link archive monitor"
)]

/// CLI Arguments
struct Cli {
    /// Directory downloaded files are stored in (overrides STORAGE_DIR)
    #[arg(long)]
    storage_dir: Option<PathBuf>,

    /// Path of the snapshot file (overrides SNAPSHOT_FILE)
    #[arg(long)]
    snapshot: Option<PathBuf>,
}

/// Main entry point
#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = Config::from_env();
    if let Some(dir) = cli.storage_dir {
        config.storage_dir = dir;
    }
    if let Some(path) = cli.snapshot {
        config.snapshot_path = path;
    }
    config.validate()?;

    run_monitor(&config).await
}
