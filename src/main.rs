mod cli;
mod config;
mod engine;
mod error;
mod model;
mod report;
mod sample;
mod session;
mod storage;
mod text_summary;
#[cfg(feature = "tui")]
mod tui;

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

fn main() {
    let args = cli::Cli::parse();

    if let Err(e) = init_tracing(&args).and_then(|()| cli::run(args)) {
        eprintln!("strategy-lab error: {e:#}");
        std::process::exit(1);
    }
}

/// Logs go to stderr in one-shot modes and to `--log-file` when given.
/// The TUI owns the terminal, so without a log file it logs nowhere.
fn init_tracing(args: &cli::Cli) -> Result<()> {
    let level = if args.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("STRATEGY_LAB_LOG").unwrap_or_else(|_| EnvFilter::new(level));

    if let Some(path) = args.log_file.as_deref() {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("open log file {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .try_init()
            .map_err(|e| anyhow::anyhow!("failed to initialize tracing subscriber: {e}"))?;
    } else if !args.is_interactive() || cfg!(not(feature = "tui")) {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|e| anyhow::anyhow!("failed to initialize tracing subscriber: {e}"))?;
    }
    Ok(())
}
