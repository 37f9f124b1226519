use crate::config::LabConfig;
use crate::model::Weights;
use crate::report::{build_report, View, ViewReport};
use crate::session::Session;
use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug, Parser, Clone)]
#[command(
    name = "strategy-lab",
    version,
    about = "Strategy & research lab: market segments, interviews, hypotheses and funnel, with optional TUI"
)]
pub struct Cli {
    /// View to open in the TUI, or to print with --json/--text
    #[arg(long, value_enum)]
    pub view: Option<View>,

    /// Print the view as JSON and exit (no TUI)
    #[arg(long)]
    pub json: bool,

    /// Print a text summary of the view and exit (no TUI)
    #[arg(long)]
    pub text: bool,

    /// Weight of the TAM component of the priority score
    #[arg(long)]
    pub weight_tam: Option<f64>,

    /// Weight of the adoption-speed component of the priority score
    #[arg(long)]
    pub weight_adoption: Option<f64>,

    /// Weight of the strategic-fit component of the priority score
    #[arg(long)]
    pub weight_fit: Option<f64>,

    /// Extra TOML config file (overrides the user config file)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Export the view as JSON
    #[arg(long)]
    pub export_json: Option<PathBuf>,

    /// Export the view as CSV
    #[arg(long)]
    pub export_csv: Option<PathBuf>,

    /// Write logs to this file (the TUI logs nowhere otherwise)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn is_interactive(&self) -> bool {
        !self.json && !self.text
    }
}

/// Resolved settings: config layers plus CLI overrides.
#[derive(Debug, Clone)]
pub struct Settings {
    pub view: View,
    pub weights: Weights,
    pub funnel_step: u64,
}

/// Merge the config layers with CLI flags; flags win.
pub fn build_settings(args: &Cli) -> Result<Settings> {
    let config = LabConfig::load(args.config.as_deref()).context("load configuration")?;
    let weights = Weights {
        tam: args.weight_tam.unwrap_or(config.weights.tam),
        adoption: args.weight_adoption.unwrap_or(config.weights.adoption),
        fit: args.weight_fit.unwrap_or(config.weights.fit),
    };
    let settings = Settings {
        view: args.view.unwrap_or(config.view),
        weights,
        funnel_step: config.funnel_step,
    };
    debug!(?settings, "resolved settings");
    Ok(settings)
}

pub fn run(args: Cli) -> Result<()> {
    if args.json && args.text {
        return Err(anyhow::anyhow!("--json and --text are mutually exclusive"));
    }

    let settings = build_settings(&args)?;
    let session = Session::new(settings.weights).context("invalid priority weights")?;

    if args.is_interactive() {
        #[cfg(feature = "tui")]
        {
            return crate::tui::run(&args, settings, session);
        }
        #[cfg(not(feature = "tui"))]
        {
            // Fallback when built without TUI support.
            return run_text(&args, &settings, &session);
        }
    }

    if args.json {
        return run_json(&args, &settings, &session);
    }

    run_text(&args, &settings, &session)
}

fn run_json(args: &Cli, settings: &Settings, session: &Session) -> Result<()> {
    let report = build_report(session, settings.view)?;
    handle_exports(args, &report)?;
    let out = serde_json::to_string_pretty(&report)?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{out}").context("write stdout")?;
    Ok(())
}

fn run_text(args: &Cli, settings: &Settings, session: &Session) -> Result<()> {
    let report = build_report(session, settings.view)?;
    handle_exports(args, &report)?;
    let summary = crate::text_summary::build_text_summary(&report);
    let mut stdout = std::io::stdout().lock();
    for line in summary.lines {
        writeln!(stdout, "{line}").context("write stdout")?;
    }
    Ok(())
}

/// Handle export operations (JSON and CSV) for both text and JSON modes.
fn handle_exports(args: &Cli, report: &ViewReport) -> Result<()> {
    if let Some(p) = args.export_json.as_deref() {
        crate::storage::export_json(p, report)?;
        eprintln!("Exported JSON: {}", p.display());
    }
    if let Some(p) = args.export_csv.as_deref() {
        crate::storage::export_csv(p, report)?;
        eprintln!("Exported CSV: {}", p.display());
    }
    Ok(())
}
