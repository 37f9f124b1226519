use crate::report::{build_report, View};
use crate::session::Session;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::mpsc as std_mpsc;
use std::sync::OnceLock;
use std::time::Duration;

use super::state::UiState;

// Global clipboard manager channel - initialized once on first use
static CLIPBOARD_SENDER: OnceLock<std_mpsc::Sender<String>> = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    fn ext(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }

    fn label(self) -> &'static str {
        match self {
            ExportFormat::Json => "JSON",
            ExportFormat::Csv => "CSV",
        }
    }
}

/// Snapshot one view into the current directory.
/// Returns the absolute path of the exported file.
pub fn export_view(session: &Session, view: View, format: ExportFormat) -> Result<PathBuf> {
    let report = build_report(session, view).context("build view report")?;
    let path = crate::storage::default_export_path(view, format.ext())?;
    match format {
        ExportFormat::Json => crate::storage::export_json(&path, &report)?,
        ExportFormat::Csv => crate::storage::export_csv(&path, &report)?,
    }
    Ok(path)
}

/// Export the view on the current tab and report the outcome in the info line.
pub fn export_and_show_path(session: &Session, state: &mut UiState, format: ExportFormat) {
    let Some(view) = state.view() else {
        state.info = "Nothing to export on this tab".into();
        return;
    };
    match export_view(session, view, format) {
        Ok(path) => {
            let path_str = path.display().to_string();
            state.info = exported_message(format, &path_str);
            state.last_exported_path = Some(path_str);
        }
        Err(e) => {
            state.info = format!("Export failed: {e:#}");
        }
    }
}

/// Status line after an export; the copy hint comes first so narrow
/// terminals never cut it off.
pub fn exported_message(format: ExportFormat, path: &str) -> String {
    format!("Exported {} (press 'y' to copy): {path}", format.label())
}

/// Copy the last exported path, if any.
pub fn copy_last_export(state: &mut UiState) {
    let Some(path) = state.last_exported_path.clone() else {
        state.info = "No export yet (press 's' or 'c' first)".into();
        return;
    };
    state.info = match copy_to_clipboard(&path) {
        Ok(()) => format!("Copied to clipboard: {path}"),
        Err(e) => format!("Clipboard failed: {e:#}"),
    };
}

/// Initialize the clipboard manager thread if not already initialized.
/// Each copy keeps its clipboard instance alive long enough for clipboard
/// managers to read it.
fn init_clipboard_manager() -> Result<&'static std_mpsc::Sender<String>> {
    CLIPBOARD_SENDER.get_or_init(|| {
        let (tx, rx) = std_mpsc::channel::<String>();

        std::thread::spawn(move || {
            use arboard::Clipboard;

            for text in rx {
                if let Ok(mut clipboard) = Clipboard::new() {
                    if clipboard.set_text(&text).is_ok() {
                        std::thread::sleep(Duration::from_secs(2));
                    }
                }
            }
        });

        tx
    });

    CLIPBOARD_SENDER
        .get()
        .ok_or_else(|| anyhow::anyhow!("Failed to initialize clipboard manager"))
}

/// Queue text for the clipboard without blocking the UI thread.
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let sender = init_clipboard_manager()?;
    sender
        .send(text.to_string())
        .map_err(|_| anyhow::anyhow!("Clipboard manager channel closed"))?;
    Ok(())
}
