//! View exports.
//!
//! Snapshots of a single view written to disk on request. Session state
//! itself is never persisted.

use crate::report::{View, ViewReport};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use time::macros::format_description;
use time::OffsetDateTime;
use tracing::info;

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create directory {}", parent.display()))?;
        }
    }
    Ok(())
}

pub fn export_json(path: &Path, report: &ViewReport) -> Result<()> {
    ensure_parent(path)?;
    let data = serde_json::to_vec_pretty(report).context("serialize report")?;
    fs::write(path, data).with_context(|| format!("write {}", path.display()))?;
    info!(path = %path.display(), view = report.view().slug(), "exported JSON");
    Ok(())
}

pub fn export_csv(path: &Path, report: &ViewReport) -> Result<()> {
    ensure_parent(path)?;
    let table = report.csv_table();
    let mut out = String::new();
    push_record(&mut out, &table.header);
    for row in &table.rows {
        push_record(&mut out, row);
    }
    fs::write(path, out).with_context(|| format!("write {}", path.display()))?;
    info!(path = %path.display(), view = report.view().slug(), rows = table.rows.len(), "exported CSV");
    Ok(())
}

fn push_record(out: &mut String, fields: &[String]) {
    let escaped: Vec<String> = fields.iter().map(|f| csv_field(f)).collect();
    out.push_str(&escaped.join(","));
    out.push('\n');
}

/// Quote a field when it contains a separator, quote or line break.
fn csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// `strategy-lab-<view>-<timestamp>.<ext>` in the current directory.
pub fn default_export_path(view: View, ext: &str) -> Result<PathBuf> {
    let stamp = OffsetDateTime::now_utc()
        .format(format_description!(
            "[year][month][day]-[hour][minute][second]"
        ))
        .context("format export timestamp")?;
    let current_dir = std::env::current_dir().context("get current directory")?;
    Ok(current_dir.join(format!("strategy-lab-{}-{}.{}", view.slug(), stamp, ext)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Weights;
    use crate::report::build_report;
    use crate::session::Session;

    fn report(view: View) -> ViewReport {
        build_report(&Session::new(Weights::default()).unwrap(), view).unwrap()
    }

    #[test]
    fn csv_field_quoting() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a, b"), "\"a, b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(csv_field("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn exports_pricing_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("pricing.csv");
        export_csv(&path, &report(View::Pricing)).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Tier,Price_USD_per_month,Includes");
        assert_eq!(
            lines[2],
            "Growth,499,\"Up to 3 projects, 5M events/month, BAAs, email support\""
        );
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn exports_funnel_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("funnel.json");
        export_json(&path, &report(View::Funnel)).unwrap();
        let v: serde_json::Value =
            serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        assert_eq!(v["view"], "funnel");
        assert!(v["stages"][0]["conversion_from_prev_pct"].is_null());
        assert_eq!(v["stages"][2]["conversion_from_prev_pct"], 37.5);
    }

    #[test]
    fn default_path_names_the_view() {
        let p = default_export_path(View::Roadmap, "csv").unwrap();
        let name = p.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("strategy-lab-roadmap-"));
        assert!(name.ends_with(".csv"));
    }
}
