//! Text summary builder for CLI output.
//!
//! Formats a view report as human-readable lines for text mode.

use crate::report::ViewReport;

/// Pre-formatted lines for text output.
pub(crate) struct TextSummary {
    pub lines: Vec<String>,
}

fn pct_text(v: Option<f64>) -> String {
    v.map(|p| format!("{p:.1}%")).unwrap_or_else(|| "-".into())
}

/// Build a text summary for one view.
pub(crate) fn build_text_summary(report: &ViewReport) -> TextSummary {
    let mut lines = vec![format!("== {} ==", report.view().title())];

    match report {
        ViewReport::Segments { segments, .. } => {
            lines.push(format!(
                "{:<44} {:>8} {:>5} {:>5} {:>5} {:>8}",
                "Segment", "TAM($B)", "Adopt", "Compl", "Fit", "Priority"
            ));
            for s in segments {
                lines.push(format!(
                    "{:<44} {:>8.3} {:>5} {:>5} {:>5} {:>8.2}",
                    s.name,
                    s.tam_usd_b,
                    s.adoption_speed,
                    s.compliance_burden,
                    s.chs_fit,
                    s.priority_score
                ));
            }
        }
        ViewReport::Prioritization {
            weights,
            normalized,
            ranked,
        } => {
            lines.push(format!(
                "Weights: TAM {:.2} / Adoption {:.2} / Fit {:.2} (normalized {:.2} / {:.2} / {:.2})",
                weights.tam,
                weights.adoption,
                weights.fit,
                normalized.tam,
                normalized.adoption,
                normalized.fit
            ));
            for (rank, s) in ranked.iter().enumerate() {
                lines.push(format!(
                    "{:>2}. {:<20} {:>6.2}  (TAM {:.1}B, adoption {}, fit {})",
                    rank + 1,
                    s.short_name,
                    s.priority_score,
                    s.tam_usd_b,
                    s.adoption_speed,
                    s.chs_fit
                ));
            }
        }
        ViewReport::Interviews { backlog, summary } => {
            if backlog.is_empty() {
                lines.push("No interviews yet.".into());
            } else {
                for i in backlog {
                    lines.push(format!(
                        "[{}] P{} {} / {} ({}): {}",
                        i.status, i.priority, i.segment, i.persona, i.company_type, i.key_question
                    ));
                }
                lines.push("Summary by segment & status:".into());
                for g in summary {
                    lines.push(format!("  {} / {}: {}", g.segment, g.status, g.interviews));
                }
            }
        }
        ViewReport::Hypotheses { ranked } => {
            if ranked.is_empty() {
                lines.push("No hypotheses yet.".into());
            }
            for h in ranked {
                lines.push(format!(
                    "ICE {:>5.2} (I{} C{} E{}) [{}] {}",
                    h.ice_score, h.impact, h.confidence, h.effort, h.segment, h.hypothesis
                ));
                lines.push(format!("    metric: {}", h.metric_to_move));
                lines.push(format!("    next:   {}", h.next_experiment));
            }
        }
        ViewReport::Architecture {
            components,
            layer_mix,
            chain,
        } => {
            for c in components {
                lines.push(format!(
                    "{:<11} {:<24} {:<8} {}",
                    c.layer, c.component, c.status, c.description
                ));
            }
            let mix: Vec<String> = layer_mix
                .iter()
                .map(|l| format!("{} {}", l.layer, l.components))
                .collect();
            lines.push(format!("Layer mix: {}", mix.join(", ")));
            lines.push(format!("Flow: {}", chain.join(" -> ")));
        }
        ViewReport::Features {
            features,
            segments,
            heatmap,
            ..
        } => {
            let mut header = format!("{:<18}", "");
            for (i, _) in features.iter().enumerate() {
                header.push_str(&format!(" F{:<2}", i + 1));
            }
            lines.push(header);
            for seg in segments {
                let mut row = format!("{seg:<18}");
                for feature in features {
                    let value = heatmap
                        .iter()
                        .find(|r| &r.id == seg && &r.variable == feature)
                        .map(|r| r.value.to_string())
                        .unwrap_or_else(|| "-".into());
                    row.push_str(&format!(" {value:<3}"));
                }
                lines.push(row);
            }
            for (i, f) in features.iter().enumerate() {
                lines.push(format!("  F{} = {}", i + 1, f));
            }
        }
        ViewReport::Roadmap { items } => {
            for t in items {
                let bar = format!("{}####", "    ".repeat(t.quarter_index.saturating_sub(1)));
                lines.push(format!(
                    "{:<4} {} {:<16} {:<20} {}",
                    t.item.phase, t.item.quarter, bar, t.item.area, t.item.item
                ));
            }
        }
        ViewReport::Pricing { tiers } => {
            for t in tiers {
                lines.push(format!(
                    "{:<11} ${:>5}/mo  {}",
                    t.tier, t.price_usd_per_month, t.includes
                ));
            }
        }
        ViewReport::Funnel { stages } => {
            lines.push(format!("{:<28} {:>8} {:>10}", "Stage", "Count", "Conv"));
            for s in stages {
                lines.push(format!(
                    "{:<28} {:>8} {:>10}",
                    s.stage,
                    s.count,
                    pct_text(s.conversion_from_prev_pct)
                ));
            }
        }
        ViewReport::Competitors { competitors } => {
            lines.push(format!(
                "{:<28} {:<12} {:>7} {:>10} {:>14}",
                "Vendor", "Type", "Breadth", "Compliance", "Explainability"
            ));
            for c in competitors {
                lines.push(format!(
                    "{:<28} {:<12} {:>7} {:>10} {:>14}",
                    c.vendor, c.kind, c.breadth, c.compliance, c.explainability
                ));
            }
        }
    }

    TextSummary { lines }
}
