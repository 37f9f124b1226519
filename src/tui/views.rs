//! One draw function per dashboard tab. Every tab renders from the same
//! [`ViewReport`] the text and JSON modes print.

use super::charts::{self, BarItem, ScatterSeries};
use super::forms::{FieldValue, FormState};
use super::state::{UiState, WEIGHT_FIELDS};
use crate::engine::{group_count, ConversionRow, LongRecord};
use crate::model::{
    ArchComponent, Competitor, Hypothesis, InterviewPlan, PricingTier, Rating, Segment, Weights,
    RATING_MAX, RATING_MIN,
};
use crate::report::{build_report, InterviewCount, LayerCount, SegmentPoint, View, ViewReport};
use crate::session::Session;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
    Frame,
};

fn selected_style() -> Style {
    Style::default().bg(Color::DarkGray)
}

fn header_style() -> Style {
    Style::default().fg(Color::Yellow)
}

fn titled(title: impl Into<String>) -> Block<'static> {
    Block::default().borders(Borders::ALL).title(title.into())
}

pub fn draw_view(view: View, area: Rect, f: &mut Frame, state: &UiState, session: &Session) {
    let report = match build_report(session, view) {
        Ok(r) => r,
        Err(e) => {
            let p = Paragraph::new(format!("Cannot build {}: {e}", view.title()))
                .style(Style::default().fg(Color::Red))
                .block(titled(view.title()));
            f.render_widget(p, area);
            return;
        }
    };

    match &report {
        ViewReport::Segments { segments, points } => {
            draw_segments(area, f, state, segments, points)
        }
        ViewReport::Prioritization {
            weights,
            normalized,
            ranked,
        } => draw_prioritization(area, f, state, *weights, *normalized, ranked),
        ViewReport::Interviews { backlog, summary } => {
            draw_interviews(area, f, state, backlog, summary)
        }
        ViewReport::Hypotheses { ranked } => draw_hypotheses(area, f, state, ranked),
        ViewReport::Architecture {
            components,
            layer_mix,
            chain,
        } => draw_architecture(area, f, components, layer_mix, chain),
        ViewReport::Features {
            id_column,
            features,
            segments,
            heatmap,
        } => draw_features(area, f, id_column, segments, features, heatmap),
        ViewReport::Roadmap { items } => charts::render_timeline(f, area, items),
        ViewReport::Pricing { tiers } => draw_pricing(area, f, tiers),
        ViewReport::Funnel { stages } => draw_funnel(area, f, state, stages),
        ViewReport::Competitors { competitors } => draw_competitors(area, f, competitors),
    }

    if let Some(form) = &state.form {
        draw_form(area, f, form);
    }
}

fn draw_segments(
    area: Rect,
    f: &mut Frame,
    state: &UiState,
    segments: &[Segment],
    points: &[SegmentPoint],
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(segments.len() as u16 + 3),
            Constraint::Min(8),
        ])
        .split(area);

    let header = Row::new([
        "Segment", "TAM ($B)", "Adoption", "Compliance", "Fit", "Priority", "Full name",
    ])
    .style(header_style());

    let rows = segments.iter().enumerate().map(|(i, s)| {
        let values = [
            s.short_name.clone(),
            s.tam_usd_b.to_string(),
            s.adoption_speed.to_string(),
            s.compliance_burden.to_string(),
            s.chs_fit.to_string(),
            format!("{:.2}", s.priority_score),
            s.name.clone(),
        ];
        let cells = values.into_iter().enumerate().map(|(col, text)| {
            let cell = Cell::from(text);
            if i == state.selected_row && col == state.selected_field + 1 {
                cell.style(
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                cell
            }
        });
        let row = Row::new(cells);
        if i == state.selected_row {
            row.style(selected_style())
        } else {
            row
        }
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(18),
            Constraint::Length(9),
            Constraint::Length(9),
            Constraint::Length(11),
            Constraint::Length(5),
            Constraint::Length(9),
            Constraint::Min(20),
        ],
    )
    .header(header)
    .block(titled(
        "Market segments (←/→ field, ↑/↓ row, +/- adjust: TAM ±0.5, ratings ±1)",
    ));
    f.render_widget(table, chunks[0]);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);

    // One series per fit level so the legend doubles as a color key.
    let series: Vec<ScatterSeries> = (RATING_MIN..=RATING_MAX)
        .map(|fit| ScatterSeries {
            name: format!("Fit {fit}"),
            color: charts::rating_color(fit),
            points: points
                .iter()
                .filter(|p| p.chs_fit == fit)
                .map(|p| (p.adoption_speed as f64, p.compliance_burden as f64))
                .collect(),
        })
        .collect();
    charts::render_rating_scatter(
        f,
        bottom[0],
        "Adoption vs compliance burden",
        "Adoption speed",
        "Compliance",
        &series,
    );

    let bars: Vec<BarItem> = segments
        .iter()
        .zip(points)
        .enumerate()
        .map(|(i, (s, p))| BarItem {
            label: s.short_name.clone(),
            value: (p.bubble_size * 10.0).round() as u64,
            text: format!("{}", s.tam_usd_b),
            color: charts::series_color(i),
        })
        .collect();
    charts::render_bars(f, bottom[1], "TAM 2024 ($B)", &bars, true);
}

fn draw_prioritization(
    area: Rect,
    f: &mut Frame,
    state: &UiState,
    weights: Weights,
    normalized: Weights,
    ranked: &[Segment],
) {
    let rows_split = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(ranked.len() as u16 + 3),
            Constraint::Min(8),
        ])
        .split(area);
    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(40), Constraint::Min(20)])
        .split(rows_split[0]);

    let values = [
        (weights.tam, normalized.tam),
        (weights.adoption, normalized.adoption),
        (weights.fit, normalized.fit),
    ];
    let mut lines = Vec::new();
    for (i, (name, (raw, norm))) in WEIGHT_FIELDS.iter().zip(values).enumerate() {
        let selected = i == state.selected_field;
        let style = if selected {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        // Normalized share is always within 0..=1, whatever the raw weight.
        let filled = (norm * 20.0).round() as usize;
        lines.push(Line::from(vec![
            Span::styled(
                format!("{} {name:<15}", if selected { "▶" } else { " " }),
                style,
            ),
            Span::styled(format!("{raw:.2}"), style),
            Span::styled(
                format!("  ({:.0}%)", norm * 100.0),
                Style::default().fg(Color::Gray),
            ),
        ]));
        lines.push(Line::from(Span::styled(
            format!("  {}", "█".repeat(filled)),
            Style::default().fg(charts::series_color(i)),
        )));
    }
    let p = Paragraph::new(lines).block(titled("Weights (←/→ select, +/- 0.05)"));
    f.render_widget(p, top[0]);

    let header = Row::new(["#", "Segment", "TAM ($B)", "Adoption", "Fit", "Score"])
        .style(header_style());
    let rows = ranked.iter().enumerate().map(|(i, s)| {
        Row::new([
            (i + 1).to_string(),
            s.name.clone(),
            s.tam_usd_b.to_string(),
            s.adoption_speed.to_string(),
            s.chs_fit.to_string(),
            format!("{:.2}", s.priority_score),
        ])
    });
    let table = Table::new(
        rows,
        [
            Constraint::Length(3),
            Constraint::Min(20),
            Constraint::Length(9),
            Constraint::Length(9),
            Constraint::Length(5),
            Constraint::Length(6),
        ],
    )
    .header(header)
    .block(titled("Segments by priority score"));
    f.render_widget(table, top[1]);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(rows_split[1]);

    let bars: Vec<BarItem> = ranked
        .iter()
        .map(|s| BarItem {
            label: s.short_name.clone(),
            value: (s.priority_score * 100.0).round() as u64,
            text: format!("{:.2}", s.priority_score),
            color: charts::rating_color(s.priority_score.round() as Rating),
        })
        .collect();
    charts::render_bars(f, bottom[0], "Priority score (1–5)", &bars, true);

    let series: Vec<ScatterSeries> = ranked
        .iter()
        .enumerate()
        .map(|(i, s)| ScatterSeries {
            name: s.short_name.clone(),
            color: charts::series_color(i),
            points: vec![(s.adoption_speed as f64, s.chs_fit as f64)],
        })
        .collect();
    charts::render_rating_scatter(
        f,
        bottom[1],
        "Adoption vs CHS fit",
        "Adoption speed",
        "CHS fit",
        &series,
    );
}

fn draw_interviews(
    area: Rect,
    f: &mut Frame,
    state: &UiState,
    backlog: &[InterviewPlan],
    summary: &[InterviewCount],
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(6),
            Constraint::Length(summary.len().max(1) as u16 + 3),
        ])
        .split(area);

    if backlog.is_empty() {
        let p = Paragraph::new("No interviews planned yet. Press 'n' to add one.")
            .style(Style::default().fg(Color::Gray))
            .block(titled("Interview backlog"));
        f.render_widget(p, chunks[0]);
    } else {
        let header = Row::new([
            "Segment",
            "Persona",
            "Company type",
            "Priority",
            "Status",
            "Key question",
        ])
        .style(header_style());
        let rows = backlog.iter().enumerate().map(|(i, plan)| {
            let row = Row::new([
                plan.segment.clone(),
                plan.persona.clone(),
                plan.company_type.clone(),
                plan.priority.to_string(),
                plan.status.to_string(),
                plan.key_question.clone(),
            ]);
            if i == state.selected_row {
                row.style(selected_style())
            } else {
                row
            }
        });
        let table = Table::new(
            rows,
            [
                Constraint::Length(24),
                Constraint::Length(18),
                Constraint::Length(16),
                Constraint::Length(8),
                Constraint::Length(10),
                Constraint::Min(20),
            ],
        )
        .header(header)
        .block(titled(format!(
            "Interview backlog ({} planned, 'n' to add)",
            backlog.len()
        )));
        f.render_widget(table, chunks[0]);
    }

    let header = Row::new(["Segment", "Status", "Interviews"]).style(header_style());
    let rows = summary.iter().map(|c| {
        Row::new([
            c.segment.clone(),
            c.status.to_string(),
            c.interviews.to_string(),
        ])
    });
    let table = Table::new(
        rows,
        [
            Constraint::Min(24),
            Constraint::Length(10),
            Constraint::Length(10),
        ],
    )
    .header(header)
    .block(titled("Interviews by segment and status"));
    f.render_widget(table, chunks[1]);
}

fn draw_hypotheses(area: Rect, f: &mut Frame, state: &UiState, ranked: &[Hypothesis]) {
    if ranked.is_empty() {
        let p = Paragraph::new("No hypotheses yet. Press 'n' to add one.")
            .style(Style::default().fg(Color::Gray))
            .block(titled("Hypotheses"));
        f.render_widget(p, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(6), Constraint::Length(8)])
        .split(area);

    let header = Row::new(["ICE", "Segment", "I", "C", "E", "Hypothesis"]).style(header_style());
    let rows = ranked.iter().enumerate().map(|(i, h)| {
        let row = Row::new([
            format!("{:.2}", h.ice_score),
            h.segment.clone(),
            h.impact.to_string(),
            h.confidence.to_string(),
            h.effort.to_string(),
            h.hypothesis.clone(),
        ]);
        if i == state.selected_row {
            row.style(selected_style())
        } else {
            row
        }
    });
    let table = Table::new(
        rows,
        [
            Constraint::Length(6),
            Constraint::Length(24),
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Min(20),
        ],
    )
    .header(header)
    .block(titled("Hypotheses by ICE score (impact × confidence ÷ effort)"));
    f.render_widget(table, chunks[0]);

    let idx = state.selected_row.min(ranked.len() - 1);
    let h = &ranked[idx];
    let mut lines = Vec::new();
    super::state::push_wrapped_status_kv(&mut lines, "Hypothesis", &h.hypothesis, chunks[1].width);
    super::state::push_wrapped_status_kv(&mut lines, "Metric", &h.metric_to_move, chunks[1].width);
    super::state::push_wrapped_status_kv(
        &mut lines,
        "Next experiment",
        &h.next_experiment,
        chunks[1].width,
    );
    let p = Paragraph::new(lines).block(titled(format!("Selected: {}", h.segment)));
    f.render_widget(p, chunks[1]);
}

fn draw_architecture(
    area: Rect,
    f: &mut Frame,
    components: &[ArchComponent],
    layer_mix: &[LayerCount],
    chain: &[String],
) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let header = Row::new(["Layer", "Component", "Status", "Description"]).style(header_style());
    let rows = components.iter().map(|c| {
        let status_color = match c.status.as_str() {
            "MVP" => Color::Green,
            "Planned" => Color::Yellow,
            _ => Color::Gray,
        };
        Row::new([
            Cell::from(c.layer.clone()),
            Cell::from(c.component.clone()),
            Cell::from(c.status.clone()).style(Style::default().fg(status_color)),
            Cell::from(c.description.clone()),
        ])
    });
    let table = Table::new(
        rows,
        [
            Constraint::Length(11),
            Constraint::Length(24),
            Constraint::Length(8),
            Constraint::Min(20),
        ],
    )
    .header(header)
    .block(titled("Architecture components"));
    f.render_widget(table, cols[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(8)])
        .split(cols[1]);

    let bars: Vec<BarItem> = layer_mix
        .iter()
        .enumerate()
        .map(|(i, l)| BarItem {
            label: l.layer.clone(),
            value: l.components as u64,
            text: l.components.to_string(),
            color: charts::series_color(i),
        })
        .collect();
    charts::render_bars(f, right[0], "Components per layer", &bars, false);

    let p = Paragraph::new(chain.join(" → "))
        .wrap(Wrap { trim: true })
        .block(titled("Stack, bottom to top"));
    f.render_widget(p, right[1]);
}

fn draw_features(
    area: Rect,
    f: &mut Frame,
    id_column: &str,
    segments: &[String],
    features: &[String],
    heatmap: &[LongRecord<Rating>],
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(3)])
        .split(area);
    charts::render_heatmap(f, chunks[0], id_column, segments, features, heatmap);

    let legend: Vec<Span> = (RATING_MIN..=RATING_MAX)
        .map(|v| {
            Span::styled(
                format!(" {v} "),
                Style::default()
                    .fg(if v <= 3 { Color::Black } else { Color::White })
                    .bg(charts::heat_color(v)),
            )
        })
        .collect();
    let p = Paragraph::new(Line::from(legend)).block(titled("Legend"));
    f.render_widget(p, chunks[1]);
}

fn draw_pricing(area: Rect, f: &mut Frame, tiers: &[PricingTier]) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(9), Constraint::Min(6)])
        .split(area);
    charts::render_pricing_cards(f, chunks[0], tiers);

    let bars: Vec<BarItem> = tiers
        .iter()
        .enumerate()
        .map(|(i, t)| BarItem {
            label: t.tier.clone(),
            value: t.price_usd_per_month as u64,
            text: format!("${}", t.price_usd_per_month),
            color: charts::series_color(i),
        })
        .collect();
    charts::render_bars(f, chunks[1], "Price per month (USD)", &bars, false);
}

fn draw_funnel(area: Rect, f: &mut Frame, state: &UiState, stages: &[ConversionRow]) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(stages.len() as u16 + 3),
            Constraint::Min(6),
        ])
        .split(area);

    let header = Row::new(["Stage", "Count", "Conversion from previous"]).style(header_style());
    let rows = stages.iter().enumerate().map(|(i, s)| {
        let conv = s
            .conversion_from_prev_pct
            .map(|p| format!("{p:.1}%"))
            .unwrap_or_else(|| "-".into());
        let row = Row::new([s.stage.clone(), s.count.to_string(), conv]);
        if i == state.selected_row {
            row.style(selected_style())
        } else {
            row
        }
    });
    let table = Table::new(
        rows,
        [
            Constraint::Min(28),
            Constraint::Length(10),
            Constraint::Length(26),
        ],
    )
    .header(header)
    .block(titled(format!(
        "Funnel (↑/↓ stage, +/- {}, x cycles step)",
        state.funnel_step
    )));
    f.render_widget(table, chunks[0]);

    let bars: Vec<BarItem> = stages
        .iter()
        .enumerate()
        .map(|(i, s)| BarItem {
            label: s.stage.clone(),
            value: s.count,
            text: s.count.to_string(),
            color: charts::series_color(i),
        })
        .collect();
    charts::render_bars(f, chunks[1], "Stage counts", &bars, true);
}

fn draw_competitors(area: Rect, f: &mut Frame, competitors: &[Competitor]) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(competitors.len() as u16 + 3),
            Constraint::Min(10),
        ])
        .split(area);

    let header = Row::new(["Vendor", "Type", "Breadth", "Compliance", "Explainability"])
        .style(header_style());
    let rows = competitors.iter().map(|c| {
        Row::new([
            c.vendor.clone(),
            c.kind.clone(),
            c.breadth.to_string(),
            c.compliance.to_string(),
            c.explainability.to_string(),
        ])
    });
    let table = Table::new(
        rows,
        [
            Constraint::Min(26),
            Constraint::Length(12),
            Constraint::Length(8),
            Constraint::Length(11),
            Constraint::Length(15),
        ],
    )
    .header(header)
    .block(titled("Competitive landscape"));
    f.render_widget(table, chunks[0]);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);

    let by_type: Vec<ScatterSeries> = group_count(competitors, |c| c.kind.clone())
        .into_iter()
        .enumerate()
        .map(|(i, g)| ScatterSeries {
            color: charts::series_color(i),
            points: competitors
                .iter()
                .filter(|c| c.kind == g.key)
                .map(|c| (c.breadth as f64, c.explainability as f64))
                .collect(),
            name: g.key,
        })
        .collect();
    charts::render_rating_scatter(
        f,
        bottom[0],
        "Breadth vs explainability",
        "Breadth",
        "Explainability",
        &by_type,
    );

    let by_vendor: Vec<ScatterSeries> = competitors
        .iter()
        .enumerate()
        .map(|(i, c)| ScatterSeries {
            name: c.vendor.clone(),
            color: charts::series_color(i),
            points: vec![(c.compliance as f64, c.explainability as f64)],
        })
        .collect();
    charts::render_rating_scatter(
        f,
        bottom[1],
        "Compliance vs explainability",
        "Compliance",
        "Explainability",
        &by_vendor,
    );
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

fn draw_form(area: Rect, f: &mut Frame, form: &FormState) {
    let popup = centered_rect(80, 70, area);
    let mut lines = Vec::new();
    for (i, field) in form.fields.iter().enumerate() {
        let focused = i == form.focused;
        let label_style = if focused {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        let value = match &field.value {
            FieldValue::Text(s) if focused => format!("{s}_"),
            FieldValue::Text(s) => s.clone(),
            FieldValue::Rating(_) | FieldValue::Choice { .. } => {
                format!("◀ {} ▶", field.display())
            }
        };
        lines.push(Line::from(vec![
            Span::styled(
                format!("{} {}: ", if focused { "▶" } else { " " }, field.label),
                label_style,
            ),
            Span::raw(value),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Tab/↑/↓ move · ←/→ change · Enter submit · Esc cancel",
        Style::default().fg(Color::DarkGray),
    )));

    f.render_widget(Clear, popup);
    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .title(form.title()),
        );
    f.render_widget(p, popup);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Weights;
    use ratatui::{backend::TestBackend, Terminal};

    fn render(view: View, state: &UiState) -> String {
        let session = Session::new(Weights::default()).unwrap();
        let mut terminal = Terminal::new(TestBackend::new(160, 50)).unwrap();
        terminal
            .draw(|f| draw_view(view, f.area(), f, state, &session))
            .unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>()
    }

    #[test]
    fn every_view_renders() {
        let state = UiState::default();
        for view in View::ALL {
            let screen = render(view, &state);
            assert!(!screen.trim().is_empty(), "{view:?} rendered nothing");
        }
    }

    #[test]
    fn huge_weights_render_bounded_bars() {
        let session = Session::new(Weights {
            tam: 1e18,
            adoption: 0.3,
            fit: 0.4,
        })
        .unwrap();
        let mut terminal = Terminal::new(TestBackend::new(160, 50)).unwrap();
        terminal
            .draw(|f| {
                draw_view(
                    View::Prioritization,
                    f.area(),
                    f,
                    &UiState::default(),
                    &session,
                )
            })
            .unwrap();
        let screen: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(screen.contains("(100%)"));
        assert!(screen.contains(&"█".repeat(20)));
    }

    #[test]
    fn segments_table_lists_short_names() {
        let screen = render(View::Segments, &UiState::default());
        assert!(screen.contains("AI Health Coaches"));
        assert!(screen.contains("Market segments"));
    }

    #[test]
    fn empty_backlog_shows_hint() {
        let screen = render(View::Interviews, &UiState::default());
        assert!(screen.contains("No interviews planned yet"));
    }

    #[test]
    fn form_popup_is_drawn() {
        let state = UiState {
            form: Some(FormState::hypothesis(vec!["Alpha".into()])),
            ..Default::default()
        };
        let screen = render(View::Hypotheses, &state);
        assert!(screen.contains("Add Hypothesis"));
    }
}
