use crate::engine::LongRecord;
use crate::model::{PricingTier, Rating, RATING_MAX, RATING_MIN};
use crate::report::TimelineItem;
use crate::sample::QUARTERS;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        Axis, Bar, BarChart, BarGroup, Block, Borders, Cell, Chart, Dataset, GraphType, Paragraph,
        Row, Table, Wrap,
    },
    Frame,
};

/// Colors assigned to series in order.
pub const SERIES_COLORS: [Color; 6] = [
    Color::Cyan,
    Color::Magenta,
    Color::Yellow,
    Color::Green,
    Color::LightBlue,
    Color::LightRed,
];

pub fn series_color(i: usize) -> Color {
    SERIES_COLORS[i % SERIES_COLORS.len()]
}

/// Low ratings run red, high ratings green.
pub fn rating_color(v: Rating) -> Color {
    match v {
        0 | 1 => Color::Red,
        2 => Color::LightRed,
        3 => Color::Yellow,
        4 => Color::LightGreen,
        _ => Color::Green,
    }
}

/// Sequential fill for heatmap cells.
pub fn heat_color(v: Rating) -> Color {
    match v {
        0 | 1 => Color::Rgb(237, 248, 233),
        2 => Color::Rgb(186, 228, 179),
        3 => Color::Rgb(116, 196, 118),
        4 => Color::Rgb(49, 163, 84),
        _ => Color::Rgb(0, 109, 44),
    }
}

fn phase_color(phase: &str) -> Color {
    match phase {
        "MVP" => Color::Cyan,
        "V1" => Color::Magenta,
        "V2" => Color::Yellow,
        _ => Color::Gray,
    }
}

pub struct ScatterSeries {
    pub name: String,
    pub color: Color,
    pub points: Vec<(f64, f64)>,
}

/// Scatter plot on two 1–5 rating axes.
pub fn render_rating_scatter(
    f: &mut Frame,
    area: Rect,
    title: &str,
    x_title: &str,
    y_title: &str,
    series: &[ScatterSeries],
) {
    let datasets: Vec<Dataset> = series
        .iter()
        .filter(|s| !s.points.is_empty())
        .map(|s| {
            Dataset::default()
                .name(s.name.clone())
                .marker(symbols::Marker::Dot)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(s.color))
                .data(&s.points)
        })
        .collect();

    let bounds = [RATING_MIN as f64 - 0.5, RATING_MAX as f64 + 0.5];
    let labels = || {
        vec![
            Span::raw(RATING_MIN.to_string()),
            Span::raw("3"),
            Span::raw(RATING_MAX.to_string()),
        ]
    };

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title.to_string()),
        )
        .x_axis(
            Axis::default()
                .title(x_title.to_string())
                .style(Style::default().fg(Color::Gray))
                .bounds(bounds)
                .labels(labels()),
        )
        .y_axis(
            Axis::default()
                .title(y_title.to_string())
                .style(Style::default().fg(Color::Gray))
                .bounds(bounds)
                .labels(labels()),
        );
    f.render_widget(chart, area);
}

pub struct BarItem {
    pub label: String,
    pub value: u64,
    pub text: String,
    pub color: Color,
}

pub fn render_bars(f: &mut Frame, area: Rect, title: &str, items: &[BarItem], horizontal: bool) {
    let bars: Vec<Bar> = items
        .iter()
        .map(|it| {
            Bar::default()
                .value(it.value)
                .label(Line::from(it.label.clone()))
                .text_value(it.text.clone())
                .style(Style::default().fg(it.color))
                .value_style(Style::default().fg(Color::Black).bg(it.color))
        })
        .collect();

    let n = items.len().max(1) as u16;
    let (bar_width, bar_gap) = if horizontal {
        (1, 1)
    } else {
        let w = (area.width.saturating_sub(2) / n).saturating_sub(1).clamp(1, 24);
        (w, 1)
    };

    let mut chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title.to_string()),
        )
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(bar_gap);
    if horizontal {
        chart = chart.direction(Direction::Horizontal);
    }
    f.render_widget(chart, area);
}

/// Segment × feature importance grid, one colored cell per rating.
pub fn render_heatmap(
    f: &mut Frame,
    area: Rect,
    id_column: &str,
    segments: &[String],
    features: &[String],
    cells: &[LongRecord<Rating>],
) {
    let value_at = |segment: &str, feature: &str| {
        cells
            .iter()
            .find(|r| r.id == segment && r.variable == feature)
            .map(|r| r.value)
    };

    let header = Row::new(
        std::iter::once(Cell::from(id_column.to_string()))
            .chain(features.iter().map(|c| Cell::from(c.clone()))),
    )
    .style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )
    .height(2);

    let rows = segments.iter().map(|seg| {
        let mut row_cells = vec![Cell::from(seg.clone())];
        row_cells.extend(features.iter().map(|feat| match value_at(seg, feat) {
            Some(v) => {
                let fg = if v <= 3 { Color::Black } else { Color::White };
                Cell::from(format!(" {v} ")).style(Style::default().fg(fg).bg(heat_color(v)))
            }
            None => Cell::from(" - "),
        }));
        Row::new(row_cells).height(1)
    });

    let mut widths = vec![Constraint::Length(18)];
    widths.extend(features.iter().map(|_| Constraint::Min(8)));

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Feature importance by segment (1 = low, 5 = critical)"),
    );
    f.render_widget(table, area);
}

/// Roadmap items as bars on a Q1..Q4 grid.
pub fn render_timeline(f: &mut Frame, area: Rect, items: &[TimelineItem]) {
    let header = Row::new(
        ["Phase", "Area", "Item"]
            .into_iter()
            .chain(QUARTERS)
            .map(Cell::from),
    )
    .style(Style::default().fg(Color::Yellow));

    let rows = items.iter().map(|t| {
        let color = phase_color(&t.item.phase);
        let mut cells = vec![
            Cell::from(t.item.phase.clone()).style(Style::default().fg(color)),
            Cell::from(t.item.area.clone()),
            Cell::from(t.item.item.clone()),
        ];
        cells.extend((1..=QUARTERS.len()).map(|q| {
            if q == t.quarter_index {
                Cell::from("████████").style(Style::default().fg(color))
            } else {
                Cell::from("")
            }
        }));
        Row::new(cells)
    });

    let mut widths = vec![
        Constraint::Length(6),
        Constraint::Length(20),
        Constraint::Min(24),
    ];
    widths.extend(QUARTERS.iter().map(|_| Constraint::Length(9)));

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Roadmap timeline (MVP → V1 → V2)"),
    );
    f.render_widget(table, area);
}

/// One bordered card per pricing tier.
pub fn render_pricing_cards(f: &mut Frame, area: Rect, tiers: &[PricingTier]) {
    if tiers.is_empty() {
        return;
    }
    let n = tiers.len() as u32;
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(tiers.iter().map(|_| Constraint::Ratio(1, n)))
        .split(area);

    for (i, (tier, col)) in tiers.iter().zip(cols.iter()).enumerate() {
        let price = if tier.price_usd_per_month == 0 {
            "Free".to_string()
        } else {
            format!("${}/month", tier.price_usd_per_month)
        };
        let lines = vec![
            Line::from(Span::styled(
                price,
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(tier.includes.clone()),
        ];
        let card = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(series_color(i)))
                .title(tier.tier.clone()),
        );
        f.render_widget(card, *col);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_colors_cover_scale() {
        assert_eq!(rating_color(1), Color::Red);
        assert_eq!(rating_color(5), Color::Green);
        assert_ne!(heat_color(2), heat_color(4));
    }

    #[test]
    fn series_colors_cycle() {
        assert_eq!(series_color(0), series_color(SERIES_COLORS.len()));
    }
}
