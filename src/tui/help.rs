use ratatui::{
    layout::Rect,
    style::Color,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

fn key_line(keys: &[&'static str], action: &'static str) -> Line<'static> {
    let mut spans = vec![Span::raw("  ")];
    let mut width = 0;
    for (i, k) in keys.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" / "));
            width += 3;
        }
        spans.push(Span::styled(*k, Style::default().fg(Color::Magenta)));
        width += k.chars().count();
    }
    spans.push(Span::raw(" ".repeat(14usize.saturating_sub(width))));
    spans.push(Span::raw(action));
    Line::from(spans)
}

pub fn draw_help(area: Rect, f: &mut Frame) {
    let p = Paragraph::new(vec![
        Line::from("Keybinds:"),
        key_line(&["q", "Ctrl-C"], "Quit"),
        key_line(&["tab", "shift-tab"], "Switch tabs"),
        key_line(&["1-9", "0"], "Jump to tab"),
        key_line(&["?"], "Show this help"),
        key_line(&["s"], "Export current view as JSON"),
        key_line(&["c"], "Export current view as CSV"),
        key_line(&["y"], "Copy exported path to clipboard"),
        Line::from(""),
        Line::from("Editing (Segments, Prioritization, Funnel):"),
        key_line(&["↑/↓", "j/k"], "Select row"),
        key_line(&["←/→", "h/l"], "Select field or weight"),
        key_line(&["+", "-"], "Adjust selected value"),
        key_line(&["x"], "Cycle funnel step (1/10/100/1000)"),
        key_line(&["e"], "Rename selected funnel stage"),
        Line::from(""),
        Line::from("Interviews & Hypotheses:"),
        key_line(&["n"], "New entry"),
        key_line(&["tab", "↑/↓"], "Move between form fields"),
        key_line(&["←/→"], "Change rating or choice"),
        key_line(&["enter"], "Submit"),
        key_line(&["esc"], "Cancel"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Prototype only: edits live for this run and are not persisted.",
            Style::default().fg(Color::Gray),
        )]),
    ])
    .block(Block::default().borders(Borders::ALL).title("Help"));
    f.render_widget(p, area);
}
