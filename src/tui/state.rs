use super::forms::FormState;
use crate::report::View;
use ratatui::{
    style::{Color, Style},
    text::{Line, Span},
};

/// Index of the Help tab, right after the views.
pub const HELP_TAB: usize = View::ALL.len();
pub const TAB_COUNT: usize = HELP_TAB + 1;

pub const SEGMENT_FIELDS: [&str; 4] = ["TAM", "Adoption", "Compliance", "Fit"];
pub const WEIGHT_FIELDS: [&str; 3] = ["TAM", "Adoption Speed", "CHS Fit"];
pub const FUNNEL_STEPS: [u64; 4] = [1, 10, 100, 1000];

pub const TAM_STEP: f64 = 0.5;
pub const WEIGHT_STEP: f64 = 0.05;

pub struct UiState {
    pub tab: usize,
    pub info: String,
    pub selected_row: usize,
    pub selected_field: usize,
    pub funnel_step: u64,
    pub form: Option<FormState>,
    pub last_exported_path: Option<String>,
    pub year: i32,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            tab: 0,
            info: String::new(),
            selected_row: 0,
            selected_field: 0,
            funnel_step: 10,
            form: None,
            last_exported_path: None,
            year: current_year(),
        }
    }
}

fn current_year() -> i32 {
    time::OffsetDateTime::now_local()
        .unwrap_or_else(|_| time::OffsetDateTime::now_utc())
        .year()
}

impl UiState {
    pub fn view(&self) -> Option<View> {
        View::ALL.get(self.tab).copied()
    }

    pub fn set_tab(&mut self, tab: usize) {
        self.tab = tab % TAB_COUNT;
        self.selected_row = 0;
        self.selected_field = 0;
    }

    pub fn next_tab(&mut self) {
        self.set_tab(self.tab + 1);
    }

    pub fn prev_tab(&mut self) {
        self.set_tab((self.tab + TAB_COUNT - 1) % TAB_COUNT);
    }

    /// Move to the next funnel step size, wrapping around.
    pub fn cycle_funnel_step(&mut self) {
        let next = FUNNEL_STEPS
            .iter()
            .position(|s| *s == self.funnel_step)
            .map(|i| (i + 1) % FUNNEL_STEPS.len())
            .unwrap_or(0);
        self.funnel_step = FUNNEL_STEPS[next];
    }
}

/// Push a `label: value` line, wrapping the value to the status area width.
pub fn push_wrapped_status_kv(
    out: &mut Vec<Line<'static>>,
    label: &str,
    value: &str,
    status_area_width: u16,
) {
    let value = value.trim();
    if value.is_empty() {
        return;
    }

    // Account for borders (2 chars on each side)
    let usable_width = status_area_width.saturating_sub(4).max(1);
    let label_text = format!("{label}:");
    let label_width = label_text.chars().count() as u16;

    let value_chars: Vec<char> = value.chars().collect();
    let mut remaining = value_chars.as_slice();
    let mut first = true;

    while !remaining.is_empty() {
        let line_width = if first {
            usable_width.saturating_sub(label_width + 1).max(1)
        } else {
            usable_width.saturating_sub(2).max(1)
        };

        let chars_to_take = (remaining.len() as u16).min(line_width) as usize;
        let (line_chars, rest) = remaining.split_at(chars_to_take);
        let line_text: String = line_chars.iter().collect();

        if first {
            out.push(Line::from(vec![
                Span::styled(label_text.clone(), Style::default().fg(Color::Gray)),
                Span::raw(" "),
                Span::raw(line_text),
            ]));
            first = false;
        } else {
            out.push(Line::from(vec![Span::raw("  "), Span::raw(line_text)]));
        }

        remaining = rest;
    }
}
