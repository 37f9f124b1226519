mod charts;
mod export;
mod forms;
mod help;
mod state;
mod views;

use crate::cli::{Cli, Settings};
use crate::engine::round_to;
use crate::model::{Rating, RATING_MAX, RATING_MIN};
use crate::report::View;
use crate::session::{FunnelEdit, SegmentEdit, Session, SessionCommand};
use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use export::ExportFormat;
use forms::{FormKind, FormState};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Terminal,
};
use state::{UiState, HELP_TAB, SEGMENT_FIELDS, TAM_STEP, WEIGHT_FIELDS, WEIGHT_STEP};
use std::{io, time::Duration, time::Instant};
use tracing::debug;

/// Run the dashboard until the user quits. Session edits live only as long
/// as this loop.
pub fn run(args: &Cli, settings: Settings, mut session: Session) -> Result<()> {
    let _guard = TerminalGuard::enter()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    terminal.clear().ok();

    let mut state = UiState {
        funnel_step: settings.funnel_step,
        ..Default::default()
    };
    state.set_tab(settings.view.index());
    if args.log_file.is_some() {
        state.info = "Logging to file".into();
    }

    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();
    let mut dirty = true;

    loop {
        if dirty || last_tick.elapsed() >= tick_rate {
            terminal.draw(|f| draw(f.area(), f, &state, &session)).ok();
            last_tick = Instant::now();
            dirty = false;
        }

        // Poll input with a short timeout to avoid blocking the render loop.
        match event::poll(Duration::from_millis(10)) {
            Ok(true) => {}
            Ok(false) => continue,
            Err(e) => break Err(anyhow::Error::new(e).context("poll terminal events")),
        }
        if let Ok(Event::Key(k)) = event::read() {
            if k.kind != KeyEventKind::Press {
                continue;
            }
            dirty = true;
            if handle_key(&mut state, &mut session, k) == KeyOutcome::Quit {
                break Ok(());
            }
        }
    }
}

/// Raw mode plus alternate screen, undone on drop so every exit path
/// (including a failed terminal setup) leaves the shell usable.
struct TerminalGuard {
    restore: fn(),
}

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode().context("enable raw mode")?;
        let guard = TerminalGuard {
            restore: restore_terminal,
        };
        execute!(io::stdout(), EnterAlternateScreen).context("enter alternate screen")?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        (self.restore)();
    }
}

fn restore_terminal() {
    disable_raw_mode().ok();
    execute!(io::stdout(), LeaveAlternateScreen).ok();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyOutcome {
    Continue,
    Quit,
}

fn handle_key(state: &mut UiState, session: &mut Session, k: KeyEvent) -> KeyOutcome {
    if k.modifiers.contains(KeyModifiers::CONTROL) && k.code == KeyCode::Char('c') {
        return KeyOutcome::Quit;
    }
    if state.form.is_some() {
        handle_form_key(state, session, k);
        return KeyOutcome::Continue;
    }

    match k.code {
        KeyCode::Char('q') => return KeyOutcome::Quit,
        KeyCode::Tab => state.next_tab(),
        KeyCode::BackTab => state.prev_tab(),
        KeyCode::Char('?') => state.set_tab(HELP_TAB),
        KeyCode::Char(c @ '1'..='9') => state.set_tab(c as usize - '1' as usize),
        KeyCode::Char('0') => state.set_tab(9),
        KeyCode::Up | KeyCode::Char('k') => {
            state.selected_row = state.selected_row.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            let rows = row_count(state.view(), session);
            if state.selected_row + 1 < rows {
                state.selected_row += 1;
            }
        }
        KeyCode::Left | KeyCode::Char('h') => {
            state.selected_field = state.selected_field.saturating_sub(1);
        }
        KeyCode::Right | KeyCode::Char('l') => {
            let fields = field_count(state.view());
            if state.selected_field + 1 < fields {
                state.selected_field += 1;
            }
        }
        KeyCode::Char('+') | KeyCode::Char('=') => adjust_selected(state, session, 1),
        KeyCode::Char('-') => adjust_selected(state, session, -1),
        KeyCode::Char('x') if state.view() == Some(View::Funnel) => {
            state.cycle_funnel_step();
            state.info = format!("Funnel step: {}", state.funnel_step);
        }
        KeyCode::Char('n') => open_form(state, session),
        KeyCode::Char('e') => open_label_form(state, session),
        KeyCode::Char('s') => export::export_and_show_path(session, state, ExportFormat::Json),
        KeyCode::Char('c') => export::export_and_show_path(session, state, ExportFormat::Csv),
        KeyCode::Char('y') => export::copy_last_export(state),
        _ => {}
    }
    KeyOutcome::Continue
}

fn handle_form_key(state: &mut UiState, session: &mut Session, k: KeyEvent) {
    let Some(form) = state.form.as_mut() else {
        return;
    };
    match k.code {
        KeyCode::Esc => {
            state.form = None;
            state.info = "Cancelled".into();
        }
        KeyCode::Enter => {
            let label = match form.kind {
                FormKind::Interview => "Interview plan added",
                FormKind::Hypothesis => "Hypothesis added",
                FormKind::FunnelLabel { .. } => "Funnel stage renamed",
            };
            match session.apply(form.to_command()) {
                Ok(()) => {
                    state.form = None;
                    state.info = label.into();
                }
                Err(e) => state.info = format!("Rejected: {e}"),
            }
        }
        KeyCode::Tab | KeyCode::Down => form.next_field(),
        KeyCode::BackTab | KeyCode::Up => form.prev_field(),
        KeyCode::Left => form.adjust(-1),
        KeyCode::Right => form.adjust(1),
        KeyCode::Backspace => form.backspace(),
        KeyCode::Char(c) => form.input_char(c),
        _ => {}
    }
}

fn open_form(state: &mut UiState, session: &Session) {
    let form = match state.view() {
        Some(View::Interviews) => FormState::interview(session.segment_names()),
        Some(View::Hypotheses) => FormState::hypothesis(session.segment_names()),
        _ => return,
    };
    debug!(form = form.title(), "opened form");
    state.form = Some(form);
    state.info = "Enter to submit, Esc to cancel".into();
}

fn open_label_form(state: &mut UiState, session: &Session) {
    if state.view() != Some(View::Funnel) {
        return;
    }
    let Some(stage) = session.funnel().get(state.selected_row) else {
        return;
    };
    state.form = Some(FormState::funnel_label(state.selected_row, &stage.stage));
    state.info = "Enter to rename, Esc to cancel".into();
}

fn row_count(view: Option<View>, session: &Session) -> usize {
    match view {
        Some(View::Segments) => session.segments().len(),
        Some(View::Interviews) => session.interviews().len(),
        Some(View::Hypotheses) => session.hypotheses().len(),
        Some(View::Funnel) => session.funnel().len(),
        _ => 0,
    }
}

fn field_count(view: Option<View>) -> usize {
    match view {
        Some(View::Segments) => SEGMENT_FIELDS.len(),
        Some(View::Prioritization) => WEIGHT_FIELDS.len(),
        _ => 0,
    }
}

fn step_rating(value: Rating, delta: i8) -> Rating {
    (value as i16 + delta as i16).clamp(RATING_MIN as i16, RATING_MAX as i16) as Rating
}

/// `+`/`-` on the selected cell of an editable view.
fn adjust_selected(state: &mut UiState, session: &mut Session, delta: i8) {
    let index = state.selected_row;
    let cmd = match state.view() {
        Some(View::Segments) => {
            let Some(seg) = session.segments().get(index) else {
                return;
            };
            let edit = match state.selected_field {
                0 => SegmentEdit::Tam(round_to(
                    (seg.tam_usd_b + TAM_STEP * delta as f64).max(0.0),
                    3,
                )),
                1 => SegmentEdit::AdoptionSpeed(step_rating(seg.adoption_speed, delta)),
                2 => SegmentEdit::ComplianceBurden(step_rating(seg.compliance_burden, delta)),
                _ => SegmentEdit::ChsFit(step_rating(seg.chs_fit, delta)),
            };
            SessionCommand::EditSegment { index, edit }
        }
        Some(View::Prioritization) => {
            let mut w = session.weights();
            let slot = match state.selected_field {
                0 => &mut w.tam,
                1 => &mut w.adoption,
                _ => &mut w.fit,
            };
            *slot = round_to((*slot + WEIGHT_STEP * delta as f64).clamp(0.0, 1.0), 2);
            SessionCommand::SetWeights(w)
        }
        Some(View::Funnel) => {
            let Some(stage) = session.funnel().get(index) else {
                return;
            };
            let count = if delta > 0 {
                stage.count.saturating_add(state.funnel_step)
            } else {
                stage.count.saturating_sub(state.funnel_step)
            };
            SessionCommand::EditFunnelStage {
                index,
                edit: FunnelEdit::Count(count),
            }
        }
        _ => return,
    };
    if let Err(e) = session.apply(cmd) {
        state.info = format!("Rejected: {e}");
    }
}

fn draw(area: Rect, f: &mut ratatui::Frame, state: &UiState, session: &Session) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(4),
        ])
        .split(area);

    let mut titles: Vec<Line> = View::ALL.iter().map(|v| Line::from(v.tab_label())).collect();
    titles.push(Line::from("Help"));
    let tabs = Tabs::new(titles)
        .select(state.tab)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("CHS Strategy & Research Lab"),
        )
        .highlight_style(Style::default().fg(Color::Yellow));
    f.render_widget(tabs, chunks[0]);

    match state.view() {
        Some(view) => views::draw_view(view, chunks[1], f, state, session),
        None => help::draw_help(chunks[1], f),
    }

    draw_status(chunks[2], f, state);
}

fn draw_status(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let mut lines = Vec::new();
    state::push_wrapped_status_kv(&mut lines, "Info", &state.info, area.width);
    lines.truncate(2);
    lines.push(Line::from(Span::styled(
        format!(
            "© {} Centauri Health Solutions · Prototype only, data not persisted between runs",
            state.year
        ),
        Style::default().fg(Color::DarkGray),
    )));
    let p = Paragraph::new(lines).block(Block::default().borders(Borders::TOP));
    f.render_widget(p, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Weights;
    use pretty_assertions::assert_eq;

    fn press(state: &mut UiState, session: &mut Session, code: KeyCode) -> KeyOutcome {
        handle_key(state, session, KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn setup() -> (UiState, Session) {
        (
            UiState::default(),
            Session::new(Weights::default()).unwrap(),
        )
    }

    #[test]
    fn quit_keys() {
        let (mut state, mut session) = setup();
        assert_eq!(press(&mut state, &mut session, KeyCode::Char('q')), KeyOutcome::Quit);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handle_key(&mut state, &mut session, ctrl_c), KeyOutcome::Quit);
    }

    #[test]
    fn plus_raises_selected_tam() {
        let (mut state, mut session) = setup();
        let before = session.segments()[1].tam_usd_b;
        press(&mut state, &mut session, KeyCode::Down);
        press(&mut state, &mut session, KeyCode::Char('+'));
        assert_eq!(session.segments()[1].tam_usd_b, before + 0.5);
    }

    #[test]
    fn ratings_saturate_at_bounds() {
        let (mut state, mut session) = setup();
        press(&mut state, &mut session, KeyCode::Right);
        for _ in 0..10 {
            press(&mut state, &mut session, KeyCode::Char('+'));
        }
        assert_eq!(session.segments()[0].adoption_speed, 5);
        for _ in 0..10 {
            press(&mut state, &mut session, KeyCode::Char('-'));
        }
        assert_eq!(session.segments()[0].adoption_speed, 1);
        assert!(state.info.is_empty());
    }

    #[test]
    fn weight_keys_rescore() {
        let (mut state, mut session) = setup();
        press(&mut state, &mut session, KeyCode::Char('2'));
        assert_eq!(state.view(), Some(View::Prioritization));
        press(&mut state, &mut session, KeyCode::Char('+'));
        assert_eq!(session.weights().tam, 0.35);
        press(&mut state, &mut session, KeyCode::Right);
        press(&mut state, &mut session, KeyCode::Right);
        press(&mut state, &mut session, KeyCode::Right);
        press(&mut state, &mut session, KeyCode::Char('-'));
        assert_eq!(session.weights().fit, 0.35);
    }

    #[test]
    fn funnel_step_edits_count() {
        let (mut state, mut session) = setup();
        press(&mut state, &mut session, KeyCode::Char('9'));
        press(&mut state, &mut session, KeyCode::Char('x'));
        assert_eq!(state.funnel_step, 100);
        press(&mut state, &mut session, KeyCode::Char('-'));
        assert_eq!(session.funnel()[0].count, 4900);
        press(&mut state, &mut session, KeyCode::Down);
        press(&mut state, &mut session, KeyCode::Char('+'));
        assert_eq!(session.funnel()[1].count, 900);
    }

    #[test]
    fn hypothesis_form_submits() {
        let (mut state, mut session) = setup();
        press(&mut state, &mut session, KeyCode::Char('4'));
        press(&mut state, &mut session, KeyCode::Char('n'));
        assert!(state.form.is_some());
        // typing 'q' inside a form must not quit
        assert_eq!(
            press(&mut state, &mut session, KeyCode::Char('q')),
            KeyOutcome::Continue
        );
        press(&mut state, &mut session, KeyCode::Enter);
        assert!(state.form.is_none());
        assert_eq!(session.hypotheses().len(), 1);
        assert_eq!(session.hypotheses()[0].ice_score, 4.0);
    }

    #[test]
    fn escape_discards_form() {
        let (mut state, mut session) = setup();
        press(&mut state, &mut session, KeyCode::Char('3'));
        press(&mut state, &mut session, KeyCode::Char('n'));
        press(&mut state, &mut session, KeyCode::Esc);
        assert!(state.form.is_none());
        assert!(session.interviews().is_empty());
    }

    #[test]
    fn funnel_stage_can_be_renamed() {
        let (mut state, mut session) = setup();
        press(&mut state, &mut session, KeyCode::Char('9'));
        press(&mut state, &mut session, KeyCode::Down);
        press(&mut state, &mut session, KeyCode::Char('e'));
        assert_eq!(
            state.form.as_ref().map(|f| f.fields[0].display()),
            Some("Signup (Dev Accounts)".to_string())
        );
        for _ in 0.."(Dev Accounts)".len() + 1 {
            press(&mut state, &mut session, KeyCode::Backspace);
        }
        for c in "s".chars() {
            press(&mut state, &mut session, KeyCode::Char(c));
        }
        press(&mut state, &mut session, KeyCode::Enter);
        assert!(state.form.is_none());
        assert_eq!(session.funnel()[1].stage, "Signups");
        assert_eq!(session.funnel()[1].count, 800);
        assert_eq!(session.conversion_series()[1].stage, "Signups");
    }

    #[test]
    fn rename_is_ignored_outside_funnel() {
        let (mut state, mut session) = setup();
        press(&mut state, &mut session, KeyCode::Char('e'));
        assert!(state.form.is_none());
    }

    #[test]
    fn status_keeps_copy_hint_on_narrow_terminals() {
        use ratatui::{backend::TestBackend, Terminal};

        let state = UiState {
            info: export::exported_message(
                ExportFormat::Json,
                "/home/someone/projects/strategy/strategy-lab-funnel-20261018-101500.json",
            ),
            ..Default::default()
        };
        let mut terminal = Terminal::new(TestBackend::new(50, 4)).unwrap();
        terminal
            .draw(|f| draw_status(f.area(), f, &state))
            .unwrap();
        let screen: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(screen.contains("press 'y' to copy"));
        assert!(screen.contains("Centauri"));
    }

    #[test]
    fn terminal_is_restored_when_setup_fails() {
        use std::sync::atomic::{AtomicBool, Ordering};

        static RESTORED: AtomicBool = AtomicBool::new(false);
        fn mark_restored() {
            RESTORED.store(true, Ordering::SeqCst);
        }
        fn failing_setup() -> Result<()> {
            let _guard = TerminalGuard {
                restore: mark_restored,
            };
            Err(anyhow::anyhow!("create terminal"))
        }

        assert!(failing_setup().is_err());
        assert!(RESTORED.load(Ordering::SeqCst));
    }

    #[test]
    fn new_is_ignored_outside_backlog_tabs() {
        let (mut state, mut session) = setup();
        press(&mut state, &mut session, KeyCode::Char('n'));
        assert!(state.form.is_none());
    }
}
