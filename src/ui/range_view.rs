use crate::calc::{add_months, CalendarModel, Classification, RangeSelector, SelectionState};
use crate::data::Settings;
use anyhow::Result;
use chrono::{Datelike, Duration, NaiveDate};
use crossterm::event::{self, Event as CEvent, KeyCode, KeyModifiers};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Row, Table},
    Frame, Terminal,
};
use std::io::Stdout;
use std::time::Duration as StdDuration;

// Fixed-width month columns: 7 day cells of 3 chars each.
const MONTH_WIDTH: u16 = 21;
const GAP_WIDTH: u16 = 3;
const WEEKDAY_HEADER: &str = "Su Mo Tu We Th Fr Sa";

pub struct App {
    model: CalendarModel,
    selector: RangeSelector,
    settings: Settings,
    /// Date under the cursor. Always a real day cell; the leading blanks
    /// of a month grid are never reachable.
    cursor: NaiveDate,
    /// Month offset of the leftmost visible month (0 = the current month).
    view_offset: i32,
}

impl App {
    pub fn new(model: CalendarModel, settings: Settings) -> Self {
        App {
            model,
            selector: RangeSelector::new(),
            settings,
            cursor: model.today(),
            view_offset: 0,
        }
    }

    fn months_shown(&self) -> i32 {
        self.settings.months_shown.max(1) as i32
    }

    fn months_per_row(&self) -> i32 {
        self.settings.months_per_row.clamp(1, 6) as i32
    }

    /// Month offset of `date` relative to the month of the reference date.
    fn month_offset_of(&self, date: NaiveDate) -> i32 {
        let today = self.model.today();
        (date.year() - today.year()) * 12 + date.month() as i32 - today.month() as i32
    }

    fn in_window(&self, date: NaiveDate) -> bool {
        let offset = self.month_offset_of(date);
        offset >= 0 && offset < self.months_shown()
    }

    fn move_cursor_days(&mut self, days: i64) {
        if let Some(target) = self.cursor.checked_add_signed(Duration::days(days)) {
            if self.in_window(target) {
                self.cursor = target;
                self.scroll_to_cursor();
            }
        }
    }

    fn move_cursor_months(&mut self, months: i32) {
        let target = add_months(self.cursor, months);
        if self.in_window(target) {
            self.cursor = target;
            self.scroll_to_cursor();
        }
    }

    fn scroll_to_cursor(&mut self) {
        let offset = self.month_offset_of(self.cursor);
        let per_row = self.months_per_row();
        if offset < self.view_offset {
            self.view_offset = offset;
        } else if offset >= self.view_offset + per_row {
            self.view_offset = offset - per_row + 1;
        }
    }

    /// Returns true if the app should quit.
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        match code {
            KeyCode::Left => self.move_cursor_days(-1),
            KeyCode::Right => self.move_cursor_days(1),
            KeyCode::Up => self.move_cursor_days(-7),
            KeyCode::Down => self.move_cursor_days(7),
            KeyCode::Char('n') => self.move_cursor_months(1),
            KeyCode::Char('p') => self.move_cursor_months(-1),
            KeyCode::Char('t') => {
                self.cursor = self.model.today();
                self.view_offset = 0;
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                self.selector.transition(self.cursor);
            }
            KeyCode::Char('q') => return true,
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return true,
            _ => {}
        }
        false
    }

    pub fn render(&self, f: &mut Frame) {
        let size = f.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(9), // month grids (2 header lines + up to 6 weeks)
                Constraint::Length(3), // selection status
                Constraint::Min(4),    // help table
            ])
            .split(size);

        self.render_months(f, chunks[0]);
        self.render_status(f, chunks[1]);
        self.render_help(f, chunks[2]);
    }

    fn render_months(&self, f: &mut Frame, area: ratatui::layout::Rect) {
        let per_row = self.months_per_row();

        let mut constraints = Vec::new();
        for _ in 0..per_row {
            constraints.push(Constraint::Length(MONTH_WIDTH));
            constraints.push(Constraint::Length(GAP_WIDTH));
        }
        constraints.push(Constraint::Min(0));
        let month_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints)
            .split(area);

        for i in 0..per_row {
            let offset = self.view_offset + i;
            if offset >= self.months_shown() {
                break;
            }
            self.render_month(f, month_chunks[(i * 2) as usize], offset);
        }
    }

    fn render_month(&self, f: &mut Frame, area: ratatui::layout::Rect, month_offset: i32) {
        let grid = self.model.grid_for(month_offset);

        let mut title_style = Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
        if self.selector.header_dimmed(grid.first_day()) {
            title_style = title_style.add_modifier(Modifier::DIM);
        }

        let mut lines: Vec<Line> = vec![
            Line::from(Span::styled(format!("{:^21}", grid.label()), title_style)),
            Line::from(WEEKDAY_HEADER),
        ];

        let mut row = 0usize;
        while row < grid.cell_count() {
            let mut spans = Vec::new();
            for _col in 0..7usize {
                if row >= grid.cell_count() {
                    break;
                }
                match grid.date_at(row) {
                    None => spans.push(Span::raw("   ")),
                    Some(date) => {
                        let style = day_style(
                            self.selector.classify(date),
                            date == self.cursor,
                            date == self.model.today(),
                        );
                        spans.push(Span::styled(format!("{:2}", date.day()), style));
                        spans.push(Span::raw(" "));
                    }
                }
                row += 1;
            }
            lines.push(Line::from(spans));
        }

        let widget = Paragraph::new(lines).block(Block::default().borders(Borders::NONE));
        f.render_widget(widget, area);
    }

    fn render_status(&self, f: &mut Frame, area: ratatui::layout::Rect) {
        let lines = vec![
            Line::from(vec![
                Span::styled("Cursor  ", Style::default().add_modifier(Modifier::DIM)),
                Span::raw(self.cursor.format("%Y-%m-%d").to_string()),
            ]),
            Line::from(self.selection_summary()),
        ];
        let p = Paragraph::new(lines).block(Block::default().borders(Borders::NONE));
        f.render_widget(p, area);
    }

    fn selection_summary(&self) -> String {
        match self.selector.state() {
            SelectionState::Empty => "No selection (Space taps the start day)".to_string(),
            SelectionState::StartOnly(start) => format!(
                "Start {} (tap a second day to close the range)",
                start.format("%Y-%m-%d")
            ),
            SelectionState::Complete { start, end } => {
                let days = (end - start).num_days() + 1;
                format!(
                    "Range {} to {} ({} day{})",
                    start.format("%Y-%m-%d"),
                    end.format("%Y-%m-%d"),
                    days,
                    if days == 1 { "" } else { "s" }
                )
            }
        }
    }

    fn render_help(&self, f: &mut Frame, area: ratatui::layout::Rect) {
        let key_rows: Vec<Row> = vec![
            Row::new(vec!["← → ↑ ↓", "Move day / week", "n / p", "Next/prev month"]),
            Row::new(vec!["Space/Enter", "Tap day", "t", "Jump to today"]),
            Row::new(vec!["q/Ctrl+C", "Quit", "", ""]),
        ];

        let help_table = Table::new(
            key_rows,
            [
                Constraint::Length(12),
                Constraint::Length(24),
                Constraint::Length(12),
                Constraint::Length(24),
            ],
        )
        .block(Block::default().borders(Borders::NONE))
        .column_spacing(1);

        f.render_widget(help_table, area);
    }
}

/// ratatui style for a day cell given its classification and cursor/today
/// emphasis. Boundaries invert, in-range days pick up the accent color,
/// out-of-range days dim.
pub(crate) fn day_style(class: Classification, is_cursor: bool, is_today: bool) -> Style {
    let mut style = match class {
        Classification::RangeStart | Classification::RangeEnd => Style::default()
            .fg(Color::Black)
            .bg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
        Classification::InRange => Style::default().fg(Color::Yellow),
        Classification::OutOfRange => Style::default().add_modifier(Modifier::DIM),
        Classification::Default => Style::default(),
    };
    if is_today {
        style = style.add_modifier(Modifier::UNDERLINED);
    }
    if is_cursor {
        style = style.add_modifier(Modifier::REVERSED);
    }
    style
}

// ── App event loop ────────────────────────────────────────────────────────────

pub fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| app.render(f))?;
        if event::poll(StdDuration::from_millis(16))? {
            if let CEvent::Key(key) = event::read()? {
                if app.handle_key(key.code, key.modifiers) {
                    break;
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn make_app() -> App {
        App::new(CalendarModel::new(d(2024, 3, 15)), Settings::default())
    }

    // ── Cursor movement ───────────────────────────────────────────────────────

    #[test]
    fn test_arrows_move_cursor_by_day_and_week() {
        let mut app = make_app();
        app.handle_key(KeyCode::Right, KeyModifiers::NONE);
        assert_eq!(app.cursor, d(2024, 3, 16));
        app.handle_key(KeyCode::Down, KeyModifiers::NONE);
        assert_eq!(app.cursor, d(2024, 3, 23));
        app.handle_key(KeyCode::Up, KeyModifiers::NONE);
        app.handle_key(KeyCode::Left, KeyModifiers::NONE);
        assert_eq!(app.cursor, d(2024, 3, 15));
    }

    #[test]
    fn test_cursor_stops_at_window_start() {
        let mut app = make_app();
        app.cursor = d(2024, 3, 1);
        app.handle_key(KeyCode::Left, KeyModifiers::NONE);
        assert_eq!(app.cursor, d(2024, 3, 1));
        app.handle_key(KeyCode::Up, KeyModifiers::NONE);
        assert_eq!(app.cursor, d(2024, 3, 1));
    }

    #[test]
    fn test_cursor_stops_at_window_end() {
        let mut app = make_app();
        // Last month of the 12-month window is February 2025.
        app.cursor = d(2025, 2, 28);
        app.scroll_to_cursor();
        app.handle_key(KeyCode::Right, KeyModifiers::NONE);
        assert_eq!(app.cursor, d(2025, 2, 28));
        app.handle_key(KeyCode::Char('n'), KeyModifiers::NONE);
        assert_eq!(app.cursor, d(2025, 2, 28));
    }

    #[test]
    fn test_n_and_p_move_by_month_and_scroll() {
        let mut app = make_app();
        app.handle_key(KeyCode::Char('n'), KeyModifiers::NONE);
        assert_eq!(app.cursor, d(2024, 4, 15));
        assert_eq!(app.view_offset, 0); // April is still on screen

        app.handle_key(KeyCode::Char('n'), KeyModifiers::NONE);
        app.handle_key(KeyCode::Char('n'), KeyModifiers::NONE);
        assert_eq!(app.cursor, d(2024, 6, 15));
        assert_eq!(app.view_offset, 1); // scrolled to keep June visible

        app.handle_key(KeyCode::Char('p'), KeyModifiers::NONE);
        assert_eq!(app.cursor, d(2024, 5, 15));
        assert_eq!(app.view_offset, 1);
    }

    #[test]
    fn test_p_at_first_month_does_nothing() {
        let mut app = make_app();
        app.handle_key(KeyCode::Char('p'), KeyModifiers::NONE);
        assert_eq!(app.cursor, d(2024, 3, 15));
        assert_eq!(app.view_offset, 0);
    }

    #[test]
    fn test_t_jumps_back_to_today() {
        let mut app = make_app();
        for _ in 0..5 {
            app.handle_key(KeyCode::Char('n'), KeyModifiers::NONE);
        }
        app.handle_key(KeyCode::Char('t'), KeyModifiers::NONE);
        assert_eq!(app.cursor, d(2024, 3, 15));
        assert_eq!(app.view_offset, 0);
    }

    #[test]
    fn test_scrolling_back_moves_view_offset_down() {
        let mut app = make_app();
        for _ in 0..4 {
            app.handle_key(KeyCode::Char('n'), KeyModifiers::NONE);
        }
        assert_eq!(app.view_offset, 2);
        for _ in 0..4 {
            app.handle_key(KeyCode::Char('p'), KeyModifiers::NONE);
        }
        assert_eq!(app.cursor, d(2024, 3, 15));
        assert_eq!(app.view_offset, 0);
    }

    // ── Tapping ───────────────────────────────────────────────────────────────

    #[test]
    fn test_space_taps_the_cursor_date() {
        let mut app = make_app();
        app.handle_key(KeyCode::Char(' '), KeyModifiers::NONE);
        assert_eq!(app.selector.state(), SelectionState::StartOnly(d(2024, 3, 15)));
    }

    #[test]
    fn test_two_taps_complete_a_range() {
        let mut app = make_app();
        app.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        app.handle_key(KeyCode::Down, KeyModifiers::NONE);
        app.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(
            app.selector.state(),
            SelectionState::Complete {
                start: d(2024, 3, 15),
                end: d(2024, 3, 22),
            }
        );
    }

    #[test]
    fn test_tap_after_complete_range_restarts() {
        let mut app = make_app();
        app.handle_key(KeyCode::Char(' '), KeyModifiers::NONE);
        app.handle_key(KeyCode::Right, KeyModifiers::NONE);
        app.handle_key(KeyCode::Char(' '), KeyModifiers::NONE);
        app.handle_key(KeyCode::Right, KeyModifiers::NONE);
        app.handle_key(KeyCode::Char(' '), KeyModifiers::NONE);
        assert_eq!(app.selector.state(), SelectionState::StartOnly(d(2024, 3, 17)));
    }

    // ── Quitting ──────────────────────────────────────────────────────────────

    #[test]
    fn test_q_quits() {
        let mut app = make_app();
        assert!(app.handle_key(KeyCode::Char('q'), KeyModifiers::NONE));
    }

    #[test]
    fn test_ctrl_c_quits() {
        let mut app = make_app();
        assert!(app.handle_key(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(!app.handle_key(KeyCode::Char('c'), KeyModifiers::NONE));
    }

    // ── day_style ─────────────────────────────────────────────────────────────

    #[test]
    fn test_style_boundaries_invert() {
        let expected = Style::default()
            .fg(Color::Black)
            .bg(Color::Yellow)
            .add_modifier(Modifier::BOLD);
        assert_eq!(day_style(Classification::RangeStart, false, false), expected);
        assert_eq!(day_style(Classification::RangeEnd, false, false), expected);
    }

    #[test]
    fn test_style_in_range() {
        assert_eq!(
            day_style(Classification::InRange, false, false),
            Style::default().fg(Color::Yellow)
        );
    }

    #[test]
    fn test_style_out_of_range_dims() {
        assert_eq!(
            day_style(Classification::OutOfRange, false, false),
            Style::default().add_modifier(Modifier::DIM)
        );
    }

    #[test]
    fn test_style_default_plain() {
        assert_eq!(day_style(Classification::Default, false, false), Style::default());
    }

    #[test]
    fn test_style_cursor_and_today_modifiers() {
        let s = day_style(Classification::Default, true, true);
        assert_eq!(
            s,
            Style::default().add_modifier(Modifier::UNDERLINED | Modifier::REVERSED)
        );
    }
}
