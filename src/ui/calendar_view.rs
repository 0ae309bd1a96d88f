use crate::calc::{EnergyBucket, GridCell, MonthView};
use crate::data::{AppSettings, EnergyLevel, EntryStore};
use crate::ui::draft::Draft;
use anyhow::Result;
use chrono::{Datelike, Duration, NaiveDate};
use crossterm::event::{self, Event as CEvent, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Row, Table, Wrap},
    Frame, Terminal,
};
use std::io::Stdout;
use std::path::PathBuf;
use std::time::Duration as StdDuration;
use tracing::{error, info};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

// emerald, for the top bucket
const HIGH_COLOR: Color = Color::Rgb(16, 185, 129);

/// Characters per day column; seven columns make a week row.
const CELL_WIDTH: usize = 7;
const CALENDAR_WIDTH: u16 = (CELL_WIDTH * 7) as u16 + 2;

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    Normal,
    EditActivities,
    EditNotes,
}

pub struct App<'a> {
    store: &'a mut EntryStore,
    month: MonthView,
    /// Keyboard position in the grid. Becomes the selection on Enter.
    cursor: NaiveDate,
    today: NaiveDate,
    draft: Draft,
    mode: Mode,
    input_buffer: String,
    /// Result of the last save (message, color). Cleared on next keypress.
    status: Option<(String, Color)>,
    data_dir: PathBuf,
}

impl<'a> App<'a> {
    pub fn new(
        store: &'a mut EntryStore,
        settings: &AppSettings,
        today: NaiveDate,
        data_dir: PathBuf,
    ) -> Self {
        App {
            store,
            month: MonthView::from_date(today),
            cursor: today,
            today,
            draft: Draft::new(settings.default_level()),
            mode: Mode::Normal,
            input_buffer: String::new(),
            status: None,
            data_dir,
        }
    }

    fn move_cursor(&mut self, days: i64) {
        if let Some(date) = self.cursor.checked_add_signed(Duration::days(days)) {
            self.cursor = date;
            if !self.month.contains(date) {
                self.month = MonthView::from_date(date);
            }
        }
    }

    fn show_month(&mut self, month: MonthView) {
        self.month = month;
        self.cursor = month.clamp_day(self.cursor.day());
    }

    fn begin_edit(&mut self, mode: Mode) {
        if self.draft.selected.is_none() {
            return;
        }
        self.input_buffer = match mode {
            Mode::EditActivities => self.draft.activities.clone(),
            Mode::EditNotes => self.draft.notes.clone(),
            Mode::Normal => return,
        };
        self.mode = mode;
    }

    fn save(&mut self) {
        match self.draft.save(self.store) {
            Ok(Some(entry)) => {
                info!(date = %entry.key(), level = entry.level.get(), "saved energy entry");
                self.status = Some((format!("Saved entry for {}", entry.key()), Color::Green));
            }
            Ok(None) => {}
            Err(err) => {
                let reason = format!("{err:#}");
                error!(error = %reason, "failed to write energy entries");
                self.status = Some((
                    format!("Kept in memory but not written: {reason} (s to retry)"),
                    Color::Yellow,
                ));
            }
        }
    }

    /// Returns true if the app should quit.
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }
        match self.mode {
            Mode::EditActivities | Mode::EditNotes => {
                self.handle_edit_key(code, modifiers);
                false
            }
            Mode::Normal => self.handle_normal_key(code),
        }
    }

    fn handle_normal_key(&mut self, code: KeyCode) -> bool {
        self.status = None;
        let has_selection = self.draft.selected.is_some();

        match code {
            KeyCode::Left => self.move_cursor(-1),
            KeyCode::Right => self.move_cursor(1),
            KeyCode::Up => self.move_cursor(-7),
            KeyCode::Down => self.move_cursor(7),
            KeyCode::Enter | KeyCode::Char(' ') => self.draft.select(self.cursor, self.store),
            KeyCode::Char('n') => self.show_month(self.month.next()),
            KeyCode::Char('p') => self.show_month(self.month.prev()),
            KeyCode::Char('t') => {
                self.cursor = self.today;
                self.month = MonthView::from_date(self.today);
            }
            KeyCode::Char('+') | KeyCode::Char('=') if has_selection => self.draft.adjust_level(1),
            KeyCode::Char('-') if has_selection => self.draft.adjust_level(-1),
            KeyCode::Char(c) if has_selection && c.is_ascii_digit() => {
                let value = c.to_digit(10).unwrap_or(0);
                self.draft.set_level(if value == 0 { 10 } else { value as i32 });
            }
            KeyCode::Char('a') => self.begin_edit(Mode::EditActivities),
            KeyCode::Char('e') => self.begin_edit(Mode::EditNotes),
            KeyCode::Char('s') => self.save(),
            KeyCode::Char('q') => return true,
            _ => {}
        }
        false
    }

    fn handle_edit_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        match code {
            KeyCode::Char(_) if modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {}
            KeyCode::Char(c) => self.input_buffer.push(c),
            KeyCode::Backspace => {
                self.input_buffer.pop();
            }
            KeyCode::Enter => {
                let value = std::mem::take(&mut self.input_buffer);
                match self.mode {
                    Mode::EditActivities => self.draft.activities = value,
                    Mode::EditNotes => self.draft.notes = value,
                    Mode::Normal => {}
                }
                self.mode = Mode::Normal;
            }
            KeyCode::Esc => {
                self.input_buffer.clear();
                self.mode = Mode::Normal;
            }
            _ => {}
        }
    }

    pub fn render(&self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(16),   // calendar + entry panel
                Constraint::Length(3), // legend
                Constraint::Length(7), // key bindings + data dir footer
            ])
            .split(f.area());

        let top = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(CALENDAR_WIDTH), Constraint::Min(30)])
            .split(chunks[0]);

        self.render_calendar(f, top[0]);
        self.render_entry_panel(f, top[1]);
        self.render_legend(f, chunks[1]);
        self.render_help(f, chunks[2]);
    }

    fn render_calendar(&self, f: &mut Frame, area: Rect) {
        let header: Vec<Span> = WEEKDAYS
            .iter()
            .map(|name| {
                Span::styled(
                    format!("{:^width$}", name, width = CELL_WIDTH),
                    Style::default().add_modifier(Modifier::BOLD),
                )
            })
            .collect();
        let mut lines: Vec<Line> = vec![Line::from(header)];

        for week in self.month.weeks(self.store, self.today, self.draft.selected) {
            let mut numbers = Vec::new();
            let mut previews = Vec::new();
            for cell in &week {
                match cell {
                    GridCell::Blank => {
                        numbers.push(Span::raw(" ".repeat(CELL_WIDTH)));
                        previews.push(Span::raw(" ".repeat(CELL_WIDTH)));
                    }
                    GridCell::Day(day) => {
                        let style = day_cell_style(
                            day.is_selected,
                            day.date == self.cursor,
                            day.bucket,
                            day.is_today,
                        );
                        numbers.push(Span::raw("  "));
                        numbers.push(Span::styled(format!("{:>2}", day.day), style));
                        numbers.push(match day.bucket {
                            Some(b) => Span::styled(" ■ ", Style::default().fg(bucket_color(b))),
                            None => Span::raw("   "),
                        });
                        let preview = day
                            .first_activity
                            .map(|a| truncate(a, CELL_WIDTH - 1))
                            .unwrap_or_default();
                        let pad = (CELL_WIDTH - 1).saturating_sub(preview.width());
                        previews.push(Span::styled(
                            format!(" {}{}", preview, " ".repeat(pad)),
                            Style::default().fg(Color::DarkGray),
                        ));
                    }
                }
            }
            lines.push(Line::from(numbers));
            lines.push(Line::from(previews));
        }

        let title = format!(" ← p   {}   n → ", self.month.title());
        let widget = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .title_style(Style::default().add_modifier(Modifier::BOLD)),
        );
        f.render_widget(widget, area);
    }

    fn render_entry_panel(&self, f: &mut Frame, area: Rect) {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let hint = Style::default().fg(Color::DarkGray);
        let mut lines: Vec<Line> = Vec::new();

        let title = match self.draft.selected {
            Some(date) => format!(" Entry for {} ", date.format("%A, %B %-d, %Y")),
            None => " Select a date ".to_string(),
        };

        match self.draft.selected {
            None => {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    "Press Enter on a date to add or view an energy entry",
                    hint,
                )));
            }
            Some(date) => {
                lines.push(Line::from(vec![
                    Span::styled("Energy Level: ", bold),
                    Span::raw(format!("{}/10", self.draft.level)),
                ]));
                lines.push(level_gauge(self.draft.level));
                lines.push(Line::from(Span::styled("Low       Medium      High", hint)));
                lines.push(Line::from(""));

                lines.push(Line::from(Span::styled("Activities (comma-separated)", bold)));
                lines.extend(self.field_lines(
                    Mode::EditActivities,
                    &self.draft.activities,
                    "Exercise, Work, Meeting...",
                ));
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled("Notes", bold)));
                lines.extend(self.field_lines(
                    Mode::EditNotes,
                    &self.draft.notes,
                    "How did you feel? What affected your energy?",
                ));
                if self.mode != Mode::Normal {
                    lines.push(Line::from(Span::styled("Enter=done  Esc=cancel", hint)));
                }

                if let Some(entry) = self.store.get_date(date) {
                    lines.push(Line::from(""));
                    lines.push(Line::from(Span::styled("Saved Information:", bold)));
                    lines.push(Line::from(format!("  Energy: {}/10", entry.level)));
                    if !entry.activities.is_empty() {
                        lines.push(Line::from("  Activities:"));
                        for activity in &entry.activities {
                            lines.push(Line::from(format!("    • {}", activity)));
                        }
                    }
                    if !entry.notes.is_empty() {
                        lines.push(Line::from("  Notes:"));
                        for note in entry.notes.lines() {
                            lines.push(Line::from(format!("    {}", note)));
                        }
                    }
                }
            }
        }

        if let Some((msg, color)) = &self.status {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                msg.clone(),
                Style::default().fg(*color).add_modifier(Modifier::BOLD),
            )));
        }

        let panel = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title(title));
        f.render_widget(panel, area);
    }

    /// One line per stored line of `value`, so multi-line notes keep their breaks.
    fn field_lines(&self, mode: Mode, value: &str, placeholder: &'static str) -> Vec<Line<'static>> {
        let (text, style) = if self.mode == mode {
            (format!("{}_", self.input_buffer), Style::default().fg(Color::Yellow))
        } else if value.is_empty() {
            (placeholder.to_string(), Style::default().fg(Color::DarkGray))
        } else {
            (value.to_string(), Style::default())
        };
        text.lines()
            .map(|line| Line::from(Span::styled(line.to_string(), style)))
            .collect()
    }

    fn render_legend(&self, f: &mut Frame, area: Rect) {
        let mut spans = Vec::new();
        for bucket in EnergyBucket::ALL {
            spans.push(Span::styled("■■ ", Style::default().fg(bucket_color(bucket))));
            spans.push(Span::raw(format!(
                "{} ({})    ",
                bucket.label(),
                bucket.range_label()
            )));
        }
        let legend = Paragraph::new(Line::from(spans))
            .block(Block::default().borders(Borders::ALL).title(" Energy Legend "));
        f.render_widget(legend, area);
    }

    fn render_help(&self, f: &mut Frame, area: Rect) {
        let key_rows: Vec<Row> = vec![
            Row::new(vec!["← → ↑ ↓", "Move cursor", "n / p", "Next/prev month"]),
            Row::new(vec!["Enter", "Select date", "t", "Jump to today"]),
            Row::new(vec!["+ / -", "Adjust level", "1-9, 0", "Set level (0 = 10)"]),
            Row::new(vec!["a", "Edit activities", "e", "Edit notes"]),
            Row::new(vec!["s", "Save entry", "q/Ctrl+C", "Quit"]),
        ];

        let help_table = Table::new(
            key_rows,
            [
                Constraint::Length(12),
                Constraint::Length(20),
                Constraint::Length(12),
                Constraint::Length(20),
            ],
        )
        .block(Block::default().borders(Borders::NONE))
        .column_spacing(1);

        let help_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(5),    // help table
                Constraint::Length(1), // data dir footer
            ])
            .split(area);

        f.render_widget(help_table, help_chunks[0]);

        let footer = Paragraph::new(Line::from(vec![
            Span::styled("Data  ", Style::default().add_modifier(Modifier::DIM)),
            Span::styled(
                self.data_dir.to_string_lossy().to_string(),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
        f.render_widget(footer, help_chunks[1]);
    }
}

// ── App event loop ────────────────────────────────────────────────────────────

pub fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| app.render(f))?;
        if event::poll(StdDuration::from_millis(16))? {
            if let CEvent::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if app.handle_key(key.code, key.modifiers) {
                    break;
                }
            }
        }
    }
    Ok(())
}

// ── Cell helpers ──────────────────────────────────────────────────────────────

pub(crate) fn bucket_color(bucket: EnergyBucket) -> Color {
    match bucket {
        EnergyBucket::Low => Color::Red,
        EnergyBucket::Medium => Color::Yellow,
        EnergyBucket::Good => Color::Green,
        EnergyBucket::High => HIGH_COLOR,
    }
}

/// Style for a day number. Selection wins, then bucket color, then today/cursor marks.
pub(crate) fn day_cell_style(
    is_selected: bool,
    is_cursor: bool,
    bucket: Option<EnergyBucket>,
    is_today: bool,
) -> Style {
    if is_selected {
        let bg = bucket.map(bucket_color).unwrap_or(Color::White);
        return Style::default()
            .fg(Color::Black)
            .bg(bg)
            .add_modifier(Modifier::BOLD);
    }
    let mut s = match bucket {
        Some(b) => Style::default()
            .fg(bucket_color(b))
            .add_modifier(Modifier::BOLD),
        None => Style::default(),
    };
    if is_today {
        s = s.add_modifier(Modifier::REVERSED);
    }
    if is_cursor {
        s = s.add_modifier(Modifier::UNDERLINED);
    }
    s
}

/// Ten-segment bar filled up to `level`.
fn level_gauge(level: EnergyLevel) -> Line<'static> {
    let filled = level.get() as usize;
    let color = bucket_color(EnergyBucket::from_level(level));
    Line::from(vec![
        Span::styled("█".repeat(filled), Style::default().fg(color)),
        Span::styled(
            "░".repeat(EnergyLevel::MAX as usize - filled),
            Style::default().fg(Color::DarkGray),
        ),
    ])
}

/// Shortens `s` to at most `width` terminal columns, marking the cut with '…'.
pub(crate) fn truncate(s: &str, width: usize) -> String {
    if s.width() <= width {
        return s.to_string();
    }
    let budget = width.saturating_sub(1);
    let mut used = 0;
    let mut out = String::new();
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::EnergyEntry;
    use crossterm::event::{KeyCode, KeyModifiers};
    use ratatui::backend::TestBackend;
    use std::fs;
    use tempfile::TempDir;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn make_test_app(store: &mut EntryStore, today: NaiveDate) -> App<'_> {
        App::new(store, &AppSettings::default(), today, PathBuf::from("/tmp/test"))
    }

    fn press(app: &mut App, code: KeyCode) -> bool {
        app.handle_key(code, KeyModifiers::empty())
    }

    /// Renders the app and returns each buffer row as a string.
    fn render_rows(app: &App, width: u16, height: u16) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
        let buffer = terminal.backend().buffer();
        (0..height)
            .map(|y| (0..width).map(|x| buffer[(x, y)].symbol()).collect())
            .collect()
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    // ── day_cell_style tests ──────────────────────────────────────────────────

    #[test]
    fn test_style_selected_with_bucket_uses_bucket_background() {
        let s = day_cell_style(true, false, Some(EnergyBucket::Good), false);
        assert_eq!(s, Style::default().fg(Color::Black).bg(Color::Green).add_modifier(Modifier::BOLD));
    }

    #[test]
    fn test_style_selected_without_entry() {
        let s = day_cell_style(true, true, None, true);
        assert_eq!(s, Style::default().fg(Color::Black).bg(Color::White).add_modifier(Modifier::BOLD));
    }

    #[test]
    fn test_style_bucket_not_selected() {
        let s = day_cell_style(false, false, Some(EnergyBucket::Low), false);
        assert_eq!(s, Style::default().fg(Color::Red).add_modifier(Modifier::BOLD));
    }

    #[test]
    fn test_style_today_and_cursor_marks() {
        let s = day_cell_style(false, true, None, true);
        assert_eq!(
            s,
            Style::default().add_modifier(Modifier::REVERSED | Modifier::UNDERLINED)
        );
    }

    #[test]
    fn test_style_plain_day() {
        assert_eq!(day_cell_style(false, false, None, false), Style::default());
    }

    #[test]
    fn test_bucket_colors_are_distinct() {
        let colors: Vec<Color> = EnergyBucket::ALL.iter().map(|b| bucket_color(*b)).collect();
        for (i, a) in colors.iter().enumerate() {
            assert!(!colors[i + 1..].contains(a));
        }
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Run", 6), "Run");
        assert_eq!(truncate("Exercise", 6), "Exerc…");
        assert_eq!(truncate("", 6), "");
    }

    #[test]
    fn test_truncate_counts_display_columns() {
        // each CJK character takes two columns
        assert_eq!(truncate("読書", 6), "読書");
        assert_eq!(truncate("読書と散歩", 6), "読書…");
        assert_eq!(truncate("読書と散歩", 6).width(), 5);
        assert!(truncate("🏃🏃🏃🏃", 6).width() <= 6);
    }

    #[test]
    fn test_wide_activity_preview_keeps_week_columns_aligned() {
        let tmp = TempDir::new().unwrap();
        let mut store = EntryStore::new(tmp.path());
        store
            .upsert(EnergyEntry::new(d(2024, 3, 15), EnergyLevel::new(8).unwrap(), "読書と散歩", ""))
            .unwrap();
        store
            .upsert(EnergyEntry::new(d(2024, 3, 16), EnergyLevel::new(8).unwrap(), "Saturday", ""))
            .unwrap();
        let app = make_test_app(&mut store, d(2024, 3, 1));

        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
        let buffer = terminal.backend().buffer();
        let (fri_x, y) = (0..CALENDAR_WIDTH)
            .flat_map(|x| (0..40u16).map(move |y| (x, y)))
            .find(|&pos| buffer[pos].symbol() == "読")
            .unwrap();
        let sat_x = (0..CALENDAR_WIDTH)
            .find(|&x| buffer[(x, y)].symbol() == "S")
            .unwrap();
        assert_eq!(usize::from(sat_x - fri_x), CELL_WIDTH);
    }

    // ── handle_key tests ──────────────────────────────────────────────────────

    #[test]
    fn test_arrow_keys_move_cursor() {
        let tmp = TempDir::new().unwrap();
        let mut store = EntryStore::new(tmp.path());
        let mut app = make_test_app(&mut store, d(2024, 3, 15));

        press(&mut app, KeyCode::Right);
        assert_eq!(app.cursor, d(2024, 3, 16));
        press(&mut app, KeyCode::Left);
        assert_eq!(app.cursor, d(2024, 3, 15));
        press(&mut app, KeyCode::Down);
        assert_eq!(app.cursor, d(2024, 3, 22));
        press(&mut app, KeyCode::Up);
        assert_eq!(app.cursor, d(2024, 3, 15));
        assert_eq!(app.draft.selected, None);
    }

    #[test]
    fn test_cursor_leaving_month_moves_view() {
        let tmp = TempDir::new().unwrap();
        let mut store = EntryStore::new(tmp.path());
        let mut app = make_test_app(&mut store, d(2024, 3, 1));

        press(&mut app, KeyCode::Left);
        assert_eq!(app.cursor, d(2024, 2, 29));
        assert_eq!(app.month, MonthView::new(2024, 1).unwrap());
    }

    #[test]
    fn test_n_and_p_navigate_months_across_years() {
        let tmp = TempDir::new().unwrap();
        let mut store = EntryStore::new(tmp.path());
        let mut app = make_test_app(&mut store, d(2024, 1, 31));

        press(&mut app, KeyCode::Char('p'));
        assert_eq!(app.month, MonthView::new(2023, 11).unwrap());
        assert_eq!(app.cursor, d(2023, 12, 31));

        press(&mut app, KeyCode::Char('n'));
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.month, MonthView::new(2024, 1).unwrap());
        assert_eq!(app.cursor, d(2024, 2, 29));

        press(&mut app, KeyCode::Char('t'));
        assert_eq!(app.cursor, d(2024, 1, 31));
        assert_eq!(app.month, MonthView::new(2024, 0).unwrap());
    }

    #[test]
    fn test_enter_selects_and_populates_draft() {
        let tmp = TempDir::new().unwrap();
        let mut store = EntryStore::new(tmp.path());
        store
            .upsert(EnergyEntry::new(d(2024, 3, 15), EnergyLevel::new(9).unwrap(), "Run,Read", "yay"))
            .unwrap();
        let mut app = make_test_app(&mut store, d(2024, 3, 15));

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.draft.selected, Some(d(2024, 3, 15)));
        assert_eq!(app.draft.level.get(), 9);
        assert_eq!(app.draft.activities, "Run, Read");
        assert_eq!(app.draft.notes, "yay");
    }

    #[test]
    fn test_full_entry_flow_saves_and_resets_draft() {
        let tmp = TempDir::new().unwrap();
        let mut store = EntryStore::new(tmp.path());
        let mut app = make_test_app(&mut store, d(2024, 3, 15));

        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('8'));
        press(&mut app, KeyCode::Char('a'));
        type_text(&mut app, "Run, Read");
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('e'));
        type_text(&mut app, "Great day");
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('s'));

        let entry = app.store.get("2024-03-15").unwrap().clone();
        assert_eq!(entry.level.get(), 8);
        assert_eq!(entry.activities, vec!["Run", "Read"]);
        assert_eq!(entry.notes, "Great day");
        assert_eq!(app.draft.level.get(), 5);
        assert_eq!(app.draft.activities, "");
        assert_eq!(app.draft.notes, "");
        assert_eq!(app.status.as_ref().map(|(_, c)| *c), Some(Color::Green));
        assert!(tmp.path().join("energy_entries.json").exists());
    }

    #[test]
    fn test_typing_commands_while_editing_does_not_trigger_them() {
        let tmp = TempDir::new().unwrap();
        let mut store = EntryStore::new(tmp.path());
        let mut app = make_test_app(&mut store, d(2024, 3, 15));

        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('e'));
        let quit = press(&mut app, KeyCode::Char('q'));
        type_text(&mut app, "snap");
        press(&mut app, KeyCode::Enter);

        assert!(!quit);
        assert_eq!(app.draft.notes, "qsnap");
        assert!(app.store.is_empty());
        assert_eq!(app.month, MonthView::new(2024, 2).unwrap());
    }

    #[test]
    fn test_esc_cancels_edit_and_backspace_deletes() {
        let tmp = TempDir::new().unwrap();
        let mut store = EntryStore::new(tmp.path());
        let mut app = make_test_app(&mut store, d(2024, 3, 15));

        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('a'));
        type_text(&mut app, "Runx");
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.draft.activities, "Run");

        press(&mut app, KeyCode::Char('a'));
        type_text(&mut app, ", Nap");
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.draft.activities, "Run");
        assert_eq!(app.mode, Mode::Normal);
    }

    #[test]
    fn test_form_keys_ignored_without_selection() {
        let tmp = TempDir::new().unwrap();
        let mut store = EntryStore::new(tmp.path());
        let mut app = make_test_app(&mut store, d(2024, 3, 15));

        press(&mut app, KeyCode::Char('9'));
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.mode, Mode::Normal);
        assert_eq!(app.draft.level.get(), 5);

        press(&mut app, KeyCode::Char('s'));
        assert!(app.store.is_empty());
        assert!(app.status.is_none());
    }

    #[test]
    fn test_level_keys_clamp_and_zero_means_ten() {
        let tmp = TempDir::new().unwrap();
        let mut store = EntryStore::new(tmp.path());
        let mut app = make_test_app(&mut store, d(2024, 3, 15));

        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('0'));
        assert_eq!(app.draft.level.get(), 10);
        press(&mut app, KeyCode::Char('+'));
        assert_eq!(app.draft.level.get(), 10);
        press(&mut app, KeyCode::Char('1'));
        press(&mut app, KeyCode::Char('-'));
        assert_eq!(app.draft.level.get(), 1);
        press(&mut app, KeyCode::Char('='));
        assert_eq!(app.draft.level.get(), 2);
    }

    #[test]
    fn test_failed_write_shows_warning_and_keeps_edit() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("file");
        fs::write(&blocker, "x").unwrap();
        let mut store = EntryStore::new(&blocker);
        let mut app = make_test_app(&mut store, d(2024, 3, 15));

        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('7'));
        press(&mut app, KeyCode::Char('s'));

        assert_eq!(app.status.as_ref().map(|(_, c)| *c), Some(Color::Yellow));
        assert_eq!(app.store.get("2024-03-15").map(|e| e.level.get()), Some(7));
        assert_eq!(app.draft.level.get(), 7);
    }

    #[test]
    fn test_status_cleared_on_next_key() {
        let tmp = TempDir::new().unwrap();
        let mut store = EntryStore::new(tmp.path());
        let mut app = make_test_app(&mut store, d(2024, 3, 15));

        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('s'));
        assert!(app.status.is_some());
        press(&mut app, KeyCode::Right);
        assert!(app.status.is_none());
    }

    #[test]
    fn test_q_and_ctrl_c_quit() {
        let tmp = TempDir::new().unwrap();
        let mut store = EntryStore::new(tmp.path());
        let mut app = make_test_app(&mut store, d(2024, 3, 15));

        assert!(app.handle_key(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(press(&mut app, KeyCode::Char('q')));
    }

    #[test]
    fn test_modified_characters_are_not_typed_into_fields() {
        let tmp = TempDir::new().unwrap();
        let mut store = EntryStore::new(tmp.path());
        let mut app = make_test_app(&mut store, d(2024, 3, 15));

        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('e'));
        type_text(&mut app, "ok");
        app.handle_key(KeyCode::Char('s'), KeyModifiers::CONTROL);
        app.handle_key(KeyCode::Char('x'), KeyModifiers::ALT);
        app.handle_key(KeyCode::Char('A'), KeyModifiers::SHIFT);
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.draft.notes, "okA");
    }

    #[test]
    fn test_multi_line_notes_render_on_separate_rows() {
        let tmp = TempDir::new().unwrap();
        let mut store = EntryStore::new(tmp.path());
        store
            .upsert(EnergyEntry::new(
                d(2024, 3, 15),
                EnergyLevel::new(6).unwrap(),
                "",
                "line one\nline two",
            ))
            .unwrap();
        let mut app = make_test_app(&mut store, d(2024, 3, 15));
        press(&mut app, KeyCode::Enter);

        let rows = render_rows(&app, 120, 40);
        assert!(rows.iter().all(|r| !r.contains("line oneline two")));
        // once in the draft field, once under the saved information
        assert_eq!(rows.iter().filter(|r| r.contains("line one")).count(), 2);
        assert_eq!(rows.iter().filter(|r| r.contains("line two")).count(), 2);
    }

    #[test]
    fn test_ctrl_c_quits_even_while_editing() {
        let tmp = TempDir::new().unwrap();
        let mut store = EntryStore::new(tmp.path());
        let mut app = make_test_app(&mut store, d(2024, 3, 15));

        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('a'));
        assert!(app.handle_key(KeyCode::Char('c'), KeyModifiers::CONTROL));
    }

    // ── render smoke test ─────────────────────────────────────────────────────

    #[test]
    fn test_render_shows_month_title_and_legend() {
        let tmp = TempDir::new().unwrap();
        let mut store = EntryStore::new(tmp.path());
        store
            .upsert(EnergyEntry::new(d(2024, 3, 15), EnergyLevel::new(8).unwrap(), "Run", ""))
            .unwrap();
        let mut app = make_test_app(&mut store, d(2024, 3, 15));
        press(&mut app, KeyCode::Enter);

        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();

        assert!(text.contains("March 2024"));
        assert!(text.contains("Energy Legend"));
        assert!(text.contains("High (8-10)"));
        assert!(text.contains("Saved Information:"));
    }
}
