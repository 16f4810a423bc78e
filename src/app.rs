//! Application state and event handling.
//!
//! Elm-style centralized state: one `App` struct owns the preferences, the
//! sampled "now", the modal view stack and all transient UI state. Every
//! frame re-derives the grid classification from `now`, so there is nothing
//! incremental to keep consistent.

use std::time::Instant;

use chrono::{Duration, NaiveDateTime, Timelike};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::calendar::{self, BucketClass};
use crate::config::{PrefStore, Preferences};
use crate::particles::ParticleSystem;

/// Phantom rows rendered above the first life year.
pub const PHANTOM_PRE_YEARS: usize = 16;
/// Phantom rows rendered below the last life year.
pub const PHANTOM_POST_YEARS: usize = 10;

/// One level of the drill-down hierarchy. Each variant except `Year` carries
/// the start instant of the bucket being expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Year,
    Week { start: NaiveDateTime },
    Day { start: NaiveDateTime },
    Hour { start: NaiveDateTime },
    Minute { start: NaiveDateTime },
}

impl View {
    /// Number of selectable cells in this view's grid.
    pub fn cell_count(&self, total_weeks: i64) -> usize {
        match self {
            View::Year => total_weeks.max(0) as usize,
            View::Week { .. } => 7,
            View::Day { .. } => 24,
            View::Hour { .. } | View::Minute { .. } => 60,
        }
    }

    /// Grid columns used for cursor movement and rendering.
    pub fn grid_cols(&self) -> usize {
        match self {
            View::Year => calendar::WEEKS_PER_YEAR as usize,
            View::Week { .. } => 7,
            View::Day { .. } => 8,
            View::Hour { .. } | View::Minute { .. } => 10,
        }
    }

    /// Duration of one cell at this view's granularity.
    pub fn cell_duration(&self) -> Duration {
        match self {
            View::Year => calendar::week(),
            View::Week { .. } => calendar::day(),
            View::Day { .. } => calendar::hour(),
            View::Hour { .. } => calendar::minute(),
            View::Minute { .. } => calendar::second(),
        }
    }
}

/// A view plus its cursor; pushed whole onto the stack so back-navigation
/// restores the parent exactly as the user left it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewFrame {
    pub view: View,
    pub cursor: usize,
}

/// Input mode for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Normal navigation mode
    #[default]
    Normal,
    /// Editing the birth date field
    EditingBirthDate,
    /// Editing the life expectancy field
    EditingExpectancy,
}

/// Log entry for the status area
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: Instant,
    pub message: String,
    pub level: LogLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warning,
    Error,
}

impl LogEntry {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            timestamp: Instant::now(),
            message: message.into(),
            level: LogLevel::Info,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            timestamp: Instant::now(),
            message: message.into(),
            level: LogLevel::Warning,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            timestamp: Instant::now(),
            message: message.into(),
            level: LogLevel::Error,
        }
    }
}

/// Main application state
pub struct App {
    /// Whether the application should quit
    pub should_quit: bool,

    /// Latest sampled wall-clock instant, refreshed once per second
    pub now: NaiveDateTime,

    /// Persisted preferences (birth date string, life expectancy)
    pub prefs: Preferences,

    /// Injected preference storage
    store: Box<dyn PrefStore>,

    /// Birth date derived from the preference string; `None` means the
    /// stored string is set but invalid, and no grid can be rendered
    pub birth_date: Option<NaiveDateTime>,

    /// Current view and cursor
    pub frame: ViewFrame,

    /// Parent views for back-navigation
    stack: Vec<ViewFrame>,

    /// Current input mode
    pub input_mode: InputMode,

    /// Text buffer for the field being edited
    pub edit_buffer: String,

    /// Vertical scroll of the year grid, in virtual rows
    pub year_scroll: usize,

    /// Particle system for background animation
    pub particle_system: ParticleSystem,

    /// Status log messages
    pub logs: Vec<LogEntry>,
    max_logs: usize,

    /// Frame counter for animations (pulse effects)
    pub frame_count: u64,

    /// Show help overlay
    pub show_help: bool,

    /// Center the year grid on the current week once a real size is known
    pending_center: bool,

    /// Last known terminal height, for scroll clamping
    term_height: u16,
}

impl App {
    /// Create the application, loading preferences from the injected store.
    pub fn new(store: Box<dyn PrefStore>, now: NaiveDateTime) -> Self {
        let mut logs = Vec::new();
        let prefs = match store.load() {
            Ok(Some(prefs)) => prefs,
            Ok(None) => Preferences::default(),
            Err(e) => {
                logs.push(LogEntry::warning(format!(
                    "Could not read preferences ({e:#}); using defaults"
                )));
                Preferences::default()
            }
        };

        let birth_date = calendar::parse_birth_date(&prefs.birth_date);
        let mut app = Self {
            should_quit: false,
            now,
            prefs,
            store,
            birth_date,
            frame: ViewFrame {
                view: View::Year,
                cursor: 0,
            },
            stack: Vec::new(),
            input_mode: InputMode::Normal,
            edit_buffer: String::new(),
            year_scroll: 0,
            particle_system: ParticleSystem::default(),
            logs,
            max_logs: 100,
            frame_count: 0,
            show_help: false,
            pending_center: true,
            term_height: 0,
        };

        if app.birth_date.is_none() {
            app.log(LogEntry::warning(
                "Stored birth date is invalid; press b to fix it",
            ));
        } else if let Some(idx) = app.current_week_index() {
            app.frame.cursor = idx as usize;
        }
        app
    }

    pub fn log(&mut self, entry: LogEntry) {
        self.logs.push(entry);
        if self.logs.len() > self.max_logs {
            self.logs.remove(0);
        }
    }

    /// Advance animations and track the terminal size. Called every frame.
    pub fn tick(&mut self, width: u16, height: u16) {
        self.frame_count = self.frame_count.wrapping_add(1);
        self.term_height = height;
        self.particle_system.update(width, height);

        if self.pending_center && height > 0 {
            self.center_on_current_week();
            self.pending_center = false;
        }
        self.clamp_year_scroll();
    }

    /// Replace the sampled "now". All classifications derive from this.
    pub fn set_now(&mut self, now: NaiveDateTime) {
        self.now = now;
    }

    pub fn life_expectancy(&self) -> u32 {
        self.prefs.life_expectancy()
    }

    pub fn total_weeks(&self) -> i64 {
        calendar::total_weeks(self.life_expectancy())
    }

    /// Week index containing `now`, when the birth date is valid and `now`
    /// is not before birth.
    pub fn current_week_index(&self) -> Option<i64> {
        let birth = self.birth_date?;
        let idx = calendar::week_index(birth, self.now);
        (idx >= 0).then_some(idx)
    }

    /// Total virtual rows of the year grid: phantom years, two divider
    /// lines, and one row per life year.
    pub fn year_virtual_rows(&self) -> usize {
        PHANTOM_PRE_YEARS + 1 + self.life_expectancy() as usize + 1 + PHANTOM_POST_YEARS
    }

    /// Virtual row of a life year (0-based year of life).
    pub fn year_row(&self, year: usize) -> usize {
        PHANTOM_PRE_YEARS + 1 + year
    }

    fn year_viewport_rows(&self) -> usize {
        // Header (6), footer (4) and the grid border (2) eat into the height.
        usize::from(self.term_height).saturating_sub(12).max(1)
    }

    pub fn center_on_current_week(&mut self) {
        let Some(idx) = self.current_week_index() else {
            return;
        };
        let row = self.year_row((idx / i64::from(calendar::WEEKS_PER_YEAR)) as usize);
        let viewport = self.year_viewport_rows();
        self.year_scroll = row.saturating_sub(viewport / 2);
        self.clamp_year_scroll();
    }

    fn clamp_year_scroll(&mut self) {
        let max_scroll = self
            .year_virtual_rows()
            .saturating_sub(self.year_viewport_rows());
        if self.year_scroll > max_scroll {
            self.year_scroll = max_scroll;
        }
    }

    /// Keep the year cursor's row inside the visible viewport.
    fn scroll_cursor_into_view(&mut self) {
        if self.frame.view != View::Year {
            return;
        }
        let row = self.year_row(self.frame.cursor / calendar::WEEKS_PER_YEAR as usize);
        let viewport = self.year_viewport_rows();
        if row < self.year_scroll {
            self.year_scroll = row;
        } else if row >= self.year_scroll + viewport {
            self.year_scroll = row + 1 - viewport;
        }
    }

    // === Bucketing ===

    /// Start instant of cell `idx` in the given view. `None` only when the
    /// year grid has no valid birth date.
    pub fn cell_start(&self, view: &View, idx: usize) -> Option<NaiveDateTime> {
        match view {
            View::Year => {
                let birth = self.birth_date?;
                Some(calendar::week_index_to_range(birth, idx as i64).0)
            }
            View::Week { start } => Some(*start + calendar::day() * idx as i32),
            View::Day { start } => Some(*start + calendar::hour() * idx as i32),
            View::Hour { start } => Some(*start + calendar::minute() * idx as i32),
            View::Minute { start } => Some(*start + calendar::second() * idx as i32),
        }
    }

    /// Classify cell `idx` of `view` against the sampled now.
    pub fn classify_cell(&self, view: &View, idx: usize) -> (BucketClass, Option<f64>) {
        match self.cell_start(view, idx) {
            Some(start) => calendar::classify(start, view.cell_duration(), self.now),
            None => (BucketClass::Future, None),
        }
    }

    /// Status-line summary of the selected cell.
    pub fn selected_summary(&self) -> Option<String> {
        let idx = self.frame.cursor;
        match self.frame.view {
            View::Year => {
                let birth = self.birth_date?;
                let (start, end) = calendar::week_index_to_range(birth, idx as i64);
                Some(format!(
                    "Week {}: {} - {}",
                    idx + 1,
                    start.format("%Y-%m-%d"),
                    (end - calendar::day()).format("%Y-%m-%d")
                ))
            }
            View::Week { .. } => {
                let start = self.cell_start(&self.frame.view, idx)?;
                Some(start.format("%A, %B %-d %Y").to_string())
            }
            View::Day { .. } => {
                let start = self.cell_start(&self.frame.view, idx)?;
                Some(format!("Hour {}:00 - {}:59", start.format("%H"), start.format("%H")))
            }
            View::Hour { .. } => {
                let start = self.cell_start(&self.frame.view, idx)?;
                Some(format!("Minute {}", start.format("%H:%M")))
            }
            View::Minute { .. } => None,
        }
    }

    // === Navigation ===

    /// Depth of the view stack (0 at the year view).
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// The year-view frame at the bottom of the stack; the current frame
    /// when no drill-down is open.
    pub fn year_frame(&self) -> ViewFrame {
        self.stack.first().copied().unwrap_or(self.frame)
    }

    /// Drill into cell `idx` of the current view. Used by Enter and by
    /// mouse clicks on grid cells.
    pub fn activate_cell(&mut self, idx: usize) {
        if idx >= self.frame.view.cell_count(self.total_weeks()) {
            return;
        }
        self.frame.cursor = idx;

        let child = match self.frame.view {
            View::Year => {
                let Some(start) = self.cell_start(&View::Year, idx) else {
                    return;
                };
                View::Week { start }
            }
            View::Week { .. } => View::Day {
                start: match self.cell_start(&self.frame.view, idx) {
                    Some(s) => s,
                    None => return,
                },
            },
            View::Day { .. } => View::Hour {
                start: match self.cell_start(&self.frame.view, idx) {
                    Some(s) => s,
                    None => return,
                },
            },
            View::Hour { .. } => View::Minute {
                start: match self.cell_start(&self.frame.view, idx) {
                    Some(s) => s,
                    None => return,
                },
            },
            View::Minute { .. } => return,
        };

        self.stack.push(self.frame);
        self.frame = ViewFrame {
            view: child,
            cursor: self.initial_cursor(&child),
        };
    }

    /// Preselect the sub-bucket containing now when drilling into the
    /// current bucket; otherwise start at the first cell.
    fn initial_cursor(&self, view: &View) -> usize {
        let (start, count) = match view {
            View::Year => return 0,
            View::Week { start } => (*start, 7i64),
            View::Day { start } => (*start, 24),
            View::Hour { start } | View::Minute { start } => (*start, 60),
        };
        let span = view.cell_duration() * count as i32;
        if self.now >= start && self.now < start + span {
            let unit_ms = view.cell_duration().num_milliseconds();
            ((self.now - start).num_milliseconds() / unit_ms) as usize
        } else {
            0
        }
    }

    /// Pop back to the parent view, restoring its exact prior state.
    pub fn pop_view(&mut self) {
        if let Some(parent) = self.stack.pop() {
            self.frame = parent;
        }
    }

    fn move_cursor(&mut self, dx: i64, dy: i64) {
        let cols = self.frame.view.grid_cols() as i64;
        let count = self.frame.view.cell_count(self.total_weeks()) as i64;
        if count == 0 {
            return;
        }
        let next = (self.frame.cursor as i64 + dx + dy * cols).clamp(0, count - 1);
        self.frame.cursor = next as usize;
        self.scroll_cursor_into_view();
    }

    // === Input ===

    pub fn handle_key(&mut self, key: KeyEvent) {
        match self.input_mode {
            InputMode::Normal => self.handle_normal_key(key),
            InputMode::EditingBirthDate | InputMode::EditingExpectancy => {
                self.handle_editing_key(key)
            }
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.show_help = !self.show_help,
            KeyCode::Char('p') => {
                self.particle_system.toggle_mode();
                let mode = self.particle_system.mode().name();
                self.log(LogEntry::info(format!("Particles: {mode}")));
            }
            KeyCode::Char('b') => {
                self.edit_buffer = self.prefs.birth_date.clone();
                self.input_mode = InputMode::EditingBirthDate;
            }
            KeyCode::Char('e') => {
                self.edit_buffer = self.life_expectancy().to_string();
                self.input_mode = InputMode::EditingExpectancy;
            }
            KeyCode::Char('c') => self.center_on_current_week(),
            KeyCode::Esc | KeyCode::Backspace => {
                if self.show_help {
                    self.show_help = false;
                } else {
                    self.pop_view();
                }
            }
            KeyCode::Enter => self.activate_cell(self.frame.cursor),
            KeyCode::Left | KeyCode::Char('h') => self.move_cursor(-1, 0),
            KeyCode::Right | KeyCode::Char('l') => self.move_cursor(1, 0),
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(0, -1),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(0, 1),
            KeyCode::PageUp => {
                self.year_scroll = self.year_scroll.saturating_sub(10);
            }
            KeyCode::PageDown => {
                self.year_scroll += 10;
                self.clamp_year_scroll();
            }
            _ => {}
        }
    }

    fn handle_editing_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.edit_buffer.clear();
                self.input_mode = InputMode::Normal;
            }
            KeyCode::Enter => self.commit_edit(),
            KeyCode::Backspace => {
                self.edit_buffer.pop();
            }
            KeyCode::Char(c) if self.edit_buffer.len() < 10 => {
                self.edit_buffer.push(c);
            }
            _ => {}
        }
    }

    fn commit_edit(&mut self) {
        match self.input_mode {
            InputMode::EditingBirthDate => {
                let input = self.edit_buffer.clone();
                self.prefs.set_birth_date(&input);
                self.birth_date = calendar::parse_birth_date(&input);
                match self.birth_date {
                    Some(_) => {
                        self.log(LogEntry::info(format!("Birth date set to {input}")));
                        self.pending_center = true;
                        // The whole grid changed; drop any stale drill-down.
                        self.stack.clear();
                        self.frame = ViewFrame {
                            view: View::Year,
                            cursor: self.current_week_index().unwrap_or(0) as usize,
                        };
                    }
                    None => {
                        self.log(LogEntry::warning(format!(
                            "\"{input}\" is not a valid date (expected YYYY-MM-DD)"
                        )));
                    }
                }
                self.persist_prefs();
            }
            InputMode::EditingExpectancy => {
                let input = self.edit_buffer.clone();
                if self.prefs.set_life_expectancy(&input) {
                    self.log(LogEntry::info(format!(
                        "Life expectancy set to {} years",
                        self.life_expectancy()
                    )));
                    // Cursor may now point past the shrunken grid.
                    let count = self.frame.view.cell_count(self.total_weeks());
                    if count > 0 && self.frame.cursor >= count {
                        self.frame.cursor = count - 1;
                    }
                    self.persist_prefs();
                } else {
                    self.log(LogEntry::warning(format!(
                        "Expectancy must be a whole number between {} and {}; keeping {}",
                        calendar::MIN_LIFE_EXPECTANCY,
                        calendar::MAX_LIFE_EXPECTANCY,
                        self.life_expectancy()
                    )));
                }
            }
            InputMode::Normal => {}
        }
        self.edit_buffer.clear();
        self.input_mode = InputMode::Normal;
    }

    fn persist_prefs(&mut self) {
        if let Err(e) = self.store.save(&self.prefs) {
            self.log(LogEntry::error(format!("Could not save preferences: {e:#}")));
        }
    }

    /// Seconds display for the footer clock.
    pub fn clock_label(&self) -> String {
        format!(
            "{:02}:{:02}:{:02}",
            self.now.hour(),
            self.now.minute(),
            self.now.second()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MemStore;
    use chrono::NaiveDate;
    use crossterm::event::KeyEventState;

    fn dt(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    fn test_app(now: NaiveDateTime) -> App {
        App::new(Box::new(MemStore::default()), now)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: crossterm::event::KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn starts_on_year_view_with_defaults() {
        let app = test_app(dt(2023, 8, 15, 0, 0, 0));
        assert_eq!(app.frame.view, View::Year);
        assert_eq!(app.depth(), 0);
        assert_eq!(app.life_expectancy(), 100);
        assert!(app.birth_date.is_some());
        // Cursor starts on the current week.
        assert_eq!(app.frame.cursor as i64, app.current_week_index().unwrap());
    }

    #[test]
    fn drill_down_chain_reaches_minute_view() {
        let mut app = test_app(dt(2023, 8, 15, 14, 30, 0));
        let week = app.current_week_index().unwrap() as usize;

        app.activate_cell(week);
        assert!(matches!(app.frame.view, View::Week { .. }));
        assert_eq!(app.depth(), 1);

        app.activate_cell(app.frame.cursor);
        assert!(matches!(app.frame.view, View::Day { .. }));

        app.activate_cell(app.frame.cursor);
        assert!(matches!(app.frame.view, View::Hour { .. }));

        app.activate_cell(app.frame.cursor);
        assert!(matches!(app.frame.view, View::Minute { .. }));
        assert_eq!(app.depth(), 4);

        // Minute view is the bottom; Enter is a no-op there.
        let frame = app.frame;
        app.activate_cell(app.frame.cursor);
        assert_eq!(app.frame, frame);
    }

    #[test]
    fn drilling_into_current_week_preselects_today() {
        let now = dt(2023, 8, 16, 10, 0, 0);
        let mut app = test_app(now);
        let week = app.current_week_index().unwrap() as usize;
        app.activate_cell(week);

        let View::Week { start } = app.frame.view else {
            panic!("expected week view");
        };
        let expected_day = (now - start).num_days() as usize;
        assert_eq!(app.frame.cursor, expected_day);
    }

    #[test]
    fn back_navigation_restores_exact_parent_state() {
        let mut app = test_app(dt(2023, 8, 15, 12, 0, 0));
        app.frame.cursor = 500;
        let parent = app.frame;

        app.activate_cell(500);
        app.frame.cursor = 3;
        app.pop_view();

        assert_eq!(app.frame, parent);
        assert_eq!(app.depth(), 0);

        // Popping at the root does nothing.
        app.pop_view();
        assert_eq!(app.frame, parent);
    }

    #[test]
    fn week_cells_map_to_consecutive_days() {
        let mut app = test_app(dt(2023, 8, 15, 12, 0, 0));
        app.activate_cell(0);
        let View::Week { start } = app.frame.view else {
            panic!("expected week view");
        };

        let day0 = app.cell_start(&app.frame.view, 0).unwrap();
        let day6 = app.cell_start(&app.frame.view, 6).unwrap();
        assert_eq!(day0, start);
        assert_eq!(day6 - day0, Duration::days(6));
    }

    #[test]
    fn classify_cell_matches_scenario() {
        // Hour bucket [14:00, 15:00) at 14:30 -> Current, 0.5.
        let now = dt(2023, 8, 16, 14, 30, 0);
        let app = test_app(now);
        let day = View::Day {
            start: dt(2023, 8, 16, 0, 0, 0),
        };
        let (class, progress) = app.classify_cell(&day, 14);
        assert_eq!(class, BucketClass::Current);
        assert_eq!(progress, Some(0.5));
        assert_eq!(app.classify_cell(&day, 13).0, BucketClass::Past);
        assert_eq!(app.classify_cell(&day, 15).0, BucketClass::Future);
    }

    #[test]
    fn expectancy_edit_rejects_out_of_range_input() {
        let mut app = test_app(dt(2023, 8, 15, 0, 0, 0));

        app.handle_key(key(KeyCode::Char('e')));
        assert_eq!(app.input_mode, InputMode::EditingExpectancy);
        app.edit_buffer.clear();
        type_text(&mut app, "200");
        app.handle_key(key(KeyCode::Enter));

        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.life_expectancy(), 100);
        assert_eq!(app.logs.last().unwrap().level, LogLevel::Warning);
    }

    #[test]
    fn expectancy_edit_accepts_boundary_value() {
        let mut app = test_app(dt(2023, 8, 15, 0, 0, 0));
        app.handle_key(key(KeyCode::Char('e')));
        app.edit_buffer.clear();
        type_text(&mut app, "120");
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.life_expectancy(), 120);
    }

    #[test]
    fn shrinking_expectancy_clamps_the_cursor() {
        let mut app = test_app(dt(2023, 8, 15, 0, 0, 0));
        app.frame.cursor = calendar::total_weeks(100) as usize - 1;

        app.handle_key(key(KeyCode::Char('e')));
        app.edit_buffer.clear();
        type_text(&mut app, "10");
        app.handle_key(key(KeyCode::Enter));

        assert_eq!(app.frame.cursor as i64, calendar::total_weeks(10) - 1);
    }

    #[test]
    fn invalid_birth_date_blocks_drill_down() {
        let mut app = test_app(dt(2023, 8, 15, 0, 0, 0));
        app.handle_key(key(KeyCode::Char('b')));
        app.edit_buffer.clear();
        type_text(&mut app, "2023-02-30");
        app.handle_key(key(KeyCode::Enter));

        assert!(app.birth_date.is_none());
        // The raw string stays, distinct from unset.
        assert_eq!(app.prefs.birth_date, "2023-02-30");
        assert!(app.current_week_index().is_none());

        app.activate_cell(0);
        assert_eq!(app.frame.view, View::Year);
        assert_eq!(app.depth(), 0);
    }

    #[test]
    fn editing_birth_date_resets_stale_drill_down() {
        let mut app = test_app(dt(2023, 8, 15, 0, 0, 0));
        app.activate_cell(0);
        assert_eq!(app.depth(), 1);

        app.handle_key(key(KeyCode::Char('b')));
        app.edit_buffer.clear();
        type_text(&mut app, "1990-01-01");
        app.handle_key(key(KeyCode::Enter));

        assert_eq!(app.frame.view, View::Year);
        assert_eq!(app.depth(), 0);
        assert_eq!(app.prefs.birth_date, "1990-01-01");
    }

    #[test]
    fn cursor_movement_is_clamped_to_the_grid() {
        let mut app = test_app(dt(2023, 8, 15, 0, 0, 0));
        app.frame.cursor = 0;
        app.handle_key(key(KeyCode::Left));
        assert_eq!(app.frame.cursor, 0);
        app.handle_key(key(KeyCode::Up));
        assert_eq!(app.frame.cursor, 0);

        app.handle_key(key(KeyCode::Right));
        assert_eq!(app.frame.cursor, 1);
        app.handle_key(key(KeyCode::Down));
        assert_eq!(app.frame.cursor, 1 + calendar::WEEKS_PER_YEAR as usize);
    }

    #[test]
    fn quit_keys_set_the_flag() {
        let mut app = test_app(dt(2023, 8, 15, 0, 0, 0));
        app.handle_key(key(KeyCode::Char('q')));
        assert!(app.should_quit);

        let mut app = test_app(dt(2023, 8, 15, 0, 0, 0));
        app.handle_key(KeyEvent {
            code: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
            kind: crossterm::event::KeyEventKind::Press,
            state: KeyEventState::NONE,
        });
        assert!(app.should_quit);
    }

    #[test]
    fn tick_refresh_is_idempotent_for_classification() {
        let mut app = test_app(dt(2023, 8, 15, 12, 0, 0));
        let week = View::Year;
        let before = app.classify_cell(&week, 100);
        app.set_now(dt(2023, 8, 15, 12, 0, 0));
        assert_eq!(before, app.classify_cell(&week, 100));
    }
}
