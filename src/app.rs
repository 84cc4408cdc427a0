use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::{debug, error, info, warn};

use crate::api::mock::MockProvider;
use crate::api::provider::{DataProvider, DataSource};
use crate::api::spreadsheet::SpreadsheetProvider;
use crate::config::{self, Config};
use crate::error::{ExportError, MetricsError};
use crate::export;
use crate::metrics;
use crate::model::*;
use crate::notes::NoteBook;
use crate::ui::{InputMode, Tab, UIState, View};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    Quit,
}

/// Session state of the dashboard: the loaded book plus everything the
/// user has toggled. Rebuilt into a snapshot on every render.
pub struct App {
    pub config: Config,
    pub config_path: String,
    pub book: PortfolioBook,
    pub source: DataSource,
    pub import_path: Option<String>,
    pub seed: u64,
    pub notes: NoteBook,
    pub ui: UIState,
    pub log_to_tui: bool,
}

impl App {
    pub fn new(config: Config, config_path: String, import_path: Option<String>, seed: u64) -> Self {
        let months = config.performance.default_months;
        let import_path = import_path.or_else(|| config.data_file.clone());

        let mut app = Self {
            config,
            config_path,
            book: MockProvider::book(),
            source: DataSource::Static,
            import_path,
            seed,
            notes: NoteBook::new(),
            ui: UIState::new(months),
            log_to_tui: false,
        };

        if app.import_path.is_some() {
            app.import();
        }
        app.select_default_client();
        app
    }

    fn select_default_client(&mut self) {
        if let Some(name) = self.config.default_client.as_deref() {
            match self.book.position(name) {
                Some(idx) => self.ui.selected_client = idx,
                None => warn!("⚠️ Default client '{}' not found in {}", name, self.source),
            }
        }
    }

    pub fn selected_client(&self) -> Option<&str> {
        self.book
            .clients
            .get(self.ui.selected_client)
            .map(|c| c.name.as_str())
    }

    pub fn snapshot(&self, today: NaiveDate) -> Result<DashboardSnapshot, MetricsError> {
        let client = self
            .selected_client()
            .ok_or_else(|| MetricsError::UnknownClient(String::new()))?;
        metrics::build_snapshot(&self.book, client, self.ui.months, self.seed, today, &self.config)
    }

    /// Replaces the book with the configured spreadsheet. A failed import
    /// keeps the current book and surfaces the error.
    pub fn import(&mut self) {
        let Some(path) = self.import_path.clone() else {
            self.ui.set_error("No spreadsheet configured. Pass --import <file> or set data_file.");
            return;
        };

        let provider = SpreadsheetProvider::new(&path);
        match provider.load_book() {
            Ok(book) => {
                self.book = book;
                self.source = provider.source();
                self.ui.selected_client = 0;
                self.ui.set_status(format!("Imported {} client(s) from {}", self.book.len(), path));
            }
            Err(e) => {
                error!("❌ Import of {} failed: {}", path, e);
                self.ui.set_error(format!("Error reading file: {}", e));
            }
        }
    }

    pub fn export(&mut self, today: NaiveDate) {
        let result = self
            .snapshot(today)
            .map_err(ExportError::from)
            .and_then(|snapshot| {
                export::export_report(&self.config.export_dir, &snapshot, &self.config.currency_label)
            });

        match result {
            Ok(path) => self.ui.set_status(format!("Report saved to {}", path.display())),
            Err(e) => {
                error!("❌ Export failed: {}", e);
                self.ui.set_error(format!("Export failed: {}", e));
            }
        }
    }

    pub fn reseed(&mut self) {
        self.seed = rand::random();
        info!("🎲 New simulation seed {}", self.seed);
        self.ui.set_status(format!("Simulation reseeded ({})", self.seed));
    }

    pub fn adjust_months(&mut self, delta: isize) {
        let current = self.ui.months as isize;
        let next = (current + delta).max(0) as usize;
        self.ui.months = self.config.performance.clamp_months(next);
        debug!("📅 Performance window set to {} months", self.ui.months);
    }

    fn save_config(&mut self) {
        let mut config = self.config.clone();
        config.performance.default_months = self.ui.months;
        config.default_client = self.selected_client().map(str::to_string);
        config.seed = Some(self.seed);

        match config::save_config_to_file(&config, &self.config_path) {
            Ok(()) => {
                info!("✅ Configuration saved to {}", self.config_path);
                self.ui.set_status(format!("Configuration saved to {}", self.config_path));
            }
            Err(e) => {
                error!("❌ Failed to save configuration: {}", e);
                self.ui.set_error(format!("Failed to save configuration: {}", e));
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, today: NaiveDate) -> Action {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Action::Quit;
        }

        if self.ui.error.is_some() {
            self.ui.error = None;
            return Action::Continue;
        }

        if self.ui.show_help {
            self.ui.show_help = false;
            return Action::Continue;
        }

        if self.ui.input_mode == InputMode::EditingNote {
            self.handle_note_key(key.code);
            return Action::Continue;
        }

        match self.ui.view {
            View::Landing => match key.code {
                KeyCode::Enter => {
                    info!("📊 Opening dashboard");
                    self.ui.view = View::Dashboard;
                }
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Action::Quit,
                KeyCode::Char('h') | KeyCode::Char('H') => self.ui.show_help = true,
                _ => {}
            },
            View::Dashboard => return self.handle_dashboard_key(key.code, today),
        }

        Action::Continue
    }

    fn handle_dashboard_key(&mut self, code: KeyCode, today: NaiveDate) -> Action {
        let client_count = self.book.len();

        match code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                info!("👋 User requested quit");
                return Action::Quit;
            }
            KeyCode::Esc => self.ui.view = View::Landing,
            KeyCode::Tab => self.ui.next_tab(),
            KeyCode::BackTab => self.ui.previous_tab(),
            KeyCode::Char(c @ '1'..='5') => {
                let idx = c as usize - '1' as usize;
                if let Some(tab) = Tab::all().get(idx) {
                    self.ui.current_tab = *tab;
                    self.ui.scroll_offset = 0;
                }
            }
            KeyCode::Right => {
                self.ui.next_client(client_count);
                debug!("👤 Selected {:?}", self.selected_client());
            }
            KeyCode::Left => {
                self.ui.previous_client(client_count);
                debug!("👤 Selected {:?}", self.selected_client());
            }
            KeyCode::Char('+') | KeyCode::Char('=') => self.adjust_months(1),
            KeyCode::Char('-') | KeyCode::Char('_') => self.adjust_months(-1),
            KeyCode::Up => self.ui.scroll_up(),
            KeyCode::Down => self.ui.scroll_down(),
            KeyCode::Char('d') | KeyCode::Char('D') => {
                self.ui.show_download = !self.ui.show_download;
                let state = if self.ui.show_download { "enabled" } else { "disabled" };
                self.ui.set_status(format!("Report download {} (press w to write)", state));
            }
            KeyCode::Char('w') | KeyCode::Char('W') => {
                if self.ui.show_download {
                    self.export(today);
                } else {
                    self.ui.set_status("Enable report download with d first");
                }
            }
            KeyCode::Char('i') | KeyCode::Char('I') => self.import(),
            KeyCode::Char('n') | KeyCode::Char('N') => self.reseed(),
            KeyCode::Char('e') | KeyCode::Char('E') => {
                if self.selected_client().is_some() {
                    self.ui.current_tab = Tab::Notes;
                    self.ui.input_mode = InputMode::EditingNote;
                    self.ui.note_draft.clear();
                }
            }
            KeyCode::Char('s') | KeyCode::Char('S') => self.save_config(),
            KeyCode::Char('h') | KeyCode::Char('H') => self.ui.show_help = true,
            _ => {}
        }

        Action::Continue
    }

    fn handle_note_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Enter => {
                let draft = std::mem::take(&mut self.ui.note_draft);
                if let Some(client) = self.selected_client().map(str::to_string) {
                    if self.notes.add(&client, &draft).is_some() {
                        self.ui.set_status(format!("Note added for {}", client));
                    }
                }
                self.ui.input_mode = InputMode::Normal;
            }
            KeyCode::Esc => {
                self.ui.note_draft.clear();
                self.ui.input_mode = InputMode::Normal;
            }
            KeyCode::Backspace => {
                self.ui.note_draft.pop();
            }
            KeyCode::Char(c) => self.ui.note_draft.push(c),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Write;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app() -> App {
        App::new(Config::default(), "config.toml".to_string(), None, 11)
    }

    fn dashboard_app() -> App {
        let mut app = app();
        app.handle_key(key(KeyCode::Enter), today());
        app
    }

    #[test]
    fn starts_on_landing_with_static_data() {
        let app = app();
        assert_eq!(app.ui.view, View::Landing);
        assert_eq!(app.source, DataSource::Static);
        assert_eq!(app.selected_client(), Some("Client A"));
    }

    #[test]
    fn default_client_is_preselected() {
        let mut config = Config::default();
        config.default_client = Some("Client C".to_string());
        let app = App::new(config, "config.toml".to_string(), None, 1);
        assert_eq!(app.selected_client(), Some("Client C"));
    }

    #[test]
    fn enter_opens_dashboard_and_q_quits() {
        let mut app = dashboard_app();
        assert_eq!(app.ui.view, View::Dashboard);
        assert_eq!(app.handle_key(key(KeyCode::Char('q')), today()), Action::Quit);
    }

    #[test]
    fn arrows_cycle_clients_and_snapshot_follows() {
        let mut app = dashboard_app();
        app.handle_key(key(KeyCode::Right), today());
        assert_eq!(app.snapshot(today()).unwrap().client, "Client B");
        app.handle_key(key(KeyCode::Left), today());
        app.handle_key(key(KeyCode::Left), today());
        assert_eq!(app.selected_client(), Some("Client C"));
    }

    #[test]
    fn month_slider_is_clamped() {
        let mut app = dashboard_app();
        for _ in 0..40 {
            app.handle_key(key(KeyCode::Char('+')), today());
        }
        assert_eq!(app.ui.months, 36);
        for _ in 0..40 {
            app.handle_key(key(KeyCode::Char('-')), today());
        }
        assert_eq!(app.ui.months, 3);
    }

    #[test]
    fn rerender_without_interaction_is_stable() {
        let app = dashboard_app();
        assert_eq!(app.snapshot(today()).unwrap(), app.snapshot(today()).unwrap());
    }

    #[test]
    fn failed_import_keeps_prior_book() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"Client,Asset Class\nClient A,Equity\n").unwrap();

        let mut app = dashboard_app();
        let before = app.book.clone();
        app.import_path = Some(file.path().display().to_string());
        app.handle_key(key(KeyCode::Char('i')), today());

        assert_eq!(app.book, before);
        assert_eq!(app.source, DataSource::Static);
        let message = app.ui.error.clone().unwrap();
        assert!(message.contains("Value (INR Lakhs)"), "{}", message);

        // Any key dismisses the popup.
        app.handle_key(key(KeyCode::Char('x')), today());
        assert!(app.ui.error.is_none());
    }

    #[test]
    fn successful_import_replaces_book() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"Client,Asset Class,Value (INR Lakhs)\nClient Q,Equity,10\nClient Q,Gold,30\n")
            .unwrap();

        let app = App::new(
            Config::default(),
            "config.toml".to_string(),
            Some(file.path().display().to_string()),
            1,
        );
        assert_eq!(app.book.client_names(), vec!["Client Q"]);
        assert!(matches!(app.source, DataSource::Spreadsheet(_)));
        assert_eq!(app.book.aum(), dec!(40));

        let snapshot = app.snapshot(today()).unwrap();
        assert_eq!(snapshot.profile.risk_profile, RiskProfile::Unassigned);
    }

    #[test]
    fn import_without_path_reports_error() {
        let mut app = dashboard_app();
        app.handle_key(key(KeyCode::Char('i')), today());
        assert!(app.ui.error.is_some());
    }

    #[test]
    fn report_requires_download_toggle() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = dashboard_app();
        app.config.export_dir = dir.path().display().to_string();

        app.handle_key(key(KeyCode::Char('w')), today());
        assert!(!dir.path().join("Client A_portfolio_report.csv").exists());

        app.handle_key(key(KeyCode::Char('d')), today());
        app.handle_key(key(KeyCode::Char('w')), today());
        assert!(dir.path().join("Client A_portfolio_report.csv").exists());
        assert!(app.ui.error.is_none());
    }

    #[test]
    fn note_editing_flow() {
        let mut app = dashboard_app();
        app.handle_key(key(KeyCode::Char('e')), today());
        assert_eq!(app.ui.input_mode, InputMode::EditingNote);
        assert_eq!(app.ui.current_tab, Tab::Notes);

        for c in "Call rm".chars() {
            app.handle_key(key(KeyCode::Char(c)), today());
        }
        app.handle_key(key(KeyCode::Backspace), today());
        app.handle_key(key(KeyCode::Enter), today());

        let notes: Vec<&str> = app.notes.for_client("Client A").map(|n| n.text.as_str()).collect();
        assert_eq!(notes, vec!["Call r"]);
        assert_eq!(app.ui.input_mode, InputMode::Normal);

        // 'q' while typing is text, not quit.
        app.handle_key(key(KeyCode::Char('e')), today());
        assert_eq!(app.handle_key(key(KeyCode::Char('q')), today()), Action::Continue);
        app.handle_key(key(KeyCode::Esc), today());
        assert_eq!(app.notes.len(), 1);
    }

    #[test]
    fn reseed_key_changes_seed_and_numbers() {
        let mut app = dashboard_app();
        let before = app.snapshot(today()).unwrap();

        assert_eq!(app.handle_key(key(KeyCode::Char('n')), today()), Action::Continue);

        assert_ne!(app.seed, before.seed);
        assert!(app.ui.status.as_deref().unwrap_or_default().contains("reseeded"));
        assert_ne!(app.snapshot(today()).unwrap().performance, before.performance);
    }

    #[test]
    fn save_config_persists_session_choices() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml").display().to_string();
        let mut app = App::new(Config::default(), path.clone(), None, 77);
        app.handle_key(key(KeyCode::Enter), today());
        app.handle_key(key(KeyCode::Right), today());
        app.handle_key(key(KeyCode::Char('+')), today());
        app.handle_key(key(KeyCode::Char('s')), today());

        let saved = config::load_config(Some(path.as_str())).unwrap();
        assert_eq!(saved.default_client.as_deref(), Some("Client B"));
        assert_eq!(saved.performance.default_months, 13);
        assert_eq!(saved.seed, Some(77));
    }
}
