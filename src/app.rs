use chrono::{DateTime, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use keyrace::{
    config::Config,
    history::HistoryLog,
    leaderboard::Leaderboard,
    runtime::{Clock, SystemClock},
    session::{Phase, ResultRecord, Session, SessionConfig},
    store::{KeyValueStore, ProgressStore, SqliteStore},
    Difficulty, WordDifficulty,
};
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Menu,
    Race,
    Results,
    Leaderboard,
}

/// Front-end state machine wrapped around one `Session`.
///
/// The text field lives here: every edit is forwarded to the session as the
/// full current contents.
pub struct App<S: KeyValueStore = SqliteStore, C: Clock = SystemClock> {
    pub state: AppState,
    pub session: Session<C>,
    pub input: String,
    pub config: Config,
    pub custom_text: Option<String>,
    pub sound_enabled: bool,
    pub last_result: Option<ResultRecord>,
    pub last_rank: Option<usize>,
    pub should_quit: bool,
    bell_pending: bool,
    leaderboard_back: AppState,
    store: ProgressStore<S>,
    history: Option<HistoryLog>,
}

impl<S: KeyValueStore, C: Clock> App<S, C> {
    pub fn new(
        config: Config,
        custom_text: Option<String>,
        store: ProgressStore<S>,
        history: Option<HistoryLog>,
        clock: C,
    ) -> Self {
        let session_config = SessionConfig {
            difficulty: config.difficulty,
            word_difficulty: config.word_difficulty,
            custom_text: custom_text.clone(),
        };
        let session = Session::with_clock(session_config, config.session_settings(), clock);
        let sound_enabled = store.read_sound_preference();

        Self {
            state: AppState::Menu,
            session,
            input: String::new(),
            config,
            custom_text,
            sound_enabled,
            last_result: None,
            last_rank: None,
            should_quit: false,
            bell_pending: false,
            leaderboard_back: AppState::Menu,
            store,
            history,
        }
    }

    pub fn leaderboard(&self) -> Leaderboard<'_, S> {
        Leaderboard::new(&self.store)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.session.next_deadline()
    }

    /// Whether a finished session is waiting for the terminal bell.
    pub fn take_bell(&mut self) -> bool {
        std::mem::take(&mut self.bell_pending)
    }

    fn session_config(&self) -> SessionConfig {
        SessionConfig {
            difficulty: self.config.difficulty,
            word_difficulty: self.config.word_difficulty,
            custom_text: self.custom_text.clone(),
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.quit();
            return;
        }

        match self.state {
            AppState::Menu => self.on_menu_key(key.code),
            AppState::Race => self.on_race_key(key.code),
            AppState::Results => match key.code {
                KeyCode::Char('r') | KeyCode::Enter => self.state = AppState::Menu,
                KeyCode::Char('l') => self.open_leaderboard(),
                KeyCode::Char('q') | KeyCode::Esc => self.quit(),
                _ => {}
            },
            AppState::Leaderboard => match key.code {
                KeyCode::Char('c') => {
                    if let Err(e) = self.leaderboard().clear() {
                        log::error!("failed to clear leaderboard: {e}");
                    }
                }
                KeyCode::Char('b') | KeyCode::Backspace | KeyCode::Esc => {
                    self.state = self.leaderboard_back;
                }
                _ => {}
            },
        }
    }

    fn on_menu_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char(c @ '1'..='4') => {
                let idx = c as usize - '1' as usize;
                self.config.difficulty = Difficulty::ALL[idx];
            }
            KeyCode::Char('e') => self.config.word_difficulty = WordDifficulty::Easy,
            KeyCode::Char('m') => self.config.word_difficulty = WordDifficulty::Medium,
            KeyCode::Char('h') => self.config.word_difficulty = WordDifficulty::Hard,
            KeyCode::Char('s') => self.toggle_sound(),
            KeyCode::Char('l') => self.open_leaderboard(),
            KeyCode::Enter => self.enter_race(),
            KeyCode::Char('q') | KeyCode::Esc => self.quit(),
            _ => {}
        }
    }

    fn on_race_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Enter => self.session.start(),
            KeyCode::Esc => {
                // the result is on its way once the session has finished
                if self.session.phase() != Phase::Finished {
                    self.session.abandon();
                    self.input.clear();
                    self.state = AppState::Menu;
                }
            }
            KeyCode::Backspace => {
                if self.session.phase() == Phase::Running && self.input.pop().is_some() {
                    self.session.submit_input(&self.input);
                }
            }
            KeyCode::Char(c) => {
                if self.session.phase() == Phase::Running {
                    self.input.push(c);
                    self.session.submit_input(&self.input);
                }
            }
            _ => {}
        }
    }

    fn enter_race(&mut self) {
        self.session.configure(self.session_config());
        self.input.clear();
        self.state = AppState::Race;
    }

    fn open_leaderboard(&mut self) {
        self.leaderboard_back = self.state;
        self.state = AppState::Leaderboard;
    }

    fn toggle_sound(&mut self) {
        self.sound_enabled = !self.sound_enabled;
        if let Err(e) = self.store.write_sound_preference(self.sound_enabled) {
            log::error!("failed to save sound preference: {e}");
        }
    }

    fn quit(&mut self) {
        self.session.abandon();
        self.should_quit = true;
    }

    /// Fire due session timers and collect a settled result, recording it
    /// and switching to the results screen.
    pub fn on_tick(&mut self, now: DateTime<Utc>) -> Option<ResultRecord> {
        self.session.advance();
        let result = self.session.poll_finished()?;

        let recorded = self.leaderboard().record(result.clone(), now);
        self.last_rank = match recorded {
            Ok(rank) => rank,
            Err(e) => {
                log::error!("failed to record leaderboard entry: {e}");
                None
            }
        };
        if let Some(history) = &self.history {
            if let Err(e) = history.append(&result, now) {
                log::error!("failed to append to {}: {e}", history.path().display());
            }
        }

        self.bell_pending = self.sound_enabled;
        self.last_result = Some(result.clone());
        self.input.clear();
        self.state = AppState::Results;
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyrace::{runtime::ManualClock, store::MemoryStore};
    use std::time::Duration;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(app: &mut App<MemoryStore, ManualClock>, s: &str) {
        for c in s.chars() {
            app.on_key(key(KeyCode::Char(c)));
        }
    }

    fn app_with(text: Option<&str>) -> (App<MemoryStore, ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        let app = App::new(
            Config::default(),
            text.map(str::to_string),
            ProgressStore::in_memory(),
            None,
            clock.clone(),
        );
        (app, clock)
    }

    #[test]
    fn test_starts_on_menu_with_config_tiers() {
        let (app, _) = app_with(None);
        assert_eq!(app.state, AppState::Menu);
        assert_eq!(app.session.config().difficulty, Difficulty::Normal);
        assert!(app.sound_enabled);
    }

    #[test]
    fn test_menu_selects_tiers() {
        let (mut app, _) = app_with(None);
        app.on_key(key(KeyCode::Char('4')));
        app.on_key(key(KeyCode::Char('h')));
        assert_eq!(app.config.difficulty, Difficulty::Flash);
        assert_eq!(app.config.word_difficulty, WordDifficulty::Hard);

        app.on_key(key(KeyCode::Char('1')));
        app.on_key(key(KeyCode::Char('e')));
        assert_eq!(app.config.difficulty, Difficulty::Slow);
        assert_eq!(app.config.word_difficulty, WordDifficulty::Easy);

        app.on_key(key(KeyCode::Enter));
        assert_eq!(app.state, AppState::Race);
        assert_eq!(app.session.config().difficulty, Difficulty::Slow);
        assert_eq!(app.session.phase(), Phase::NotStarted);
    }

    #[test]
    fn test_sound_toggle_is_persisted() {
        let (mut app, _) = app_with(None);
        app.on_key(key(KeyCode::Char('s')));
        assert!(!app.sound_enabled);
        assert!(!app.store.read_sound_preference());
    }

    #[test]
    fn test_typing_before_enter_is_ignored() {
        let (mut app, _) = app_with(Some("hi"));
        app.on_key(key(KeyCode::Enter));
        type_str(&mut app, "h");
        assert_eq!(app.input, "");
        assert_eq!(app.session.typed(), "");
    }

    #[test]
    fn test_backspace_submits_shorter_prefix() {
        let (mut app, _) = app_with(Some("hello"));
        app.on_key(key(KeyCode::Enter));
        app.on_key(key(KeyCode::Enter));
        type_str(&mut app, "hex");
        app.on_key(key(KeyCode::Backspace));
        assert_eq!(app.input, "he");
        assert_eq!(app.session.typed(), "he");
    }

    #[test]
    fn test_full_race_records_result_after_settle_delay() {
        let (mut app, clock) = app_with(Some("hi"));
        app.on_key(key(KeyCode::Enter));
        app.on_key(key(KeyCode::Enter));
        clock.advance(Duration::from_millis(100));
        type_str(&mut app, "hi");
        assert_eq!(app.session.phase(), Phase::Finished);

        let now = Utc::now();
        assert!(app.on_tick(now).is_none());
        assert_eq!(app.state, AppState::Race);

        clock.advance(Duration::from_secs(1));
        let result = app.on_tick(now).unwrap();
        assert!(result.user_won);
        assert_eq!(app.state, AppState::Results);
        assert_eq!(app.last_rank, Some(1));
        assert!(app.take_bell());
        assert!(!app.take_bell());
        assert_eq!(app.leaderboard().entries().len(), 1);
    }

    #[test]
    fn test_keys_handled_after_opponent_deadline_lose() {
        let (mut app, clock) = app_with(Some("hi"));
        app.on_key(key(KeyCode::Enter));
        app.on_key(key(KeyCode::Enter));
        // normal pace finishes "hi" at 342ms, before these keys are handled
        clock.advance(Duration::from_secs(1));
        type_str(&mut app, "hi");
        assert_eq!(app.session.phase(), Phase::Finished);
        assert_eq!(app.session.typed(), "");

        clock.advance(Duration::from_secs(1));
        let result = app.on_tick(Utc::now()).unwrap();
        assert!(!result.user_won);
        assert_eq!(app.state, AppState::Results);
    }

    #[test]
    fn test_escape_mid_race_abandons_without_result() {
        let (mut app, clock) = app_with(Some("hello"));
        app.on_key(key(KeyCode::Enter));
        app.on_key(key(KeyCode::Enter));
        type_str(&mut app, "he");
        app.on_key(key(KeyCode::Esc));

        assert_eq!(app.state, AppState::Menu);
        assert_eq!(app.session.phase(), Phase::Abandoned);
        clock.advance(Duration::from_secs(120));
        assert!(app.on_tick(Utc::now()).is_none());
        assert!(app.leaderboard().entries().is_empty());
    }

    #[test]
    fn test_leaderboard_navigation_and_clear() {
        let (mut app, _) = app_with(Some("a"));
        app.leaderboard()
            .record(
                ResultRecord {
                    wpm: 10,
                    accuracy: 100,
                    time_spent_secs: 5,
                    user_won: true,
                    difficulty: Difficulty::Normal,
                    word_difficulty: WordDifficulty::Medium,
                },
                Utc::now(),
            )
            .unwrap();

        app.on_key(key(KeyCode::Char('l')));
        assert_eq!(app.state, AppState::Leaderboard);
        app.on_key(key(KeyCode::Char('c')));
        assert!(app.leaderboard().entries().is_empty());
        app.on_key(key(KeyCode::Char('b')));
        assert_eq!(app.state, AppState::Menu);
    }

    #[test]
    fn test_results_keys() {
        let (mut app, _) = app_with(Some("a"));
        app.state = AppState::Results;
        app.on_key(key(KeyCode::Char('l')));
        app.on_key(key(KeyCode::Esc));
        assert_eq!(app.state, AppState::Results);
        app.on_key(key(KeyCode::Char('r')));
        assert_eq!(app.state, AppState::Menu);
    }

    #[test]
    fn test_ctrl_c_quits_from_anywhere() {
        let (mut app, _) = app_with(Some("hello"));
        app.on_key(key(KeyCode::Enter));
        app.on_key(key(KeyCode::Enter));
        app.on_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
        assert!(!app.session.has_active_timers());
    }
}
