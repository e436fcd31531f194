use crate::{
    language::WordDifficulty,
    metrics,
    opponent::{Difficulty, Opponent},
    passage::Passage,
    runtime::{Clock, IntervalTimer, SystemClock},
    word_generator,
};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

pub const DEFAULT_SESSION_SECS: u32 = 60;
/// Pause between reaching the finish condition and handing out the result.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(1);

const COUNTDOWN_PERIOD: Duration = Duration::from_secs(1);

/// What to race on. Applied by `Session::configure`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionConfig {
    pub difficulty: Difficulty,
    pub word_difficulty: WordDifficulty,
    pub custom_text: Option<String>,
}

/// Timing constants shared by every session of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    pub duration_secs: u32,
    pub settle_delay: Duration,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            duration_secs: DEFAULT_SESSION_SECS,
            settle_delay: DEFAULT_SETTLE_DELAY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    Running,
    Finished,
    /// Left before finishing. Terminal, and produces no result.
    Abandoned,
}

/// Final outcome of one session, frozen at finish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub wpm: u32,
    pub accuracy: u32,
    pub time_spent_secs: u32,
    pub user_won: bool,
    pub difficulty: Difficulty,
    pub word_difficulty: WordDifficulty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharState {
    Correct,
    Incorrect,
    Cursor,
    Pending,
}

/// Everything a front-end needs to draw the live race.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot {
    pub phase: Phase,
    pub seconds_remaining: u32,
    pub wpm: u32,
    pub accuracy: u32,
    pub user_progress: f64,
    pub opponent_progress: f64,
}

#[derive(Debug, Clone)]
pub struct SessionState {
    pub passage: Passage,
    pub typed: String,
    pub typed_len: usize,
    pub seconds_remaining: u32,
    pub opponent: Opponent,
    pub phase: Phase,
    pub started_at: Option<Instant>,
    pub wpm: u32,
    pub accuracy: u32,
}

impl SessionState {
    fn new(passage: Passage, duration_secs: u32) -> Self {
        let opponent = Opponent::new(passage.len());
        Self {
            passage,
            typed: String::new(),
            typed_len: 0,
            seconds_remaining: duration_secs,
            opponent,
            phase: Phase::NotStarted,
            started_at: None,
            wpm: 0,
            accuracy: 100,
        }
    }

    pub fn user_progress(&self) -> f64 {
        metrics::completion_percent(self.typed_len, self.passage.len())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerKind {
    Countdown,
    Opponent,
}

/// One typing race against the simulated opponent.
///
/// The session owns its two timers (a one-second countdown and the
/// opponent's keystroke pacing) as plain deadlines. Whoever drives the
/// session calls `advance` to fire the ones that are due, and `submit_input`
/// whenever the text field changes. Every lifecycle call made in the wrong
/// phase is ignored.
#[derive(Debug)]
pub struct Session<C: Clock = SystemClock> {
    config: SessionConfig,
    settings: SessionSettings,
    clock: C,
    state: SessionState,
    countdown: Option<IntervalTimer>,
    opponent_timer: Option<IntervalTimer>,
    finished_at: Option<Instant>,
    result: Option<ResultRecord>,
    notified: bool,
}

impl Session<SystemClock> {
    pub fn new(config: SessionConfig, settings: SessionSettings) -> Self {
        Self::with_clock(config, settings, SystemClock)
    }
}

impl<C: Clock> Session<C> {
    pub fn with_clock(config: SessionConfig, settings: SessionSettings, clock: C) -> Self {
        let state = Self::fresh_state(&config, &settings);
        Self {
            config,
            settings,
            clock,
            state,
            countdown: None,
            opponent_timer: None,
            finished_at: None,
            result: None,
            notified: false,
        }
    }

    fn fresh_state(config: &SessionConfig, settings: &SessionSettings) -> SessionState {
        let passage = config
            .custom_text
            .as_deref()
            .and_then(Passage::custom)
            .unwrap_or_else(|| word_generator::generate(config.word_difficulty));
        SessionState::new(passage, settings.duration_secs)
    }

    /// Reset to a not-started session with new text. Ignored while running.
    pub fn configure(&mut self, config: SessionConfig) {
        if self.state.phase == Phase::Running {
            log::debug!("configure ignored: session is running");
            return;
        }
        self.state = Self::fresh_state(&config, &self.settings);
        self.config = config;
        self.countdown = None;
        self.opponent_timer = None;
        self.finished_at = None;
        self.result = None;
        self.notified = false;
        log::debug!(
            "session configured: {} / {}, {} chars",
            self.config.difficulty,
            self.config.word_difficulty,
            self.state.passage.len()
        );
    }

    pub fn start(&mut self) {
        if self.state.phase != Phase::NotStarted {
            log::debug!("start ignored in phase {:?}", self.state.phase);
            return;
        }
        let now = self.clock.now();
        self.state.phase = Phase::Running;
        self.state.started_at = Some(now);
        self.countdown = Some(IntervalTimer::starting_at(now, COUNTDOWN_PERIOD));
        self.opponent_timer = Some(IntervalTimer::starting_at(
            now,
            self.config.difficulty.tick_interval(),
        ));
        log::debug!("session started");
    }

    /// Replace the typed text with the full current contents of the input.
    ///
    /// Timers that came due before this call fire first.
    pub fn submit_input(&mut self, prefix: &str) {
        self.advance();
        if self.state.phase != Phase::Running {
            return;
        }
        let now = self.clock.now();
        self.state.typed = prefix.to_string();
        self.state.typed_len = prefix.chars().count();
        self.recompute_metrics(now);

        if self.state.typed_len >= self.state.passage.len() {
            self.finish_at(now);
        }
    }

    /// Fire every timer that is due, oldest first, until none is left or the
    /// session finishes.
    pub fn advance(&mut self) {
        let now = self.clock.now();
        while self.state.phase == Phase::Running {
            let Some((kind, due)) = self.next_due_timer().filter(|(_, due)| *due <= now) else {
                break;
            };

            match kind {
                TimerKind::Countdown => {
                    if let Some(timer) = self.countdown.as_mut() {
                        timer.fire();
                    }
                    self.state.seconds_remaining = self.state.seconds_remaining.saturating_sub(1);
                    if self.state.seconds_remaining == 0 {
                        self.finish_at(due);
                    }
                }
                TimerKind::Opponent => {
                    if let Some(timer) = self.opponent_timer.as_mut() {
                        timer.fire();
                    }
                    if self.state.opponent.advance() {
                        self.finish_at(due);
                    }
                }
            }
        }
    }

    // Ties go to the countdown.
    fn next_due_timer(&self) -> Option<(TimerKind, Instant)> {
        let countdown = self.countdown.map(|t| (TimerKind::Countdown, t.next_due()));
        let opponent = self.opponent_timer.map(|t| (TimerKind::Opponent, t.next_due()));
        match (countdown, opponent) {
            (Some(c), Some(o)) => Some(if o.1 < c.1 { o } else { c }),
            (c, o) => c.or(o),
        }
    }

    /// End the session now. Returns the result only on the call that
    /// actually finished it; a timer that was already due may beat it.
    pub fn finish(&mut self) -> Option<ResultRecord> {
        self.advance();
        let now = self.clock.now();
        self.finish_at(now)
    }

    fn finish_at(&mut self, at: Instant) -> Option<ResultRecord> {
        if self.state.phase != Phase::Running {
            return None;
        }
        self.cancel_timers();
        self.recompute_metrics(at);

        let user_progress = self.state.user_progress();
        let opponent_progress = self.state.opponent.progress();
        let record = ResultRecord {
            wpm: self.state.wpm,
            accuracy: self.state.accuracy,
            time_spent_secs: self
                .settings
                .duration_secs
                .saturating_sub(self.state.seconds_remaining),
            user_won: metrics::user_won(user_progress, opponent_progress),
            difficulty: self.config.difficulty,
            word_difficulty: self.config.word_difficulty,
        };

        self.state.phase = Phase::Finished;
        self.finished_at = Some(at);
        self.result = Some(record.clone());
        log::info!(
            "session finished: {} wpm, {}% acc, {}s, user {:.1}% vs opponent {:.1}%",
            record.wpm,
            record.accuracy,
            record.time_spent_secs,
            user_progress,
            opponent_progress
        );
        Some(record)
    }

    /// Leave the session without a result, cancelling both timers.
    pub fn abandon(&mut self) {
        if matches!(self.state.phase, Phase::NotStarted | Phase::Running) {
            self.cancel_timers();
            self.state.phase = Phase::Abandoned;
            log::debug!("session abandoned");
        }
    }

    fn cancel_timers(&mut self) {
        let countdown = self.countdown.take();
        let opponent = self.opponent_timer.take();
        if countdown.is_some() || opponent.is_some() {
            log::debug!("session timers cancelled");
        }
    }

    fn recompute_metrics(&mut self, at: Instant) {
        let elapsed = self
            .state
            .started_at
            .map(|started| at.saturating_duration_since(started));
        let words = metrics::words_typed(&self.state.typed);
        self.state.wpm = metrics::words_per_minute(words, elapsed);
        self.state.accuracy = metrics::accuracy(&self.state.typed, &self.state.passage);
    }

    /// Hands out the result once, on the first call made at least one
    /// settle delay after the session finished.
    pub fn poll_finished(&mut self) -> Option<ResultRecord> {
        if self.notified {
            return None;
        }
        let finished_at = self.finished_at?;
        if self.clock.now() < finished_at + self.settings.settle_delay {
            return None;
        }
        self.notified = true;
        self.result.clone()
    }

    /// Earliest instant at which `advance` or `poll_finished` has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        let notify = self
            .finished_at
            .filter(|_| !self.notified)
            .map(|at| at + self.settings.settle_delay);
        [
            self.countdown.map(|t| t.next_due()),
            self.opponent_timer.map(|t| t.next_due()),
            notify,
        ]
        .into_iter()
        .flatten()
        .min()
    }

    pub fn has_active_timers(&self) -> bool {
        self.countdown.is_some() || self.opponent_timer.is_some()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.state.phase,
            seconds_remaining: self.state.seconds_remaining,
            wpm: self.state.wpm,
            accuracy: self.state.accuracy,
            user_progress: self.state.user_progress(),
            opponent_progress: self.state.opponent.progress(),
        }
    }

    /// Per-character highlighting of the passage against the typed text.
    pub fn char_states(&self) -> Vec<CharState> {
        let typed: Vec<char> = self.state.typed.chars().collect();
        self.state
            .passage
            .chars()
            .iter()
            .enumerate()
            .map(|(idx, expected)| match typed.get(idx) {
                Some(actual) if actual == expected => CharState::Correct,
                Some(_) => CharState::Incorrect,
                None if idx == typed.len() => CharState::Cursor,
                None => CharState::Pending,
            })
            .collect()
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn passage(&self) -> &Passage {
        &self.state.passage
    }

    pub fn typed(&self) -> &str {
        &self.state.typed
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn result(&self) -> Option<&ResultRecord> {
        self.result.as_ref()
    }
}
