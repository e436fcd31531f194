use crate::metrics;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Characters per word assumed when converting a WPM target into a typing rate.
pub const AVERAGE_WORD_LENGTH: f64 = 5.0;

/// How fast the simulated opponent types.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Difficulty {
    Slow,
    #[default]
    Normal,
    Fast,
    Flash,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [Self::Slow, Self::Normal, Self::Fast, Self::Flash];

    pub fn target_wpm(self) -> u32 {
        match self {
            Self::Slow => 40,
            Self::Normal => 70,
            Self::Fast => 100,
            Self::Flash => 150,
        }
    }

    pub fn chars_per_second(self) -> f64 {
        self.target_wpm() as f64 / 60.0 * AVERAGE_WORD_LENGTH
    }

    /// Time between two simulated keystrokes.
    pub fn tick_interval(self) -> Duration {
        Duration::from_secs_f64(1.0 / self.chars_per_second())
    }
}

/// Progress of the simulated typist through a passage, in percent.
///
/// Each keystroke is worth `100 / passage_len` points. Progress is derived
/// from the keystroke count so it lands on exactly 100.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opponent {
    typed: usize,
    passage_len: usize,
}

impl Opponent {
    pub fn new(passage_len: usize) -> Self {
        Self {
            typed: 0,
            passage_len,
        }
    }

    pub fn progress(&self) -> f64 {
        metrics::completion_percent(self.typed, self.passage_len)
    }

    /// Type one more character. Returns true once the passage is complete.
    pub fn advance(&mut self) -> bool {
        if !self.is_done() {
            self.typed += 1;
        }
        self.is_done()
    }

    pub fn is_done(&self) -> bool {
        self.typed >= self.passage_len
    }
}
