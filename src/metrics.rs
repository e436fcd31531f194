//! Live and final typing metrics. All functions are pure.

use crate::passage::Passage;
use std::time::Duration;

/// Number of whitespace-separated words in `typed`.
///
/// Blank input still counts as one (empty) word.
pub fn words_typed(typed: &str) -> usize {
    typed.split_whitespace().count().max(1)
}

/// Words per minute over `elapsed`, rounded. Zero when no time has elapsed.
pub fn words_per_minute(words: usize, elapsed: Option<Duration>) -> u32 {
    let minutes = elapsed.map_or(0.0, |e| e.as_secs_f64() / 60.0);
    if minutes <= 0.0 {
        return 0;
    }
    (words as f64 / minutes).round() as u32
}

/// Percentage of typed characters matching the passage at the same position.
///
/// Only the overlap with the passage is scored; characters typed past its
/// end are ignored. Empty input is 100% accurate.
pub fn accuracy(typed: &str, passage: &Passage) -> u32 {
    let (scored, matches) = typed
        .chars()
        .zip(passage.chars())
        .fold((0usize, 0usize), |(scored, matches), (actual, expected)| {
            (scored + 1, matches + usize::from(actual == *expected))
        });

    if scored == 0 {
        return 100;
    }
    (100.0 * matches as f64 / scored as f64).round() as u32
}

/// Share of the passage covered by `typed_len` characters, clamped to [0, 100].
pub fn completion_percent(typed_len: usize, passage_len: usize) -> f64 {
    if passage_len == 0 {
        return 100.0;
    }
    (100.0 * typed_len as f64 / passage_len as f64).min(100.0)
}

/// The user wins only by being strictly ahead; a tie goes to the opponent.
pub fn user_won(user_progress: f64, opponent_progress: f64) -> bool {
    user_progress > opponent_progress
}
