use crate::{
    error::Result,
    session::ResultRecord,
    store::{KeyValueStore, ProgressStore},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of results the leaderboard keeps.
pub const LEADERBOARD_CAPACITY: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    #[serde(flatten)]
    pub result: ResultRecord,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardSummary {
    pub best_wpm: u32,
    pub best_accuracy: u32,
    pub average_wpm: u32,
    pub victories: usize,
}

/// Top results by words per minute, persisted through a `ProgressStore`.
pub struct Leaderboard<'a, S: KeyValueStore> {
    store: &'a ProgressStore<S>,
}

impl<'a, S: KeyValueStore> Leaderboard<'a, S> {
    pub fn new(store: &'a ProgressStore<S>) -> Self {
        Self { store }
    }

    /// Entries, fastest first.
    pub fn entries(&self) -> Vec<LeaderboardEntry> {
        self.store.read_leaderboard()
    }

    /// Add a finished session and keep only the fastest results.
    ///
    /// Returns the 1-based rank of the new entry, or `None` if it did not
    /// make the cut. Among equal speeds, older entries rank first.
    pub fn record(&self, result: ResultRecord, date: DateTime<Utc>) -> Result<Option<usize>> {
        let mut entries = self.entries();
        let position = entries
            .iter()
            .filter(|e| e.result.wpm >= result.wpm)
            .count();

        entries.push(LeaderboardEntry { result, date });
        entries.sort_by(|a, b| b.result.wpm.cmp(&a.result.wpm));
        entries.truncate(LEADERBOARD_CAPACITY);
        self.store.write_leaderboard(&entries)?;

        let rank = (position < LEADERBOARD_CAPACITY).then_some(position + 1);
        log::info!("leaderboard updated, new entry rank {rank:?}");
        Ok(rank)
    }

    pub fn clear(&self) -> Result<()> {
        log::info!("leaderboard cleared");
        self.store.clear_leaderboard()
    }

    pub fn summary(&self) -> Option<LeaderboardSummary> {
        summarize(&self.entries())
    }
}

pub fn summarize(entries: &[LeaderboardEntry]) -> Option<LeaderboardSummary> {
    if entries.is_empty() {
        return None;
    }
    let total_wpm: u64 = entries.iter().map(|e| u64::from(e.result.wpm)).sum();
    let average = total_wpm as f64 / entries.len() as f64;

    Some(LeaderboardSummary {
        best_wpm: entries.iter().map(|e| e.result.wpm).max().unwrap_or(0),
        best_accuracy: entries.iter().map(|e| e.result.accuracy).max().unwrap_or(0),
        average_wpm: average.round() as u32,
        victories: entries.iter().filter(|e| e.result.user_won).count(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{language::WordDifficulty, opponent::Difficulty};
    use chrono::Duration;

    fn result(wpm: u32, accuracy: u32, user_won: bool) -> ResultRecord {
        ResultRecord {
            wpm,
            accuracy,
            time_spent_secs: 30,
            user_won,
            difficulty: Difficulty::Normal,
            word_difficulty: WordDifficulty::Medium,
        }
    }

    #[test]
    fn test_record_sorts_descending() {
        let store = ProgressStore::in_memory();
        let board = Leaderboard::new(&store);
        let now = Utc::now();

        board.record(result(40, 90, false), now).unwrap();
        board.record(result(80, 95, true), now).unwrap();
        board.record(result(60, 99, true), now).unwrap();

        let wpms: Vec<u32> = board.entries().iter().map(|e| e.result.wpm).collect();
        assert_eq!(wpms, vec![80, 60, 40]);
    }

    #[test]
    fn test_record_keeps_top_ten_of_eleven() {
        let store = ProgressStore::in_memory();
        let board = Leaderboard::new(&store);
        let now = Utc::now();
        let speeds = [55, 12, 90, 33, 71, 48, 101, 9, 66, 20, 84];

        for wpm in speeds {
            board.record(result(wpm, 100, true), now).unwrap();
        }

        let wpms: Vec<u32> = board.entries().iter().map(|e| e.result.wpm).collect();
        assert_eq!(wpms, vec![101, 90, 84, 71, 66, 55, 48, 33, 20, 12]);
    }

    #[test]
    fn test_record_reports_rank() {
        let store = ProgressStore::in_memory();
        let board = Leaderboard::new(&store);
        let now = Utc::now();

        assert_eq!(board.record(result(50, 100, true), now).unwrap(), Some(1));
        assert_eq!(board.record(result(70, 100, true), now).unwrap(), Some(1));
        assert_eq!(board.record(result(60, 100, true), now).unwrap(), Some(2));
        // equal speed ranks behind the existing entry
        assert_eq!(board.record(result(60, 90, false), now).unwrap(), Some(3));
    }

    #[test]
    fn test_record_reports_when_cut() {
        let store = ProgressStore::in_memory();
        let board = Leaderboard::new(&store);
        let now = Utc::now();
        for _ in 0..LEADERBOARD_CAPACITY {
            board.record(result(100, 100, true), now).unwrap();
        }

        assert_eq!(board.record(result(5, 100, true), now).unwrap(), None);
        assert_eq!(board.record(result(100, 100, true), now).unwrap(), None);
        assert_eq!(board.entries().len(), LEADERBOARD_CAPACITY);
    }

    #[test]
    fn test_record_keeps_creation_timestamp() {
        let store = ProgressStore::in_memory();
        let board = Leaderboard::new(&store);
        let date = Utc::now() - Duration::days(3);
        board.record(result(42, 100, true), date).unwrap();
        assert_eq!(board.entries()[0].date, date);
    }

    #[test]
    fn test_record_over_malformed_data_starts_fresh() {
        let store = ProgressStore::in_memory();
        store
            .backend()
            .set(crate::store::LEADERBOARD_KEY, "garbage")
            .unwrap();
        let board = Leaderboard::new(&store);
        assert_eq!(board.record(result(30, 100, true), Utc::now()).unwrap(), Some(1));
        assert_eq!(board.entries().len(), 1);
    }

    #[test]
    fn test_entry_serializes_flat_with_iso_date() {
        let entry = LeaderboardEntry {
            result: result(61, 98, true),
            date: "2024-03-05T10:20:30Z".parse().unwrap(),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["wpm"], 61);
        assert_eq!(json["difficulty"], "normal");
        assert_eq!(json["word_difficulty"], "medium");
        assert_eq!(json["date"], "2024-03-05T10:20:30Z");
    }

    #[test]
    fn test_summary() {
        let store = ProgressStore::in_memory();
        let board = Leaderboard::new(&store);
        assert_eq!(board.summary(), None);

        let now = Utc::now();
        board.record(result(40, 99, false), now).unwrap();
        board.record(result(61, 92, true), now).unwrap();
        board.record(result(50, 95, true), now).unwrap();

        let summary = board.summary().unwrap();
        assert_eq!(summary.best_wpm, 61);
        assert_eq!(summary.best_accuracy, 99);
        // 151 / 3 = 50.33
        assert_eq!(summary.average_wpm, 50);
        assert_eq!(summary.victories, 2);
    }

    #[test]
    fn test_clear() {
        let store = ProgressStore::in_memory();
        let board = Leaderboard::new(&store);
        board.record(result(40, 99, false), Utc::now()).unwrap();
        board.clear().unwrap();
        assert!(board.entries().is_empty());
    }
}
