use crate::{error::Result, session::ResultRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

/// One row of the history log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRow {
    pub date: DateTime<Utc>,
    pub wpm: u32,
    pub accuracy: u32,
    pub time_spent_secs: u32,
    pub user_won: bool,
    pub difficulty: String,
    pub word_difficulty: String,
}

impl HistoryRow {
    pub fn new(result: &ResultRecord, date: DateTime<Utc>) -> Self {
        Self {
            date,
            wpm: result.wpm,
            accuracy: result.accuracy,
            time_spent_secs: result.time_spent_secs,
            user_won: result.user_won,
            difficulty: result.difficulty.to_string(),
            word_difficulty: result.word_difficulty.to_string(),
        }
    }
}

/// Append-only CSV log of every finished session, unlike the leaderboard
/// which only keeps the best few.
#[derive(Debug, Clone)]
pub struct HistoryLog {
    path: PathBuf,
}

impl HistoryLog {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, result: &ResultRecord, date: DateTime<Utc>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        // If the log doesn't exist yet, we need to emit a header
        let needs_header = !self.path.exists();

        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);
        writer.serialize(HistoryRow::new(result, date))?;
        writer.flush()?;
        Ok(())
    }

    /// All rows, oldest first. A missing log is empty.
    pub fn read_all(&self) -> Result<Vec<HistoryRow>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let mut reader = csv::Reader::from_path(&self.path)?;
        let rows = reader.deserialize().collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{language::WordDifficulty, opponent::Difficulty};
    use tempfile::tempdir;

    fn result(wpm: u32) -> ResultRecord {
        ResultRecord {
            wpm,
            accuracy: 93,
            time_spent_secs: 48,
            user_won: false,
            difficulty: Difficulty::Flash,
            word_difficulty: WordDifficulty::Easy,
        }
    }

    #[test]
    fn test_append_writes_header_once() {
        let dir = tempdir().unwrap();
        let log = HistoryLog::new(dir.path().join("state").join("history.csv"));
        let date: DateTime<Utc> = "2024-06-01T08:00:00Z".parse().unwrap();

        log.append(&result(45), date).unwrap();
        log.append(&result(52), date).unwrap();

        let contents = fs::read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "date,wpm,accuracy,time_spent_secs,user_won,difficulty,word_difficulty"
        );
        assert_eq!(lines[1], "2024-06-01T08:00:00Z,45,93,48,false,flash,easy");
    }

    #[test]
    fn test_read_all_returns_rows_in_order() {
        let dir = tempdir().unwrap();
        let log = HistoryLog::new(dir.path().join("history.csv"));
        let date = Utc::now();

        log.append(&result(45), date).unwrap();
        log.append(&result(52), date).unwrap();

        let rows = log.read_all().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], HistoryRow::new(&result(45), date));
        assert_eq!(rows[1].wpm, 52);
    }

    #[test]
    fn test_missing_log_is_empty() {
        let dir = tempdir().unwrap();
        let log = HistoryLog::new(dir.path().join("nope.csv"));
        assert!(log.read_all().unwrap().is_empty());
    }
}
