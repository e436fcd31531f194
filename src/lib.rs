// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod app_dirs;
pub mod config;
pub mod error;
pub mod history;
pub mod language;
pub mod leaderboard;
pub mod metrics;
pub mod opponent;
pub mod passage;
pub mod runtime;
pub mod session;
pub mod store;
pub mod word_generator;

pub use language::WordDifficulty;
pub use opponent::Difficulty;
pub use passage::Passage;
pub use session::{ResultRecord, Session, SessionConfig, SessionSettings};
