pub mod core;
pub mod difficulty;
pub mod selection;
pub mod sentences;

// Re-export the main types for convenience
pub use core::Language;
pub use difficulty::{UnknownWordDifficulty, WordDifficulty};
pub use selection::vocabulary;
pub use sentences::sentence_pool;
