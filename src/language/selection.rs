use super::{core::Language, difficulty::WordDifficulty};

/// Word pool for the word-list passage mode.
///
/// A known tier yields the union of its own and every easier tier's words.
/// `None` stands for a tier name that could not be recognised and yields the
/// medium words alone, without the easy words a real medium tier includes.
pub fn vocabulary(tier: Option<WordDifficulty>) -> Vec<&'static str> {
    match tier {
        Some(tier) => tier
            .included_tiers()
            .iter()
            .flat_map(|t| Language::for_tier(*t).words.iter().map(String::as_str))
            .collect(),
        None => Language::for_tier(WordDifficulty::Medium)
            .words
            .iter()
            .map(String::as_str)
            .collect(),
    }
}
