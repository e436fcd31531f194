use super::{core::Language, difficulty::WordDifficulty};

/// Curated sentence pool for the sentence passage mode.
///
/// Unlike the word pools, sentence pools are not cumulative. An unrecognised
/// tier reads from the medium pool.
pub fn sentence_pool(tier: Option<WordDifficulty>) -> &'static [String] {
    &Language::for_tier(tier.unwrap_or(WordDifficulty::Medium)).sentences
}
