use crate::{
    language::{sentence_pool, vocabulary, WordDifficulty},
    passage::Passage,
};
use itertools::Itertools;
use rand::{seq::SliceRandom, Rng};
use std::ops::RangeInclusive;

/// Chance that a passage is built from curated sentences rather than words.
pub const SENTENCE_PROBABILITY: f64 = 0.7;
pub const SENTENCE_COUNT: RangeInclusive<usize> = 2..=4;
pub const WORD_COUNT: RangeInclusive<usize> = 15..=25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassageMode {
    Sentences,
    Words,
}

/// Generate a fresh practice passage for `tier`.
pub fn generate(tier: WordDifficulty) -> Passage {
    generate_with(&mut rand::thread_rng(), Some(tier))
}

/// Generate a passage from a tier given by name.
///
/// Library entry point for callers holding an untyped tier name; the binary
/// always has a parsed `WordDifficulty` and uses `generate`. Unrecognised
/// names are not an error: word mode falls back to the medium-only pool and
/// sentence mode to the medium sentences.
pub fn generate_named(name: &str) -> Passage {
    let tier = match name.parse::<WordDifficulty>() {
        Ok(tier) => Some(tier),
        Err(e) => {
            log::warn!("{e}, using fallback pools");
            None
        }
    };
    generate_with(&mut rand::thread_rng(), tier)
}

pub fn generate_with<R: Rng + ?Sized>(rng: &mut R, tier: Option<WordDifficulty>) -> Passage {
    let mode = choose_mode(rng);
    generate_in_mode(rng, tier, mode)
}

pub fn choose_mode<R: Rng + ?Sized>(rng: &mut R) -> PassageMode {
    if rng.gen_bool(SENTENCE_PROBABILITY) {
        PassageMode::Sentences
    } else {
        PassageMode::Words
    }
}

pub fn generate_in_mode<R: Rng + ?Sized>(
    rng: &mut R,
    tier: Option<WordDifficulty>,
    mode: PassageMode,
) -> Passage {
    let text = match mode {
        PassageMode::Sentences => {
            let pool = sentence_pool(tier);
            let count = rng.gen_range(SENTENCE_COUNT);
            draw(rng, pool, count)
        }
        PassageMode::Words => {
            let pool = vocabulary(tier);
            let count = rng.gen_range(WORD_COUNT);
            draw(rng, &pool, count)
        }
    };
    Passage::from_text(text)
}

// Independent uniform draws, with replacement, joined by single spaces.
fn draw<R, T>(rng: &mut R, pool: &[T], count: usize) -> String
where
    R: Rng + ?Sized,
    T: AsRef<str>,
{
    (0..count)
        .filter_map(|_| pool.choose(rng))
        .map(T::as_ref)
        .join(" ")
}
