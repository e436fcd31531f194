use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Vocabulary tier used by the passage generator.
///
/// Tiers are cumulative: a harder tier draws words from every easier pool
/// as well as its own.
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
pub enum WordDifficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl WordDifficulty {
    pub const ALL: [WordDifficulty; 3] = [Self::Easy, Self::Medium, Self::Hard];

    /// Tiers whose word pools make up this tier's vocabulary.
    pub fn included_tiers(self) -> &'static [WordDifficulty] {
        match self {
            Self::Easy => &Self::ALL[..1],
            Self::Medium => &Self::ALL[..2],
            Self::Hard => &Self::ALL[..],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown word difficulty '{0}'")]
pub struct UnknownWordDifficulty(pub String);

impl FromStr for WordDifficulty {
    type Err = UnknownWordDifficulty;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            _ => Err(UnknownWordDifficulty(s.to_string())),
        }
    }
}
