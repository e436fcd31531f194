use include_dir::{include_dir, Dir};
use serde::Deserialize;
use serde_json::from_str;
use std::error::Error;
use std::sync::OnceLock;

use super::difficulty::WordDifficulty;

static LANG_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/lang");

static LANGUAGES: OnceLock<[Language; 3]> = OnceLock::new();

/// Word and sentence pools for a single vocabulary tier.
#[derive(Deserialize, Clone, Debug)]
pub struct Language {
    pub name: String,
    pub words: Vec<String>,
    pub sentences: Vec<String>,
}

impl Language {
    /// Embedded pools for `tier`. Loaded once and shared for the process lifetime.
    pub fn for_tier(tier: WordDifficulty) -> &'static Language {
        let languages = LANGUAGES.get_or_init(|| {
            WordDifficulty::ALL.map(|tier| {
                read_language_from_file(format!("{tier}.json"))
                    .unwrap_or_else(|e| panic!("embedded language '{tier}' is invalid: {e}"))
            })
        });

        match tier {
            WordDifficulty::Easy => &languages[0],
            WordDifficulty::Medium => &languages[1],
            WordDifficulty::Hard => &languages[2],
        }
    }
}

fn read_language_from_file(file_name: String) -> Result<Language, Box<dyn Error>> {
    let file = LANG_DIR
        .get_file(&file_name)
        .ok_or_else(|| format!("language file {file_name} not found"))?;

    let file_as_str = file
        .contents_utf8()
        .ok_or("unable to interpret language file as a string")?;

    let lang: Language = from_str(file_as_str)?;
    if lang.words.is_empty() || lang.sentences.is_empty() {
        return Err(format!("language file {file_name} has an empty pool").into());
    }

    Ok(lang)
}
