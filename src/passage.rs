use std::fmt;

/// Longest custom passage the front-end accepts, in characters.
pub const MAX_CUSTOM_CHARS: usize = 1000;

/// The text a user transcribes in one session. Never empty and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Passage {
    text: String,
    chars: Vec<char>,
}

impl Passage {
    /// Builds a passage from user-supplied text.
    ///
    /// Leading and trailing whitespace is trimmed; the rest is kept verbatim.
    /// Returns `None` when nothing is left after trimming.
    pub fn custom(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self::from_text(trimmed.to_string()))
        }
    }

    pub(crate) fn from_text(text: String) -> Self {
        debug_assert!(!text.is_empty(), "passages are never empty");
        let chars = text.chars().collect();
        Self { text, chars }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }
}

impl fmt::Display for Passage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
