//! Error types, one per stage: dictionary load, glyph configuration, and
//! whole-document transliteration.

use crate::core::types::{GlyphKey, Omission};
use thiserror::Error;

/// A broken pronunciation source. Always fatal at load time.
#[derive(Debug, Error)]
pub enum DictionaryError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("bad dictionary line {line}: {content:?}")]
    Malformed { line: usize, content: String },

    #[error("duplicate dictionary key: {key:?}")]
    Duplicate { key: String },

    /// The `%` marker must be followed by exactly one letter.
    #[error("bad disambiguation suffix on line {line}: {key:?}")]
    BadDisambiguation { line: usize, key: String },
}

/// The merge rules and the glyph table disagree. Never caused by user text.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no glyph for key {key}{}", in_word(.word))]
    UnmappedGlyph { key: GlyphKey, word: Option<String> },

    #[error("rasterizer produced an empty mask for {key}")]
    EmptyGlyph { key: GlyphKey },

    #[error("glyph table lists {key} twice")]
    DuplicateGlyph { key: GlyphKey },

    #[error("font could not be loaded: {0}")]
    Font(String),
}

#[derive(Debug, Error)]
pub enum TransliterationError {
    #[error("dictionary load failed: {0}")]
    Dictionary(#[from] DictionaryError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Raised only after the whole document has been laid out, so every
    /// missing word is reported at once.
    #[error("incomplete dictionary: {}", list_omissions(.missing))]
    IncompleteDictionary { missing: Vec<Omission> },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("dictionary cache error: {0}")]
    Cache(#[from] bincode::Error),

    #[error("dictionary cache version {found} is not supported (expected {expected})")]
    CacheVersion { found: u32, expected: u32 },

    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),
}

fn in_word(word: &Option<String>) -> String {
    word.as_deref().map(|w| format!(" in {:?}", w)).unwrap_or_default()
}

fn list_omissions(missing: &[Omission]) -> String {
    missing.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

/// A convenience `Result` type alias using the crate's top-level error.
pub type Result<T> = std::result::Result<T, TransliterationError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::OmissionKind;

    #[test]
    fn incomplete_dictionary_lists_every_word() {
        let err = TransliterationError::IncompleteDictionary {
            missing: vec![
                Omission { word: "ZORB".into(), kind: OmissionKind::NotInDictionary },
                Omission { word: "&".into(), kind: OmissionKind::NoGlyph },
            ],
        };
        assert_eq!(
            err.to_string(),
            "incomplete dictionary: \"ZORB\" not in dictionary, \"&\" has no glyph"
        );
    }

    #[test]
    fn unmapped_glyph_names_the_word_when_known() {
        let err = ConfigError::UnmappedGlyph { key: GlyphKey::pair('o', 'ʊ'), word: Some("GO".into()) };
        assert_eq!(err.to_string(), "no glyph for key oʊ in \"GO\"");
        let err = ConfigError::UnmappedGlyph { key: GlyphKey::single('q'), word: None };
        assert_eq!(err.to_string(), "no glyph for key q");
    }
}
