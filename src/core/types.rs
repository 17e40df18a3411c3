// src/core/types.rs
use serde::{Deserialize, Serialize};
use std::fmt;

/// One unit of a pronunciation transcription: a vowel, consonant, stress
/// mark, boundary mark or punctuation symbol.
pub type PhonemeSymbol = char;

/// Marks a disambiguated spelling, e.g. `LEAD%E` versus `LEAD%I`. The marker
/// and the single letter after it never reach the rendered output.
pub const ESCAPE_MARKER: char = '%';

/// Identifies one rendered glyph: a base symbol, optionally merged with the
/// symbol that follows it (a diphthong or a consonant digraph).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GlyphKey {
    pub primary: PhonemeSymbol,
    pub secondary: Option<PhonemeSymbol>,
}

impl GlyphKey {
    pub const fn single(primary: PhonemeSymbol) -> Self {
        Self { primary, secondary: None }
    }

    pub const fn pair(primary: PhonemeSymbol, secondary: PhonemeSymbol) -> Self {
        Self { primary, secondary: Some(secondary) }
    }

    pub fn is_composite(&self) -> bool {
        self.secondary.is_some()
    }
}

impl fmt::Display for GlyphKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.primary)?;
        if let Some(secondary) = self.secondary {
            write!(f, "{}", secondary)?;
        }
        Ok(())
    }
}

/// A glyph key as it occurs inside one word, with the decorations and
/// placement that depend on its neighbours rather than on the key itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedGlyph {
    pub key: GlyphKey,
    /// First glyph after a stress mark; takes the stress dot.
    pub stressed: bool,
    /// A separator or punctuation preceded this glyph, so any over-bar run
    /// in progress ends before it.
    pub breaks_bar: bool,
    /// Vertical offset of this glyph below the line's glyph origin.
    pub drop: i32,
}

impl ResolvedGlyph {
    pub fn plain(key: GlyphKey) -> Self {
        Self { key, stressed: false, breaks_bar: true, drop: 0 }
    }
}

/// The single canonical case used for dictionary keys and word tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Case {
    Upper,
    Lower,
}

impl Case {
    pub fn apply(self, s: &str) -> String {
        match self {
            Case::Upper => s.to_uppercase(),
            Case::Lower => s.to_lowercase(),
        }
    }
}

/// A premultiplied RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba(pub [u8; 4]);

impl Rgba {
    pub const WHITE: Rgba = Rgba([0xFF, 0xFF, 0xFF, 0xFF]);
    pub const GUIDE: Rgba = Rgba([0xDD, 0xDD, 0xDD, 0xFF]);
    pub const NAVY: Rgba = Rgba([0x00, 0x00, 0x7F, 0xFF]);
    pub const GREEN: Rgba = Rgba([0x00, 0x7F, 0x00, 0xFF]);
    pub const MAROON: Rgba = Rgba([0x7F, 0x00, 0x00, 0xFF]);

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Rgba([r, g, b, 0xFF])
    }
}

/// Why a token could not be transcribed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OmissionKind {
    /// The word has no dictionary entry.
    NotInDictionary,
    /// A punctuation or suffix symbol has no glyph in the script.
    NoGlyph,
    /// The `%X` letter is not one the dictionary lists for this word.
    UnknownVariant,
    /// The word only exists with a `%X` letter, and none was given.
    NeedsVariant,
}

/// A token that was laid out with zero width because it could not be
/// transcribed. Any omission makes the whole document fail.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Omission {
    pub word: String,
    pub kind: OmissionKind,
}

impl fmt::Display for Omission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            OmissionKind::NotInDictionary => write!(f, "{:?} not in dictionary", self.word),
            OmissionKind::NoGlyph => write!(f, "{:?} has no glyph", self.word),
            OmissionKind::UnknownVariant => write!(f, "{:?} is not a listed variant", self.word),
            OmissionKind::NeedsVariant => {
                write!(f, "{:?} needs a %-letter to pick its pronunciation", self.word)
            }
        }
    }
}
