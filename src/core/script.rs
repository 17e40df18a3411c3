// src/core/script.rs
//! The two Miileeniol script variants. Each variant fixes its phoneme
//! alphabet, which adjacent symbols merge into one glyph, the base-script
//! text every glyph is rasterized from, and where decorations sit.
use crate::core::dictionary::DictFormat;
use crate::core::types::{Case, GlyphKey, PhonemeSymbol};
use serde::{Deserialize, Serialize};

/// Class decoration baked into a glyph's identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    None,
    /// Short vowel: a dot above the glyph.
    Dot,
    /// Long vowel, diphthong or voiced consonant: a bar above the glyph,
    /// merged across adjacent barred glyphs.
    Bar,
}

/// One row of a variant's glyph table.
#[derive(Debug, Clone, Copy)]
pub struct GlyphSpec {
    pub key: GlyphKey,
    /// Base-script letters handed to the rasterizer.
    pub text: &'static str,
    pub mark: Mark,
    /// Plain-ASCII romanization, used in layout reports.
    pub roman: &'static str,
}

/// Pixel offsets of the decorations, relative to a glyph's origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decorations {
    pub high_dot_y: i32,
    pub stress_dot_y: i32,
    pub bar_y: i32,
    /// Extra lift of a bar that starts over a vowel.
    pub vowel_bar_lift: i32,
    /// Glyphs following a vowel sit this much lower, until the next
    /// separator.
    pub vowel_drop: i32,
    pub bar_inset_left: i32,
    pub bar_inset_right: i32,
    /// Bars end at the right edge of the last glyph's ink instead of at
    /// its advance.
    pub bar_to_mask_edge: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScriptVariant {
    /// IPA transcriptions (Britfone), stress dots, per-class vowel marks.
    Current,
    /// The 0.1 script: ASCII spellings written in vowel pairs, voiced
    /// consonants barred, no stress dots.
    Legacy,
}

const fn spec(key: GlyphKey, text: &'static str, mark: Mark, roman: &'static str) -> GlyphSpec {
    GlyphSpec { key, text, mark, roman }
}

const fn one(c: char, text: &'static str, mark: Mark, roman: &'static str) -> GlyphSpec {
    spec(GlyphKey::single(c), text, mark, roman)
}

const fn two(a: char, b: char, text: &'static str, mark: Mark, roman: &'static str) -> GlyphSpec {
    spec(GlyphKey::pair(a, b), text, mark, roman)
}

const fn punct(c: char, text: &'static str) -> GlyphSpec {
    one(c, text, Mark::None, text)
}

use Mark::{Bar, Dot, None as Plain};

static CURRENT_GLYPHS: &[GlyphSpec] = &[
    punct('\'', "'"),
    punct('"', "\""),
    punct('+', "+"),
    punct('-', "-"),
    punct('?', "?"),
    punct('!', "!"),
    punct(',', ","),
    punct('.', "."),
    punct(';', ";"),
    punct(':', ":"),
    punct('(', "("),
    punct(')', ")"),
    punct('…', "…"),
    punct('—', "—"),
    two('a', 'ɪ', "aı", Bar, "ai"),
    two('a', 'ʊ', "au", Bar, "au"),
    two('e', 'ɪ', "eı", Bar, "ei"),
    one('i', "ı", Dot, "ia"),
    one('u', "u", Dot, "ue"),
    one('æ', "a", Dot, "ae"),
    one('ɐ', "ε", Dot, "ua"),
    one('ɑ', "a", Bar, "aa"),
    one('ɒ', "o", Dot, "oe"),
    one('ɔ', "o", Bar, "oa"),
    two('ɔ', 'ɪ', "oı", Bar, "oi"),
    one('ə', "ε", Bar, "oo"),
    two('ə', 'ʊ', "εu", Bar, "eu"),
    one('ɛ', "e", Bar, "ee"),
    two('ɛ', 'ə', "eε", Bar, "eo"),
    one('ɜ', "e", Dot, "ea"),
    one('ɪ', "ı", Bar, "ii"),
    two('ɪ', 'ə', "ıε", Bar, "ie"),
    one('ʊ', "u", Bar, "uu"),
    two('ʊ', 'ə', "uε", Bar, "ue"),
    one('b', "B", Plain, "b"),
    one('d', "D", Plain, "d"),
    two('d', 'ʒ', "J", Plain, "j"),
    one('f', "F", Plain, "f"),
    one('g', "G", Plain, "g"),
    one('h', "H", Plain, "h"),
    one('j', "Y", Plain, "y"),
    one('k', "K", Plain, "k"),
    one('l', "L", Plain, "l"),
    one('m', "M", Plain, "m"),
    one('n', "N", Plain, "n"),
    one('p', "P", Plain, "p"),
    one('s', "S", Plain, "s"),
    one('t', "T", Plain, "t"),
    two('t', 'ʃ', "Ч", Plain, "tx"),
    one('v', "V", Plain, "v"),
    one('w', "W", Plain, "w"),
    one('z', "Z", Plain, "z"),
    one('ð', "Δ", Plain, "dh"),
    one('ŋ', "Γ", Plain, "ng"),
    one('ɹ', "R", Plain, "r"),
    one('ʃ', "X", Plain, "x"),
    one('ʒ', "Ж", Plain, "zh"),
    one('θ', "Θ", Plain, "th"),
];

static LEGACY_GLYPHS: &[GlyphSpec] = &[
    punct('\'', "'"),
    punct('"', "\""),
    punct('+', "+"),
    punct('-', "-"),
    punct('?', "?"),
    punct('!', "!"),
    punct(',', ","),
    punct('.', "."),
    punct(';', ";"),
    punct(':', ":"),
    punct('(', "("),
    punct(')', ")"),
    punct('…', "…"),
    two('a', 'a', "a", Bar, "aa"),
    two('a', 'e', "a", Plain, "ae"),
    two('a', 'i', "aı", Bar, "ai"),
    two('a', 'u', "au", Bar, "au"),
    two('e', 'a', "e", Plain, "ea"),
    two('e', 'e', "e", Bar, "ee"),
    two('e', 'i', "eı", Bar, "ei"),
    two('e', 'o', "eε", Bar, "eo"),
    two('i', 'a', "ε", Plain, "ia"),
    two('i', 'i', "ı", Bar, "ii"),
    two('i', 'o', "ıε", Bar, "io"),
    two('o', 'a', "o", Plain, "oa"),
    two('o', 'e', "o", Bar, "oe"),
    two('o', 'i', "oı", Bar, "oi"),
    two('o', 'o', "ε", Bar, "oo"),
    two('o', 'u', "ou", Bar, "ou"),
    two('u', 'a', "ı", Plain, "ua"),
    two('u', 'e', "u", Plain, "ue"),
    two('u', 'u', "u", Bar, "uu"),
    one('p', "P", Plain, "p"),
    one('b', "B", Bar, "b"),
    one('t', "T", Plain, "t"),
    one('d', "T", Bar, "d"),
    one('k', "K", Plain, "k"),
    one('g', "K", Bar, "g"),
    one('m', "M", Plain, "m"),
    one('n', "M", Bar, "n"),
    one('l', "L", Plain, "l"),
    one('r', "L", Bar, "r"),
    one('f', "F", Plain, "f"),
    one('v', "F", Bar, "v"),
    one('c', "H", Plain, "c"),
    one('h', "H", Bar, "h"),
    one('s', "S", Plain, "s"),
    one('z', "S", Bar, "z"),
    one('x', "J", Plain, "x"),
    one('j', "J", Bar, "j"),
    one('w', "Y", Plain, "w"),
    one('y', "Y", Bar, "y"),
];

impl ScriptVariant {
    pub fn glyph_specs(self) -> &'static [GlyphSpec] {
        match self {
            ScriptVariant::Current => CURRENT_GLYPHS,
            ScriptVariant::Legacy => LEGACY_GLYPHS,
        }
    }

    pub fn case(self) -> Case {
        match self {
            ScriptVariant::Current => Case::Upper,
            ScriptVariant::Legacy => Case::Lower,
        }
    }

    pub fn dictionary_format(self) -> DictFormat {
        match self {
            ScriptVariant::Current => DictFormat::Csv,
            ScriptVariant::Legacy => DictFormat::Tsv,
        }
    }

    /// Whether vowels are only ever written as pairs.
    pub fn pairs_vowels(self) -> bool {
        matches!(self, ScriptVariant::Legacy)
    }

    pub fn stress_mark(self) -> Option<PhonemeSymbol> {
        match self {
            ScriptVariant::Current => Some('ˈ'),
            ScriptVariant::Legacy => None,
        }
    }

    /// Symbols that emit no glyph of their own but end over-bar runs.
    pub fn is_separator(self, c: PhonemeSymbol) -> bool {
        match self {
            ScriptVariant::Current => matches!(c, ' ' | 'ˌ' | 'ː'),
            ScriptVariant::Legacy => matches!(c, ' ' | '-'),
        }
    }

    pub fn is_vowel(self, c: PhonemeSymbol) -> bool {
        match self {
            ScriptVariant::Current => matches!(
                c,
                'a' | 'e' | 'i' | 'u' | 'æ' | 'ɐ' | 'ɑ' | 'ɒ' | 'ɔ' | 'ə' | 'ɛ' | 'ɜ' | 'ɪ' | 'ʊ'
            ),
            ScriptVariant::Legacy => matches!(c, 'a' | 'e' | 'i' | 'o' | 'u'),
        }
    }

    pub fn is_consonant(self, c: PhonemeSymbol) -> bool {
        match self {
            ScriptVariant::Current => matches!(
                c,
                'b' | 'd' | 'f' | 'g' | 'h' | 'j' | 'k' | 'l' | 'm' | 'n' | 'p' | 's' | 't' | 'v'
                    | 'w' | 'z' | 'ð' | 'ŋ' | 'ɹ' | 'ʃ' | 'ʒ' | 'θ'
            ),
            ScriptVariant::Legacy => matches!(
                c,
                'k' | 's' | 't' | 'n' | 'h' | 'l' | 'b' | 'v' | 'f' | 'x' | 'g' | 'z' | 'd' | 'm'
                    | 'j' | 'r' | 'p' | 'w' | 'c' | 'y'
            ),
        }
    }

    /// Whether `second` is a merge partner of `first`: a vowel followed by
    /// its diphthong tail, or a consonant followed by its digraph partner.
    pub fn merges(self, first: PhonemeSymbol, second: PhonemeSymbol) -> bool {
        if !(self.is_vowel(first) || self.is_consonant(first)) {
            return false;
        }
        let key = GlyphKey::pair(first, second);
        self.glyph_specs().iter().any(|spec| spec.key == key)
    }

    pub fn decorations(self) -> Decorations {
        match self {
            ScriptVariant::Current => Decorations {
                high_dot_y: 5,
                stress_dot_y: 28,
                bar_y: 7,
                vowel_bar_lift: 0,
                vowel_drop: 0,
                bar_inset_left: 3,
                bar_inset_right: 2,
                bar_to_mask_edge: true,
            },
            ScriptVariant::Legacy => Decorations {
                high_dot_y: 5,
                stress_dot_y: 28,
                bar_y: 2,
                vowel_bar_lift: 5,
                vowel_drop: 5,
                bar_inset_left: 3,
                bar_inset_right: 2,
                bar_to_mask_edge: false,
            },
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ScriptVariant::Current => "current",
            ScriptVariant::Legacy => "legacy-0.1",
        }
    }
}
