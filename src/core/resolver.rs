// src/core/resolver.rs
use crate::core::script::ScriptVariant;
use crate::core::types::{GlyphKey, ResolvedGlyph};
use std::mem;

/// Turns a dictionary phoneme string into the glyph keys that spell it.
pub struct GlyphKeyResolver {
    variant: ScriptVariant,
}

impl GlyphKeyResolver {
    pub fn new(variant: ScriptVariant) -> Self {
        Self { variant }
    }

    pub fn variant(&self) -> ScriptVariant {
        self.variant
    }

    /// Resolves `phonemes` left to right, then appends each symbol of
    /// `suffix` (trailing punctuation split off the spelled word) as its own
    /// glyph.
    ///
    /// Separators emit nothing. A stress mark stresses the next emitted
    /// glyph only. A vowel or consonant followed by its merge partner
    /// becomes one composite key.
    ///
    /// In a script that only writes vowels in pairs, an unpaired vowel is
    /// not drawn; the glyph after it takes its place, and glyphs from then
    /// on sit lower as they would after a pair.
    pub fn resolve(&self, phonemes: &str, suffix: &str) -> Vec<ResolvedGlyph> {
        let paired_vowels = self.variant.pairs_vowels();
        let vowel_drop = self.variant.decorations().vowel_drop;
        let mut glyphs = Vec::new();
        let mut symbols = phonemes.chars().peekable();
        let mut stressed = false;
        let mut breaks_bar = true;
        let mut drop = 0;
        let mut lone_vowel = false;

        while let Some(c) = symbols.next() {
            if self.variant.is_separator(c) {
                breaks_bar = true;
                drop = 0;
                continue;
            }
            if Some(c) == self.variant.stress_mark() {
                stressed = true;
                continue;
            }

            let key = match symbols.peek() {
                Some(&next) if self.variant.merges(c, next) => {
                    symbols.next();
                    GlyphKey::pair(c, next)
                }
                _ if paired_vowels && self.variant.is_vowel(c) => {
                    lone_vowel = true;
                    continue;
                }
                _ => GlyphKey::single(c),
            };

            glyphs.push(ResolvedGlyph {
                key,
                stressed: mem::take(&mut stressed),
                breaks_bar: mem::take(&mut breaks_bar),
                drop,
            });

            let after_lone_vowel = mem::take(&mut lone_vowel);
            if self.variant.is_vowel(c) || after_lone_vowel {
                drop = vowel_drop;
            }
        }

        glyphs.extend(
            suffix
                .chars()
                .filter(|c| !c.is_whitespace())
                .map(|c| ResolvedGlyph::plain(GlyphKey::single(c))),
        );
        glyphs
    }

    /// Whether a phoneme string carries a stress mark at all.
    pub fn is_stressed(&self, phonemes: &str) -> bool {
        match self.variant.stress_mark() {
            Some(mark) => phonemes.contains(mark),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(glyphs: &[ResolvedGlyph]) -> Vec<GlyphKey> {
        glyphs.iter().map(|g| g.key).collect()
    }

    #[test]
    fn diphthong_becomes_one_key() {
        let resolver = GlyphKeyResolver::new(ScriptVariant::Current);
        let glyphs = resolver.resolve("ˈaɪ t", "");
        assert_eq!(keys(&glyphs), vec![GlyphKey::pair('a', 'ɪ'), GlyphKey::single('t')]);
        assert!(glyphs[0].stressed);
        assert!(!glyphs[1].stressed);
    }

    #[test]
    fn plain_word_has_no_stress() {
        let resolver = GlyphKeyResolver::new(ScriptVariant::Current);
        let glyphs = resolver.resolve("k æ t", "");
        assert_eq!(
            keys(&glyphs),
            vec![GlyphKey::single('k'), GlyphKey::single('æ'), GlyphKey::single('t')]
        );
        assert!(glyphs.iter().all(|g| !g.stressed));
    }

    #[test]
    fn stress_waits_for_the_next_glyph() {
        let resolver = GlyphKeyResolver::new(ScriptVariant::Current);
        let glyphs = resolver.resolve("k ə n s ˈiː v d", "");
        let stressed: Vec<GlyphKey> = glyphs.iter().filter(|g| g.stressed).map(|g| g.key).collect();
        assert_eq!(stressed, vec![GlyphKey::single('i')]);
        assert_eq!(glyphs.len(), 7);
    }

    #[test]
    fn consonant_digraphs_merge() {
        let resolver = GlyphKeyResolver::new(ScriptVariant::Current);
        let glyphs = resolver.resolve("tʃ ˈeɪ n m eɪ l", "");
        assert_eq!(glyphs[0].key, GlyphKey::pair('t', 'ʃ'));
        assert_eq!(glyphs[1].key, GlyphKey::pair('e', 'ɪ'));
        assert!(glyphs[1].stressed);

        let glyphs = resolver.resolve("ˈɪ t s", "");
        assert_eq!(glyphs[1].key, GlyphKey::single('t'));
        assert_eq!(glyphs[2].key, GlyphKey::single('s'));
    }

    #[test]
    fn length_marks_are_skipped() {
        let resolver = GlyphKeyResolver::new(ScriptVariant::Current);
        let glyphs = resolver.resolve("ˈɑː", "");
        assert_eq!(keys(&glyphs), vec![GlyphKey::single('ɑ')]);
    }

    #[test]
    fn suffix_symbols_follow_the_word() {
        let resolver = GlyphKeyResolver::new(ScriptVariant::Current);
        let glyphs = resolver.resolve("s t ˈɑː", ",");
        assert_eq!(glyphs.last().map(|g| g.key), Some(GlyphKey::single(',')));
        assert!(glyphs.last().unwrap().breaks_bar);
    }

    #[test]
    fn legacy_pairs_vowels_and_drops_after_them() {
        let resolver = GlyphKeyResolver::new(ScriptVariant::Legacy);
        let glyphs = resolver.resolve("kaet-hoo", "");
        assert_eq!(
            keys(&glyphs),
            vec![
                GlyphKey::single('k'),
                GlyphKey::pair('a', 'e'),
                GlyphKey::single('t'),
                GlyphKey::single('h'),
                GlyphKey::pair('o', 'o'),
            ]
        );
        let drops: Vec<i32> = glyphs.iter().map(|g| g.drop).collect();
        assert_eq!(drops, vec![0, 0, 5, 0, 0]);
        assert!(glyphs[3].breaks_bar);
        assert!(!glyphs[4].breaks_bar);
    }

    #[test]
    fn legacy_unpaired_vowel_is_not_drawn() {
        let resolver = GlyphKeyResolver::new(ScriptVariant::Legacy);
        let glyphs = resolver.resolve("kats", "");
        assert_eq!(
            keys(&glyphs),
            vec![GlyphKey::single('k'), GlyphKey::single('t'), GlyphKey::single('s')]
        );
        let drops: Vec<i32> = glyphs.iter().map(|g| g.drop).collect();
        assert_eq!(drops, vec![0, 0, 5]);

        let glyphs = resolver.resolve("ka", "");
        assert_eq!(keys(&glyphs), vec![GlyphKey::single('k')]);
    }

    #[test]
    fn resolved_keys_always_exist_in_the_glyph_table() {
        for (variant, words) in [
            (ScriptVariant::Legacy, &["kat", "kaet", "aeiou", "hoo-ka", "i", "boat"][..]),
            (ScriptVariant::Current, &["k æ t", "ˈaɪ t", "tʃ ˈeɪ n"][..]),
        ] {
            let resolver = GlyphKeyResolver::new(variant);
            for word in words {
                for g in resolver.resolve(word, ".") {
                    assert!(
                        variant.glyph_specs().iter().any(|s| s.key == g.key),
                        "{:?}: {} from {:?}",
                        variant,
                        g.key,
                        word
                    );
                }
            }
        }
    }
}
