// src/core/engine.rs
use crate::core::canvas::Canvas;
use crate::core::catalog::GlyphCatalog;
use crate::core::dictionary::Dictionary;
use crate::core::layout::{LaidOutLine, LayoutOutcome, PageConfig, PageLayout};
use crate::core::renderer::WordRenderer;
use crate::core::resolver::GlyphKeyResolver;
use crate::core::script::ScriptVariant;
use crate::core::segmenter::is_letter;
use crate::core::types::{GlyphKey, Omission, OmissionKind, ResolvedGlyph, ESCAPE_MARKER};
use crate::error::{ConfigError, TransliterationError};
use crate::raster::{CaptionFont, GlyphRasterizer};
use std::collections::HashSet;

/// What one token turned into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transcription {
    Glyphs(Vec<ResolvedGlyph>),
    /// Laid out with zero width; fails the document once layout is done.
    Missing(Omission),
}

/// Tokens a layout pass could not transcribe, each listed once in the order
/// first seen. Scoped to one document.
#[derive(Debug, Clone, Default)]
pub struct Omissions {
    list: Vec<Omission>,
    seen: HashSet<Omission>,
}

impl Omissions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` the first time an omission is recorded.
    pub fn record(&mut self, omission: Omission) -> bool {
        if self.seen.insert(omission.clone()) {
            self.list.push(omission);
            true
        } else {
            false
        }
    }

    pub fn as_slice(&self) -> &[Omission] {
        &self.list
    }

    pub fn into_vec(self) -> Vec<Omission> {
        self.list
    }
}

/// A token placed at a cursor position: the glyphs to draw and where the
/// cursor ends up. A token that could not be transcribed has no glyphs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeasuredWord {
    pub glyphs: Vec<ResolvedGlyph>,
    pub end: i32,
}

/// A finished page: the drawn canvas plus one record per wrapped line.
#[derive(Debug, Clone)]
pub struct Page {
    pub canvas: Canvas,
    pub lines: Vec<LaidOutLine>,
    pub overflowed: bool,
}

/// Dictionary, glyph catalog and page geometry for one script variant.
/// Everything here is read-only once built, so one transliterator can lay
/// out many documents, including from several threads at once.
pub struct Transliterator {
    dictionary: Dictionary,
    catalog: GlyphCatalog,
    resolver: GlyphKeyResolver,
    config: PageConfig,
}

impl Transliterator {
    pub fn new(dictionary: Dictionary, catalog: GlyphCatalog) -> Self {
        let variant = catalog.variant();
        Self {
            dictionary,
            resolver: GlyphKeyResolver::new(variant),
            config: PageConfig::for_variant(variant),
            catalog,
        }
    }

    /// Builds the glyph catalog for `variant` and wires it to `dictionary`.
    pub fn build<R>(
        variant: ScriptVariant,
        dictionary: Dictionary,
        rasterizer: &R,
    ) -> Result<Self, ConfigError>
    where
        R: GlyphRasterizer + ?Sized,
    {
        let config = PageConfig::for_variant(variant);
        let catalog = GlyphCatalog::build(variant, rasterizer, config.glyph_point_size)?;
        Ok(Self::new(dictionary, catalog).with_config(config))
    }

    pub fn with_config(mut self, config: PageConfig) -> Self {
        self.config = config;
        self
    }

    pub fn variant(&self) -> ScriptVariant {
        self.catalog.variant()
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn catalog(&self) -> &GlyphCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    pub fn renderer(&self) -> WordRenderer<'_> {
        WordRenderer::new(&self.catalog, self.config.ink)
    }

    /// Transcribes one token from the segmenter.
    ///
    /// Tokens that start with a symbol other than a letter or escape marker
    /// are drawn symbol by symbol. Words are split after their last letter:
    /// the head is looked up in the dictionary and the tail is passed
    /// through as literal trailing symbols.
    pub fn transcribe(&self, token: &str) -> Result<Transcription, ConfigError> {
        let Some(first) = token.chars().next() else {
            return Ok(Transcription::Glyphs(Vec::new()));
        };

        if !is_letter(first) && first != ESCAPE_MARKER {
            if token.chars().any(|c| !self.catalog.contains(GlyphKey::single(c))) {
                return Ok(Transcription::Missing(Omission {
                    word: token.to_string(),
                    kind: OmissionKind::NoGlyph,
                }));
            }
            let glyphs = token.chars().map(|c| ResolvedGlyph::plain(GlyphKey::single(c))).collect();
            return Ok(Transcription::Glyphs(glyphs));
        }

        let split = token
            .char_indices()
            .rev()
            .find(|&(_, c)| is_letter(c))
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(token.len());
        let (key, suffix) = token.split_at(split);

        if let Some(c) = suffix.chars().find(|&c| !self.catalog.contains(GlyphKey::single(c))) {
            return Ok(Transcription::Missing(Omission {
                word: c.to_string(),
                kind: OmissionKind::NoGlyph,
            }));
        }

        let Some(phonemes) = self.dictionary.lookup(key) else {
            return Ok(Transcription::Missing(Omission {
                word: key.to_string(),
                kind: self.why_missing(key),
            }));
        };
        if !self.resolver.is_stressed(phonemes) {
            log::debug!("no stress mark: {:?} ({:?})", key, phonemes);
        }

        let glyphs = self.resolver.resolve(phonemes, suffix);
        if let Some(g) = glyphs.iter().find(|g| !self.catalog.contains(g.key)) {
            return Err(ConfigError::UnmappedGlyph { key: g.key, word: Some(key.to_string()) });
        }
        Ok(Transcription::Glyphs(glyphs))
    }

    /// Tells a plain miss apart from a wrong or absent `%X` letter.
    fn why_missing(&self, key: &str) -> OmissionKind {
        let (stem, escaped) = match key.split_once(ESCAPE_MARKER) {
            Some((stem, _)) => (stem, true),
            None => (key, false),
        };
        let known = self.dictionary.variants(stem);
        if known.is_empty() {
            return OmissionKind::NotInDictionary;
        }
        log::debug!("{:?} is listed as {:?}", stem, known);
        if escaped {
            OmissionKind::UnknownVariant
        } else {
            OmissionKind::NeedsVariant
        }
    }

    /// Dry run of a token at cursor `x`. A token that cannot be transcribed
    /// is recorded and takes no space.
    pub fn measure_word(
        &self,
        token: &str,
        x: i32,
        omissions: &mut Omissions,
    ) -> Result<MeasuredWord, ConfigError> {
        match self.transcribe(token)? {
            Transcription::Glyphs(glyphs) => {
                let end = self.renderer().measure(x, &glyphs)?;
                Ok(MeasuredWord { glyphs, end })
            }
            Transcription::Missing(omission) => {
                omissions.record(omission);
                Ok(MeasuredWord { glyphs: Vec::new(), end: x })
            }
        }
    }

    pub fn romanize(&self, glyphs: &[ResolvedGlyph]) -> String {
        glyphs.iter().filter_map(|g| self.catalog.get(g.key)).map(|g| g.roman).collect()
    }

    /// Lays out `text` without drawing anything.
    pub fn lay_out(&self, text: &str) -> Result<LayoutOutcome, ConfigError> {
        PageLayout::new(self).run(text)
    }

    /// Lays out and draws `text` onto a fresh page. Fails without producing a
    /// page if any word could not be transcribed.
    pub fn render_page(
        &self,
        text: &str,
        captions: &dyn CaptionFont,
    ) -> Result<Page, TransliterationError> {
        let mut canvas = self.config.blank_canvas();
        let outcome = PageLayout::new(self).with_target(&mut canvas, captions).run(text)?;
        if !outcome.omissions.is_empty() {
            return Err(TransliterationError::IncompleteDictionary { missing: outcome.omissions });
        }
        log::info!("laid out {} lines", outcome.lines.len());
        Ok(Page { canvas, lines: outcome.lines, overflowed: outcome.overflowed })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Case;
    use crate::raster::BlockRasterizer;

    fn transliterator(entries: &[(&str, &str)]) -> Transliterator {
        let dictionary = Dictionary::from_entries(entries.iter().copied(), Case::Upper).unwrap();
        Transliterator::build(ScriptVariant::Current, dictionary, &BlockRasterizer).unwrap()
    }

    fn glyphs(t: Transcription) -> Vec<ResolvedGlyph> {
        match t {
            Transcription::Glyphs(g) => g,
            Transcription::Missing(o) => panic!("unexpected omission: {}", o),
        }
    }

    #[test]
    fn punctuation_bypasses_the_dictionary() {
        let t = transliterator(&[]);
        let g = glyphs(t.transcribe(".").unwrap());
        assert_eq!(g.len(), 1);
        assert_eq!(g[0].key, GlyphKey::single('.'));
        assert!(matches!(
            t.transcribe("&").unwrap(),
            Transcription::Missing(Omission { kind: OmissionKind::NoGlyph, .. })
        ));
    }

    #[test]
    fn trailing_symbols_pass_through() {
        let t = transliterator(&[("STAR", "s t ˈɑː")]);
        let g = glyphs(t.transcribe("STAR,").unwrap());
        let keys: Vec<GlyphKey> = g.iter().map(|g| g.key).collect();
        assert_eq!(
            keys,
            vec![
                GlyphKey::single('s'),
                GlyphKey::single('t'),
                GlyphKey::single('ɑ'),
                GlyphKey::single(','),
            ]
        );
        assert_eq!(t.romanize(&g), "staa,");
    }

    #[test]
    fn disambiguated_spellings_look_up_their_own_entry() {
        let t = transliterator(&[("LEAD%E", "l ˈɛ d"), ("LEAD%I", "l ˈiː d")]);
        let e = glyphs(t.transcribe("LEAD%E").unwrap());
        let i = glyphs(t.transcribe("LEAD%I").unwrap());
        assert_eq!(e[1].key, GlyphKey::single('ɛ'));
        assert_eq!(i[1].key, GlyphKey::single('i'));
    }

    #[test]
    fn misses_name_the_wrong_or_absent_variant_letter() {
        let t = transliterator(&[("LEAD%E", "l ˈɛ d"), ("LEAD%I", "l ˈiː d"), ("CAT", "k ˈæ t")]);
        let kind = |token: &str| match t.transcribe(token).unwrap() {
            Transcription::Missing(o) => o.kind,
            Transcription::Glyphs(_) => panic!("{} should be missing", token),
        };
        assert_eq!(kind("LEAD"), OmissionKind::NeedsVariant);
        assert_eq!(kind("LEAD%X"), OmissionKind::UnknownVariant);
        assert_eq!(kind("CAT%E"), OmissionKind::NotInDictionary);
        assert_eq!(kind("ZORB"), OmissionKind::NotInDictionary);
    }

    #[test]
    fn missing_word_measures_zero_and_is_recorded_once() {
        let t = transliterator(&[("CAT", "k ˈæ t")]);
        let mut omissions = Omissions::new();
        let missing = t.measure_word("ZORB", 40, &mut omissions).unwrap();
        assert_eq!(missing, MeasuredWord { glyphs: Vec::new(), end: 40 });
        assert_eq!(t.measure_word("ZORB", 90, &mut omissions).unwrap().end, 90);
        assert_eq!(omissions.as_slice().len(), 1);
        assert_eq!(omissions.as_slice()[0].word, "ZORB");

        let cat = t.measure_word("CAT", 40, &mut omissions).unwrap();
        assert_eq!(cat.end, 40 + 15 * 3);
        assert_eq!(cat.glyphs.len(), 3);
        assert_eq!(omissions.into_vec().len(), 1);
    }

    #[test]
    fn phoneme_outside_the_script_is_a_configuration_error() {
        let t = transliterator(&[("QUUX", "k w ˈʌ k s")]);
        let err = t.transcribe("QUUX").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::UnmappedGlyph { key, word: Some(ref w) } if key == GlyphKey::single('ʌ') && w == "QUUX"
        ));
    }
}
