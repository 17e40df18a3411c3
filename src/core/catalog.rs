// src/core/catalog.rs
use crate::core::canvas::AlphaMask;
use crate::core::script::{Mark, ScriptVariant};
use crate::core::types::GlyphKey;
use crate::error::ConfigError;
use crate::raster::GlyphRasterizer;
use std::collections::HashMap;

/// A pre-rendered glyph and its class decorations.
#[derive(Debug, Clone)]
pub struct Glyph {
    pub mask: AlphaMask,
    /// Horizontal advance: 15/16 of the mask width, which tightens the
    /// script slightly.
    pub advance: i32,
    pub has_dot: bool,
    pub has_over_bar: bool,
    pub roman: &'static str,
}

/// Every glyph a script variant can produce, rasterized once up front.
pub struct GlyphCatalog {
    variant: ScriptVariant,
    glyphs: HashMap<GlyphKey, Glyph>,
}

impl GlyphCatalog {
    pub fn build<R>(
        variant: ScriptVariant,
        rasterizer: &R,
        point_size: f32,
    ) -> Result<Self, ConfigError>
    where
        R: GlyphRasterizer + ?Sized,
    {
        let mut glyphs = HashMap::with_capacity(variant.glyph_specs().len());
        for spec in variant.glyph_specs() {
            let mask = rasterizer.rasterize(spec.text, point_size);
            if mask.width() == 0 || mask.is_blank() {
                return Err(ConfigError::EmptyGlyph { key: spec.key });
            }
            let glyph = Glyph {
                advance: mask.width() as i32 * 15 / 16,
                mask,
                has_dot: spec.mark == Mark::Dot,
                has_over_bar: spec.mark == Mark::Bar,
                roman: spec.roman,
            };
            if glyphs.insert(spec.key, glyph).is_some() {
                return Err(ConfigError::DuplicateGlyph { key: spec.key });
            }
        }
        log::info!("built {} glyphs for the {} script", glyphs.len(), variant.name());
        Ok(Self { variant, glyphs })
    }

    pub fn variant(&self) -> ScriptVariant {
        self.variant
    }

    pub fn get(&self, key: GlyphKey) -> Option<&Glyph> {
        self.glyphs.get(&key)
    }

    /// Lookup for keys the resolver produced. A miss means the merge rules
    /// and the glyph table disagree.
    pub fn glyph(&self, key: GlyphKey) -> Result<&Glyph, ConfigError> {
        self.glyphs.get(&key).ok_or(ConfigError::UnmappedGlyph { key, word: None })
    }

    pub fn contains(&self, key: GlyphKey) -> bool {
        self.glyphs.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::{BlockRasterizer, GLYPH_POINT_SIZE};

    struct Blank;

    impl GlyphRasterizer for Blank {
        fn rasterize(&self, text: &str, _point_size: f32) -> AlphaMask {
            AlphaMask::new(16 * text.chars().count() as u32, 28)
        }
    }

    #[test]
    fn catalog_covers_the_glyph_table() {
        for variant in [ScriptVariant::Current, ScriptVariant::Legacy] {
            let catalog = GlyphCatalog::build(variant, &BlockRasterizer, GLYPH_POINT_SIZE).unwrap();
            assert_eq!(catalog.len(), variant.glyph_specs().len());
            for spec in variant.glyph_specs() {
                assert!(catalog.contains(spec.key));
            }
        }
    }

    #[test]
    fn advance_is_fifteen_sixteenths_of_the_mask() {
        let catalog =
            GlyphCatalog::build(ScriptVariant::Current, &BlockRasterizer, GLYPH_POINT_SIZE).unwrap();
        let diphthong = catalog.get(GlyphKey::pair('a', 'ɪ')).unwrap();
        assert_eq!(diphthong.mask.width(), 32);
        assert_eq!(diphthong.advance, 30);
        assert!(diphthong.has_over_bar && !diphthong.has_dot);

        let short = catalog.get(GlyphKey::single('æ')).unwrap();
        assert_eq!(short.advance, 15);
        assert!(short.has_dot && !short.has_over_bar);
        assert_eq!(catalog.get(GlyphKey::pair('t', 'ʃ')).unwrap().roman, "tx");
    }

    #[test]
    fn unknown_key_is_a_configuration_error() {
        let catalog =
            GlyphCatalog::build(ScriptVariant::Legacy, &BlockRasterizer, GLYPH_POINT_SIZE).unwrap();
        let err = catalog.glyph(GlyphKey::single('a')).unwrap_err();
        assert!(matches!(err, ConfigError::UnmappedGlyph { .. }));
    }

    #[test]
    fn blank_rasterizer_output_is_rejected() {
        let err = GlyphCatalog::build(ScriptVariant::Current, &Blank, GLYPH_POINT_SIZE)
            .err()
            .unwrap();
        assert!(matches!(err, ConfigError::EmptyGlyph { .. }));
    }
}
