// src/raster.rs
//! Font collaborators. The engine never rasterizes text itself: the glyph
//! catalog asks a [`GlyphRasterizer`] for one mask per glyph key, and
//! captions go through a [`CaptionFont`].
use crate::core::canvas::{AlphaMask, Canvas};
use crate::core::types::Rgba;
use crate::error::{ConfigError, Result};
use fontdue::{Font, FontSettings};
use std::fs;
use std::path::Path;

/// Point size of the phonetic glyphs.
pub const GLYPH_POINT_SIZE: f32 = 26.65;
/// Point size of the literal caption lines.
pub const CAPTION_POINT_SIZE: f32 = 26.5;

pub trait GlyphRasterizer {
    /// Renders `text` as a single mask. Masks for the same point size share
    /// one height.
    fn rasterize(&self, text: &str, point_size: f32) -> AlphaMask;
}

pub trait CaptionFont {
    /// Draws `text` with the top of its line box at `(x, y)`.
    fn draw_text(&self, dst: &mut Canvas, x: i32, y: i32, color: Rgba, text: &str);
}

impl<R: GlyphRasterizer + ?Sized> GlyphRasterizer for Box<R> {
    fn rasterize(&self, text: &str, point_size: f32) -> AlphaMask {
        (**self).rasterize(text, point_size)
    }
}

/// A deterministic monospace rasterizer that draws every character as an
/// outlined cell with a per-character crossbar. Cells are sized from the
/// point size the way a 72 DPI monospace face would be.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockRasterizer;

impl BlockRasterizer {
    pub fn cell_size(point_size: f32) -> (u32, u32) {
        let width = (point_size * 0.6).round().max(1.0) as u32;
        let height = (point_size * 1.05).round().max(1.0) as u32;
        (width, height)
    }

    fn draw_cell(mask: &mut AlphaMask, x0: i32, width: i32, height: i32, c: char) {
        let (left, right) = (x0 + 3, x0 + width - 3);
        let (top, bottom) = (height / 4, height - 2);
        for y in top..bottom {
            for x in left..right {
                let edge = y < top + 2 || y >= bottom - 2 || x < left + 2 || x >= right - 2;
                if edge {
                    mask.set(x, y, 0xFF);
                }
            }
        }
        let bar = top + 2 + (c as i32 % (bottom - top - 4).max(1));
        for x in left..right {
            mask.set(x, bar, 0xC0);
        }
    }
}

impl GlyphRasterizer for BlockRasterizer {
    fn rasterize(&self, text: &str, point_size: f32) -> AlphaMask {
        let (cell_w, cell_h) = Self::cell_size(point_size);
        let count = text.chars().count() as u32;
        let mut mask = AlphaMask::new(cell_w * count, cell_h);
        for (i, c) in text.chars().enumerate() {
            if !c.is_whitespace() {
                Self::draw_cell(&mut mask, (i as u32 * cell_w) as i32, cell_w as i32, cell_h as i32, c);
            }
        }
        mask
    }
}

/// Rasterizes through a TrueType/OpenType face, one pixel per point.
///
/// Every mask is one line box tall (ascent to descent), with the baseline
/// at the same row, and as wide as the summed advances of its characters.
pub struct FontRasterizer {
    font: Font,
}

impl FontRasterizer {
    pub fn from_bytes(bytes: Vec<u8>) -> std::result::Result<Self, ConfigError> {
        let font = Font::from_bytes(bytes, FontSettings::default())
            .map_err(|e| ConfigError::Font(e.to_string()))?;
        Ok(Self { font })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let rasterizer = Self::from_bytes(fs::read(path)?)?;
        log::debug!(
            "loaded {} glyphs from {}",
            rasterizer.font.glyph_count(),
            path.display()
        );
        Ok(rasterizer)
    }

    /// Ascent and descent in pixels; descent is negative.
    fn line_box(&self, px: f32) -> (f32, f32) {
        match self.font.horizontal_line_metrics(px) {
            Some(m) => (m.ascent, m.descent),
            None => (px * 0.8, -px * 0.2),
        }
    }
}

impl GlyphRasterizer for FontRasterizer {
    fn rasterize(&self, text: &str, point_size: f32) -> AlphaMask {
        let (ascent, descent) = self.line_box(point_size);
        let baseline = ascent.ceil() as i32;
        let height = (ascent - descent).ceil().max(1.0) as u32;
        let advance: f32 = text.chars().map(|c| self.font.metrics(c, point_size).advance_width).sum();
        let mut mask = AlphaMask::new(advance.ceil().max(0.0) as u32, height);

        let mut pen = 0.0f32;
        for c in text.chars() {
            let (m, coverage) = self.font.rasterize(c, point_size);
            let left = pen.round() as i32 + m.xmin;
            let top = baseline - (m.ymin + m.height as i32);
            for (i, &alpha) in coverage.iter().enumerate() {
                if alpha == 0 {
                    continue;
                }
                let (x, y) = (left + (i % m.width) as i32, top + (i / m.width) as i32);
                // Neighbouring glyphs may overlap by a pixel.
                let prev = if x >= 0 && y >= 0 { mask.get(x as u32, y as u32) } else { 0 };
                mask.set(x, y, alpha.max(prev));
            }
            pen += m.advance_width;
        }
        mask
    }
}

/// Draws captions through a [`GlyphRasterizer`], one mask per caption.
pub struct RasterCaptionFont<R> {
    rasterizer: R,
    point_size: f32,
}

impl<R: GlyphRasterizer> RasterCaptionFont<R> {
    pub fn new(rasterizer: R, point_size: f32) -> Self {
        Self { rasterizer, point_size }
    }
}

impl<R: GlyphRasterizer> CaptionFont for RasterCaptionFont<R> {
    fn draw_text(&self, dst: &mut Canvas, x: i32, y: i32, color: Rgba, text: &str) {
        let mask = self.rasterizer.rasterize(text, self.point_size);
        dst.draw_mask(x, y, &mask, color);
    }
}
