// src/core/renderer.rs
use crate::core::canvas::Canvas;
use crate::core::catalog::GlyphCatalog;
use crate::core::script::Decorations;
use crate::core::types::{ResolvedGlyph, Rgba};
use crate::error::ConfigError;

/// Offsets of the 16 pixels making up a dot decoration.
#[rustfmt::skip]
const DOT: [(i32, i32); 16] = [
    (7, 0), (8, 0),
    (6, 1), (7, 1), (8, 1), (9, 1),
    (6, 2), (7, 2), (8, 2), (9, 2),
    (6, 3), (7, 3), (8, 3), (9, 3),
    (7, 4), (8, 4),
];

/// An over-bar waiting for the end of its run of barred glyphs.
#[derive(Debug, Clone, Copy)]
struct BarRun {
    x0: i32,
    /// Right edge of the last glyph in the run so far.
    x_end: i32,
    y: i32,
}

/// Places a word's glyphs left to right, decorating them as it goes. The
/// same code path measures (no canvas) and draws, so a dry run always
/// predicts the committed advance.
pub struct WordRenderer<'a> {
    catalog: &'a GlyphCatalog,
    decorations: Decorations,
    ink: Rgba,
}

impl<'a> WordRenderer<'a> {
    pub fn new(catalog: &'a GlyphCatalog, ink: Rgba) -> Self {
        Self { catalog, decorations: catalog.variant().decorations(), ink }
    }

    pub fn measure(&self, x: i32, glyphs: &[ResolvedGlyph]) -> Result<i32, ConfigError> {
        self.draw(None, x, 0, glyphs)
    }

    /// Draws `glyphs` with the first glyph's origin at `(x, y)` and returns
    /// the cursor position after the last one. With `dst` absent nothing is
    /// drawn.
    pub fn draw(
        &self,
        mut dst: Option<&mut Canvas>,
        x: i32,
        y: i32,
        glyphs: &[ResolvedGlyph],
    ) -> Result<i32, ConfigError> {
        let variant = self.catalog.variant();
        let mut x = x;
        let mut bar: Option<BarRun> = None;

        for g in glyphs {
            let glyph = self.catalog.glyph(g.key)?;

            if !glyph.has_over_bar || g.breaks_bar {
                if let Some(run) = bar.take() {
                    self.draw_bar(dst.as_deref_mut(), run);
                }
            }
            if glyph.has_over_bar {
                let x_end = if self.decorations.bar_to_mask_edge {
                    x + glyph.mask.width() as i32
                } else {
                    x + glyph.advance
                };
                match bar.as_mut() {
                    Some(run) => run.x_end = x_end,
                    None => {
                        let mut bar_y = y + g.drop + self.decorations.bar_y;
                        if variant.is_vowel(g.key.primary) {
                            bar_y += self.decorations.vowel_bar_lift;
                        }
                        bar = Some(BarRun { x0: x + self.decorations.bar_inset_left, x_end, y: bar_y });
                    }
                }
            }

            if let Some(canvas) = dst.as_deref_mut() {
                canvas.draw_mask(x, y + g.drop, &glyph.mask, self.ink);
                if glyph.has_dot {
                    self.draw_dot(canvas, x, y + g.drop + self.decorations.high_dot_y);
                }
                if g.stressed {
                    self.draw_dot(canvas, x, y + self.decorations.stress_dot_y);
                }
            }

            x += glyph.advance;
        }

        if let Some(run) = bar {
            self.draw_bar(dst, run);
        }
        Ok(x)
    }

    fn draw_dot(&self, canvas: &mut Canvas, x: i32, y: i32) {
        for (dx, dy) in DOT {
            canvas.set(x + dx, y + dy, self.ink);
        }
    }

    /// Two rows from the run's start to just short of its end, with a short
    /// tick under the right end.
    fn draw_bar(&self, dst: Option<&mut Canvas>, run: BarRun) {
        let Some(canvas) = dst else {
            return;
        };
        let x1 = run.x_end - self.decorations.bar_inset_right;
        canvas.fill_rect(run.x0, run.y, x1, run.y + 2, self.ink);
        canvas.fill_rect(x1 - 2, run.y + 2, x1, run.y + 3, self.ink);
    }
}
