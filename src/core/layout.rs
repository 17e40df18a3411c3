// src/core/layout.rs
use crate::core::canvas::Canvas;
use crate::core::engine::{Omissions, Transliterator};
use crate::core::script::ScriptVariant;
use crate::core::segmenter::{next_token, strip_escapes};
use crate::core::types::{Omission, Rgba};
use crate::error::ConfigError;
use crate::raster::{CaptionFont, CAPTION_POINT_SIZE, GLYPH_POINT_SIZE};
use serde::{Deserialize, Serialize};
use std::mem;
use std::ops::Range;

/// Page geometry and colors. The page is split into two equal columns:
/// transliteration on the left, captions on the right.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageConfig {
    pub width: u32,
    pub height: u32,
    pub inset: i32,
    pub line_height: i32,
    pub space_width: i32,
    /// First guideline row, below the inset.
    pub guideline_offset: i32,
    pub background: Rgba,
    pub guide: Rgba,
    pub ink: Rgba,
    pub caption_ink: Rgba,
    pub glyph_point_size: f32,
    pub caption_point_size: f32,
}

impl PageConfig {
    pub fn for_variant(variant: ScriptVariant) -> Self {
        let (inset, ink) = match variant {
            ScriptVariant::Current => (25, Rgba::NAVY),
            ScriptVariant::Legacy => (20, Rgba::GREEN),
        };
        Self {
            width: 256 * 7,
            height: 256 * 5,
            inset,
            line_height: 50,
            space_width: 15,
            guideline_offset: 25,
            background: Rgba::WHITE,
            guide: Rgba::GUIDE,
            ink,
            caption_ink: Rgba::MAROON,
            glyph_point_size: GLYPH_POINT_SIZE,
            caption_point_size: CAPTION_POINT_SIZE,
        }
    }

    /// A word may not end past this x unless it starts the line.
    pub fn column_right(&self) -> i32 {
        self.width as i32 / 2 - self.inset
    }

    pub fn caption_x(&self) -> i32 {
        self.width as i32 / 2 + self.inset
    }

    /// Background, guideline rows and the column divider.
    pub fn blank_canvas(&self) -> Canvas {
        let mut canvas = Canvas::new(self.width, self.height, self.background);
        let (w, h) = (self.width as i32, self.height as i32);
        let mut y = self.inset + self.guideline_offset;
        while y < h {
            canvas.fill_rect(0, y, w, y + 1, self.guide);
            y += self.line_height;
        }
        canvas.fill_rect(w / 2, 0, w / 2 + 1, h, self.guide);
        canvas
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineState {
    AtLineStart,
    MidLine,
    /// The next word does not fit; the line is flushed as a wrapped line.
    LineFull,
    /// No further line fits on the page. Terminal: nothing more is drawn.
    PageFull,
}

/// One wrapped line: where its caption came from in the source text, and
/// what was drawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaidOutLine {
    /// Byte range of the source consumed by this line, newline included.
    pub source: Range<usize>,
    /// The literal text shown beside the line, with escapes and trailing
    /// whitespace stripped.
    pub caption: String,
    pub roman: String,
    pub y: i32,
    /// Ended because the next word did not fit, rather than at a newline
    /// or the end of the text.
    pub wrapped: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutOutcome {
    pub lines: Vec<LaidOutLine>,
    pub omissions: Vec<Omission>,
    pub overflowed: bool,
    pub state: LineState,
}

/// Word-wraps one document onto the left column while slicing the source
/// into the caption lines shown in the right column.
pub struct PageLayout<'a> {
    translit: &'a Transliterator,
    config: &'a PageConfig,
    canvas: Option<&'a mut Canvas>,
    captions: Option<&'a dyn CaptionFont>,
    x: i32,
    y: i32,
    state: LineState,
    line_start: usize,
    roman: String,
    lines: Vec<LaidOutLine>,
    omissions: Omissions,
    overflowed: bool,
}

impl<'a> PageLayout<'a> {
    pub fn new(translit: &'a Transliterator) -> Self {
        let config = translit.config();
        Self {
            translit,
            config,
            canvas: None,
            captions: None,
            x: config.inset,
            y: config.inset,
            state: LineState::AtLineStart,
            line_start: 0,
            roman: String::new(),
            lines: Vec::new(),
            omissions: Omissions::new(),
            overflowed: false,
        }
    }

    /// Draw onto `canvas` instead of only measuring.
    pub fn with_target(mut self, canvas: &'a mut Canvas, captions: &'a dyn CaptionFont) -> Self {
        self.canvas = Some(canvas);
        self.captions = Some(captions);
        self
    }

    pub fn run(mut self, text: &str) -> Result<LayoutOutcome, ConfigError> {
        let case = self.translit.dictionary().case();
        let mut rest = text;

        while let Some(c) = rest.chars().next() {
            let offset = text.len() - rest.len();
            if c == '\n' {
                rest = &rest[1..];
                self.break_line(text, offset + 1);
            } else if c.is_whitespace() {
                self.x += self.config.space_width;
                if !self.roman.is_empty() && !self.roman.ends_with(' ') {
                    self.roman.push(' ');
                }
                rest = &rest[c.len_utf8()..];
            } else {
                let (token, remaining) = next_token(rest, case);
                self.place_word(text, offset, &token)?;
                rest = remaining;
            }
        }

        if self.line_start < text.len() {
            self.flush_caption(text, text.len());
        }

        Ok(LayoutOutcome {
            lines: self.lines,
            omissions: self.omissions.into_vec(),
            overflowed: self.overflowed,
            state: self.state,
        })
    }

    fn place_word(&mut self, text: &str, offset: usize, token: &str) -> Result<(), ConfigError> {
        let translit = self.translit;
        let seen = self.omissions.as_slice().len();
        let word = translit.measure_word(token, self.x, &mut self.omissions)?;
        if self.canvas.is_some() {
            for omission in &self.omissions.as_slice()[seen..] {
                log::warn!("{}", omission);
            }
        }

        if self.x > self.config.inset && word.end > self.config.column_right() {
            self.state = LineState::LineFull;
            log::debug!("{:?} before {:?} at y={}", self.state, token, self.y);
            self.break_line(text, offset);
        }

        let dst = match self.state {
            LineState::PageFull => None,
            _ => self.canvas.as_deref_mut(),
        };
        self.x = translit.renderer().draw(dst, self.x, self.y, &word.glyphs)?;
        self.roman.push_str(&translit.romanize(&word.glyphs));
        if self.state != LineState::PageFull {
            self.state = LineState::MidLine;
        }
        Ok(())
    }

    /// Ends the current line at byte `end` of the source and moves the
    /// cursor to the start of the next one.
    fn break_line(&mut self, text: &str, end: usize) {
        self.flush_caption(text, end);
        self.x = self.config.inset;
        self.y += self.config.line_height;

        if self.overflowed {
            self.state = LineState::PageFull;
            return;
        }
        if self.y + self.config.line_height > self.config.height as i32 {
            log::warn!("page full at y={}; the rest of the document is not drawn", self.y);
            self.state = LineState::PageFull;
            self.overflowed = true;
        } else {
            self.state = LineState::AtLineStart;
        }
    }

    fn flush_caption(&mut self, text: &str, end: usize) {
        let raw = &text[self.line_start..end];
        let caption = strip_escapes(raw.trim_end());

        if !self.overflowed {
            if let (Some(canvas), Some(font)) = (self.canvas.as_deref_mut(), self.captions) {
                font.draw_text(canvas, self.config.caption_x(), self.y, self.config.caption_ink, &caption);
            }
        }

        let roman = mem::take(&mut self.roman);
        self.lines.push(LaidOutLine {
            source: self.line_start..end,
            caption,
            roman: roman.trim_end().to_string(),
            y: self.y,
            wrapped: self.state == LineState::LineFull,
        });
        self.line_start = end;
    }
}
