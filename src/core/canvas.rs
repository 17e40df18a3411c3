// src/core/canvas.rs
use crate::core::types::Rgba;

/// An 8-bit opacity bitmap, as produced by the glyph rasterizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlphaMask {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl AlphaMask {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, pixels: vec![0; (width * height) as usize] }
    }

    pub fn from_pixels(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        (pixels.len() == (width * height) as usize).then_some(Self { width, height, pixels })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, x: u32, y: u32) -> u8 {
        if x < self.width && y < self.height {
            self.pixels[(y * self.width + x) as usize]
        } else {
            0
        }
    }

    /// Out-of-bounds writes are clipped.
    pub fn set(&mut self, x: i32, y: i32, alpha: u8) {
        if x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height {
            self.pixels[(y as u32 * self.width + x as u32) as usize] = alpha;
        }
    }

    pub fn is_blank(&self) -> bool {
        self.pixels.iter().all(|&a| a == 0)
    }
}

/// The fixed-size RGBA page every glyph and caption is drawn onto. Pixels
/// are premultiplied; anything drawn outside the bounds is clipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Canvas {
    pub fn new(width: u32, height: u32, background: Rgba) -> Self {
        let pixels = background.0.repeat((width * height) as usize);
        Self { width, height, pixels }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn offset(&self, x: i32, y: i32) -> Option<usize> {
        if x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height {
            Some(((y as u32 * self.width + x as u32) * 4) as usize)
        } else {
            None
        }
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgba> {
        self.offset(x, y).map(|i| {
            let mut px = [0; 4];
            px.copy_from_slice(&self.pixels[i..i + 4]);
            Rgba(px)
        })
    }

    pub fn set(&mut self, x: i32, y: i32, color: Rgba) {
        if let Some(i) = self.offset(x, y) {
            self.pixels[i..i + 4].copy_from_slice(&color.0);
        }
    }

    /// Fills the half-open rectangle `[x0, x1) × [y0, y1)`.
    pub fn fill_rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgba) {
        for y in y0.max(0)..y1.min(self.height as i32) {
            for x in x0.max(0)..x1.min(self.width as i32) {
                self.set(x, y, color);
            }
        }
    }

    /// Paints `color` through `mask` over the existing pixels, with the
    /// mask's top-left corner at `(x, y)`.
    pub fn draw_mask(&mut self, x: i32, y: i32, mask: &AlphaMask, color: Rgba) {
        for my in 0..mask.height() {
            for mx in 0..mask.width() {
                let m = mask.get(mx, my) as u32;
                if m == 0 {
                    continue;
                }
                let Some(i) = self.offset(x + mx as i32, y + my as i32) else {
                    continue;
                };
                let src_alpha = color.0[3] as u32 * m / 255;
                for (c, &s) in color.0.iter().enumerate() {
                    let d = self.pixels[i + c] as u32;
                    let out = (s as u32 * m + d * (255 - src_alpha) + 127) / 255;
                    self.pixels[i + c] = out.min(255) as u8;
                }
            }
        }
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opaque_mask_replaces_destination() {
        let mut canvas = Canvas::new(4, 4, Rgba::WHITE);
        let mask = AlphaMask::from_pixels(1, 1, vec![255]).unwrap();
        canvas.draw_mask(1, 2, &mask, Rgba::NAVY);
        assert_eq!(canvas.pixel(1, 2), Some(Rgba::NAVY));
        assert_eq!(canvas.pixel(0, 0), Some(Rgba::WHITE));
    }

    #[test]
    fn partial_alpha_blends_over_destination() {
        let mut canvas = Canvas::new(1, 1, Rgba::WHITE);
        let mask = AlphaMask::from_pixels(1, 1, vec![128]).unwrap();
        canvas.draw_mask(0, 0, &mask, Rgba::opaque(0, 0, 0));
        let Rgba([r, g, b, a]) = canvas.pixel(0, 0).unwrap();
        assert_eq!((r, g, b, a), (127, 127, 127, 255));
    }

    #[test]
    fn drawing_is_clipped_to_the_page() {
        let mut canvas = Canvas::new(2, 2, Rgba::WHITE);
        let mut mask = AlphaMask::new(4, 4);
        for y in 0..4 {
            for x in 0..4 {
                mask.set(x, y, 255);
            }
        }
        canvas.draw_mask(-1, -1, &mask, Rgba::MAROON);
        canvas.fill_rect(-5, -5, 10, 1, Rgba::GUIDE);
        canvas.set(7, 7, Rgba::NAVY);
        assert_eq!(canvas.pixel(0, 0), Some(Rgba::GUIDE));
        assert_eq!(canvas.pixel(1, 1), Some(Rgba::MAROON));
        assert_eq!(canvas.pixel(2, 2), None);
    }

    #[test]
    fn mask_rejects_wrong_pixel_count() {
        assert!(AlphaMask::from_pixels(2, 2, vec![0; 3]).is_none());
        assert!(AlphaMask::new(3, 2).is_blank());
    }
}
