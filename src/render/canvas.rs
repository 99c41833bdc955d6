//! RGBA pixel canvas used by the label rasterizer.

use image::{Rgba, RgbaImage};

use super::font::{self, LabelFont};

pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
/// Border color matching the on-screen dashed outline (#cbd5e1).
pub const BORDER_GRAY: Rgba<u8> = Rgba([203, 213, 225, 255]);

/// A bounded drawing canvas. All drawing operations clip at the edges.
pub struct Canvas {
    img: RgbaImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            img: RgbaImage::from_pixel(width, height, WHITE),
        }
    }

    pub fn width(&self) -> u32 {
        self.img.width()
    }

    pub fn height(&self) -> u32 {
        self.img.height()
    }

    pub fn into_image(self) -> RgbaImage {
        self.img
    }

    pub fn put_pixel(&mut self, x: u32, y: u32, color: Rgba<u8>) {
        if x < self.img.width() && y < self.img.height() {
            self.img.put_pixel(x, y, color);
        }
    }

    pub fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: Rgba<u8>) {
        for py in y..y.saturating_add(h) {
            for px in x..x.saturating_add(w) {
                self.put_pixel(px, py, color);
            }
        }
    }

    /// Dashed rectangle outline around the full canvas.
    pub fn draw_dashed_border(&mut self, thickness: u32, color: Rgba<u8>) {
        let (w, h) = (self.width(), self.height());
        // Dash pattern: 16 on, 8 off.
        let dash = |i: u32| (i / 8) % 3 != 2;

        for x in 0..w {
            if dash(x) {
                for t in 0..thickness {
                    self.put_pixel(x, t, color);
                    self.put_pixel(x, h.saturating_sub(1 + t), color);
                }
            }
        }
        for y in 0..h {
            if dash(y) {
                for t in 0..thickness {
                    self.put_pixel(t, y, color);
                    self.put_pixel(w.saturating_sub(1 + t), y, color);
                }
            }
        }
    }

    /// Blit `src` scaled to `w`×`h` at (x, y) using nearest-neighbor
    /// sampling, keeping pixel edges crisp.
    pub fn blit_scaled(&mut self, src: &RgbaImage, x: u32, y: u32, w: u32, h: u32) {
        if src.width() == 0 || src.height() == 0 || w == 0 || h == 0 {
            return;
        }
        for dy in 0..h {
            for dx in 0..w {
                let sx = (dx as u64 * src.width() as u64 / w as u64) as u32;
                let sy = (dy as u64 * src.height() as u64 / h as u64) as u32;
                self.put_pixel(x + dx, y + dy, *src.get_pixel(sx, sy));
            }
        }
    }

    /// Draw a line of text with each glyph pixel scaled to `scale`×`scale`.
    /// Stops at `max_x` so text never bleeds into the neighboring column.
    pub fn draw_text(
        &mut self,
        text: &str,
        x: u32,
        y: u32,
        font: LabelFont,
        scale: u32,
        max_x: u32,
        color: Rgba<u8>,
    ) {
        let char_width = font.char_width();
        let char_height = font.char_height();
        let cell_w = char_width as u32 * scale;
        let mut cursor = x;

        for ch in text.chars() {
            if cursor + cell_w > max_x {
                break;
            }
            let bitmap = font::glyph(font, ch);
            for gy in 0..char_height {
                for gx in 0..char_width {
                    if bitmap[gy * char_width + gx] != 0 {
                        self.fill_rect(
                            cursor + gx as u32 * scale,
                            y + gy as u32 * scale,
                            scale,
                            scale,
                            color,
                        );
                    }
                }
            }
            cursor += cell_w;
        }
    }

    /// Draw text rotated 90° clockwise, reading top to bottom. Used for the
    /// date running alongside the QR code.
    pub fn draw_text_rotated(
        &mut self,
        text: &str,
        x: u32,
        y: u32,
        font: LabelFont,
        scale: u32,
        max_y: u32,
        color: Rgba<u8>,
    ) {
        let char_width = font.char_width();
        let char_height = font.char_height();
        // After rotation each char cell is char_height wide, char_width tall.
        let cell_h = char_width as u32 * scale;
        let mut cursor = y;

        for ch in text.chars() {
            if cursor + cell_h > max_y {
                break;
            }
            let bitmap = font::glyph(font, ch);
            for gy in 0..char_height {
                for gx in 0..char_width {
                    if bitmap[gy * char_width + gx] != 0 {
                        let rx = (char_height - 1 - gy) as u32;
                        let ry = gx as u32;
                        self.fill_rect(x + rx * scale, cursor + ry * scale, scale, scale, color);
                    }
                }
            }
            cursor += cell_h;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_canvas_is_white() {
        let canvas = Canvas::new(4, 4);
        let img = canvas.into_image();
        assert!(img.pixels().all(|p| *p == WHITE));
    }

    #[test]
    fn test_drawing_clips_at_edges() {
        let mut canvas = Canvas::new(4, 4);
        canvas.fill_rect(2, 2, 10, 10, BLACK);
        let img = canvas.into_image();
        assert_eq!(*img.get_pixel(3, 3), BLACK);
        assert_eq!(*img.get_pixel(1, 1), WHITE);
    }

    #[test]
    fn test_blit_scaled_identity() {
        let mut src = RgbaImage::from_pixel(2, 2, WHITE);
        src.put_pixel(0, 0, Rgba([1, 2, 3, 255]));

        let mut canvas = Canvas::new(2, 2);
        canvas.blit_scaled(&src, 0, 0, 2, 2);
        assert_eq!(*canvas.into_image().get_pixel(0, 0), Rgba([1, 2, 3, 255]));
    }

    #[test]
    fn test_blit_scaled_upscales_nearest() {
        let src = RgbaImage::from_pixel(1, 1, BLACK);

        let mut canvas = Canvas::new(4, 4);
        canvas.blit_scaled(&src, 0, 0, 4, 4);
        let img = canvas.into_image();
        assert!(img.pixels().all(|p| *p == BLACK));
    }

    #[test]
    fn test_text_respects_clip_limit() {
        let mut canvas = Canvas::new(100, 30);
        // max_x below one glyph cell: nothing may be drawn.
        canvas.draw_text("AAAA", 0, 0, LabelFont::Header, 1, 4, BLACK);
        assert!(canvas.into_image().pixels().all(|p| *p == WHITE));
    }

    #[test]
    fn test_rotated_text_draws_ink() {
        let mut canvas = Canvas::new(20, 40);
        canvas.draw_text_rotated("05", 0, 0, LabelFont::Small, 1, 40, BLACK);
        let img = canvas.into_image();
        assert!(img.pixels().any(|p| *p == BLACK));
    }
}
