//! Bitmap font glyphs for label text.
//!
//! Uses the Spleen bitmap font family for crisp text at print resolution.

use spleen_font::{FONT_6X12, FONT_8X16, PSF2Font};

/// Fonts used on a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelFont {
    /// Header text (order id, frame code): Spleen 8×16.
    Header,
    /// Small text (the date beside the QR): Spleen 6×12.
    Small,
}

impl LabelFont {
    pub fn char_width(&self) -> usize {
        match self {
            LabelFont::Header => 8,
            LabelFont::Small => 6,
        }
    }

    pub fn char_height(&self) -> usize {
        match self {
            LabelFont::Header => 16,
            LabelFont::Small => 12,
        }
    }
}

/// Generate a glyph bitmap for a character.
/// Returns a Vec<u8> where each byte is 0 (blank) or 1 (ink).
pub fn glyph(font: LabelFont, ch: char) -> Vec<u8> {
    let width = font.char_width();
    let height = font.char_height();
    let mut bitmap = vec![0u8; width * height];
    let utf8 = ch.to_string();

    let found = match font {
        LabelFont::Header => {
            let mut spleen = PSF2Font::new(FONT_8X16).unwrap();
            match spleen.glyph_for_utf8(utf8.as_bytes()) {
                Some(rows) => {
                    fill_bitmap(&mut bitmap, width, rows);
                    true
                }
                None => false,
            }
        }
        LabelFont::Small => {
            let mut spleen = PSF2Font::new(FONT_6X12).unwrap();
            match spleen.glyph_for_utf8(utf8.as_bytes()) {
                Some(rows) => {
                    fill_bitmap(&mut bitmap, width, rows);
                    true
                }
                None => false,
            }
        }
    };

    if !found {
        // Fallback: draw a box for unknown chars
        draw_box(&mut bitmap, width, height);
    }

    bitmap
}

fn fill_bitmap(
    bitmap: &mut [u8],
    width: usize,
    rows: impl Iterator<Item = impl Iterator<Item = bool>>,
) {
    for (y, row) in rows.enumerate() {
        for (x, on) in row.enumerate() {
            let idx = y * width + x;
            if idx < bitmap.len() {
                bitmap[idx] = if on { 1 } else { 0 };
            }
        }
    }
}

/// Draw a box outline in the glyph buffer.
fn draw_box(bitmap: &mut [u8], width: usize, height: usize) {
    for x in 0..width {
        bitmap[x] = 1;
        bitmap[(height - 1) * width + x] = 1;
    }
    for y in 0..height {
        bitmap[y * width] = 1;
        bitmap[y * width + width - 1] = 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glyph_dimensions() {
        let g = glyph(LabelFont::Header, 'A');
        assert_eq!(g.len(), 8 * 16);
        assert!(g.iter().any(|&p| p != 0));

        let g = glyph(LabelFont::Small, '5');
        assert_eq!(g.len(), 6 * 12);
        assert!(g.iter().any(|&p| p != 0));
    }

    #[test]
    fn test_unknown_char_gets_box() {
        // A private-use codepoint should not be in Spleen; the fallback is a
        // box outline with ink on the edges.
        let g = glyph(LabelFont::Header, '\u{E000}');
        assert_eq!(g[0], 1);
        assert_eq!(g[7], 1);
    }
}
