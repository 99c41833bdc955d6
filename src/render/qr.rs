//! QR bitmap rendering with a centered logo overlay.
//!
//! The QR is drawn at a fixed nominal edge of 240 device pixels with the
//! highest error-correction level, then a logo patch is composited at its
//! geometric center. The patch (logo edge × 1.22) is painted opaque before
//! the logo lands on top, so the covered modules stay recoverable through
//! error correction.

use image::{Rgba, RgbaImage, imageops};
use qrcode::{Color, EcLevel, QrCode};

use crate::error::EtiquetaError;

/// Nominal QR bitmap edge in device pixels. CSS-equivalent display size is
/// 15 mm; print exports blit it 1:1.
pub const QR_EDGE: u32 = 240;

/// Logo edge as a fraction of the QR edge.
const LOGO_RATIO: f32 = 0.22;
/// Padding around the logo as a fraction of the logo edge.
const LOGO_PAD_RATIO: f32 = 0.22;

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
const RED: Rgba<u8> = Rgba([204, 0, 0, 255]);

/// Render `link` as a 240×240 QR bitmap, compositing `logo` at the center
/// when one is available.
///
/// Fails with [`EtiquetaError::RenderDependency`] when the payload cannot be
/// QR-encoded; callers substitute [`error_tile`] and keep composing.
pub fn render_qr(link: &str, logo: Option<&RgbaImage>) -> Result<RgbaImage, EtiquetaError> {
    let code = QrCode::with_error_correction_level(link.as_bytes(), EcLevel::H)
        .map_err(|e| EtiquetaError::RenderDependency(format!("QR encoding failed: {}", e)))?;

    let modules = code.width();
    let cell = (QR_EDGE as usize / modules).max(1);
    let drawn = (modules * cell) as u32;
    let offset = (QR_EDGE.saturating_sub(drawn)) / 2;

    let mut img = RgbaImage::from_pixel(QR_EDGE, QR_EDGE, WHITE);
    for qy in 0..modules {
        for qx in 0..modules {
            if code[(qx, qy)] != Color::Dark {
                continue;
            }
            for cy in 0..cell {
                for cx in 0..cell {
                    let px = offset + (qx * cell + cx) as u32;
                    let py = offset + (qy * cell + cy) as u32;
                    if px < QR_EDGE && py < QR_EDGE {
                        img.put_pixel(px, py, BLACK);
                    }
                }
            }
        }
    }

    if let Some(logo) = logo {
        overlay_logo(&mut img, logo);
    }

    Ok(img)
}

/// Composite the logo patch at the geometric center of the QR bitmap.
fn overlay_logo(canvas: &mut RgbaImage, logo: &RgbaImage) {
    let edge = canvas.width().min(canvas.height()) as f32;

    let logo_edge = (edge * LOGO_RATIO).round() as u32;
    let pad = (logo_edge as f32 * LOGO_PAD_RATIO).round() as u32;
    let patch_edge = logo_edge + pad;

    let patch_x = ((edge - patch_edge as f32) / 2.0).round() as u32;
    let patch_y = patch_x;
    let logo_x = ((edge - logo_edge as f32) / 2.0).round() as u32;
    let logo_y = logo_x;

    // Opaque patch first, then the logo — smoothing disabled to keep crisp
    // pixel edges at print resolution.
    for py in patch_y..(patch_y + patch_edge).min(canvas.height()) {
        for px in patch_x..(patch_x + patch_edge).min(canvas.width()) {
            canvas.put_pixel(px, py, WHITE);
        }
    }

    let scaled = imageops::resize(logo, logo_edge, logo_edge, imageops::FilterType::Nearest);
    imageops::overlay(canvas, &scaled, logo_x as i64, logo_y as i64);
}

/// Inline error indicator shown in place of a QR bitmap when encoding is
/// unavailable: a bordered tile with a red cross.
pub fn error_tile() -> RgbaImage {
    let mut img = RgbaImage::from_pixel(QR_EDGE, QR_EDGE, WHITE);
    let last = QR_EDGE - 1;

    for i in 0..QR_EDGE {
        for t in 0..4 {
            img.put_pixel(i, t, RED);
            img.put_pixel(i, last - t, RED);
            img.put_pixel(t, i, RED);
            img.put_pixel(last - t, i, RED);
        }
        // Diagonal cross, 3 px thick.
        for t in 0..3 {
            let j = (i + t).min(last);
            img.put_pixel(i, j, RED);
            img.put_pixel(i, last - j.min(last), RED);
        }
    }

    img
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_logo(color: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(32, 32, Rgba(color))
    }

    #[test]
    fn test_qr_has_fixed_edge() {
        let img = render_qr("https://ex.com/p/123", None).unwrap();
        assert_eq!(img.dimensions(), (QR_EDGE, QR_EDGE));
        assert!(img.pixels().any(|p| *p == BLACK));
        assert!(img.pixels().any(|p| *p == WHITE));
    }

    #[test]
    fn test_overlay_geometry() {
        let logo = solid_logo([0, 128, 255, 255]);
        let img = render_qr("https://ex.com/p/123", Some(&logo)).unwrap();

        // Center pixel is logo-colored.
        let center = QR_EDGE / 2;
        assert_eq!(*img.get_pixel(center, center), Rgba([0, 128, 255, 255]));

        // Logo edge = round(240 * 0.22) = 53, pad = round(53 * 0.22) = 12,
        // patch = 65 at round((240-65)/2) = 88. A pixel inside the patch but
        // outside the logo is opaque white.
        assert_eq!(*img.get_pixel(89, 89), WHITE);
        // First pixel of the logo square.
        assert_eq!(*img.get_pixel(94, 94), Rgba([0, 128, 255, 255]));
        // Last pixel of the patch.
        assert_eq!(*img.get_pixel(88 + 64, 88 + 64), WHITE);
    }

    #[test]
    fn test_transparent_logo_shows_patch() {
        let logo = solid_logo([0, 0, 0, 0]);
        let img = render_qr("https://ex.com/p/123", Some(&logo)).unwrap();
        // Fully transparent logo leaves the opaque patch visible.
        let center = QR_EDGE / 2;
        assert_eq!(*img.get_pixel(center, center), WHITE);
    }

    #[test]
    fn test_oversized_payload_is_render_dependency_error() {
        let huge = "x".repeat(8000);
        match render_qr(&huge, None) {
            Err(EtiquetaError::RenderDependency(_)) => {}
            other => panic!("expected RenderDependency, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_error_tile_is_marked() {
        let tile = error_tile();
        assert_eq!(tile.dimensions(), (QR_EDGE, QR_EDGE));
        assert_eq!(*tile.get_pixel(0, 0), RED);
        assert!(tile.pixels().filter(|p| **p == RED).count() > 1000);
    }
}
