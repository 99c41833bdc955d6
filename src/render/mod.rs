//! # Label Rasterization
//!
//! The adapter between a composed [`LabelView`] and concrete pixels. The
//! nominal label raster is 420×140 px (105×35 mm at 4 px/mm); exports render
//! at an integer oversampling of that grid for print fidelity.
//!
//! ```text
//! LabelView → LabelRasterizer → RgbaImage
//!                  ↓
//!            per column:
//!            - header lines (bitmap font)
//!            - QR bitmap w/ logo overlay
//!            - rotated date beside the QR
//! ```

pub mod canvas;
pub mod font;
pub mod qr;

use image::RgbaImage;
use std::sync::Arc;
use tracing::error;

use crate::compose::LabelView;
use crate::error::EtiquetaError;
use crate::surface::BorderStyle;
use canvas::Canvas;

/// Physical label size.
pub const LABEL_WIDTH_MM: f32 = 105.0;
pub const LABEL_HEIGHT_MM: f32 = 35.0;

/// Nominal raster density: 4 px/mm, i.e. a 420×140 base grid.
pub const BASE_PX_PER_MM: u32 = 4;
/// Print exports oversample the nominal grid by this factor.
pub const EXPORT_SCALE: u32 = 4;

/// Nominal on-screen QR edge: 15 mm at 4 px/mm. At [`EXPORT_SCALE`] this is
/// exactly [`qr::QR_EDGE`], so the QR bitmap lands 1:1 in print output.
const QR_DISPLAY_EDGE: u32 = 60;

// Column layout in nominal pixels.
const HEADER_X: u32 = 14;
const HEADER_Y: u32 = 10;
const HEADER_LINE_GAP: u32 = 4;
const QR_X: u32 = 40;
const QR_Y: u32 = 66;
const DATE_GAP: u32 = 10;

/// Rasterization options for one pass.
#[derive(Debug, Clone, Copy)]
pub struct RasterOptions {
    /// Integer multiplier over the nominal 420×140 grid.
    pub scale: u32,
    /// Border decoration; capture passes strip it.
    pub border: BorderStyle,
}

/// The seam between composed views and pixels. Production uses
/// [`LabelRasterizer`]; tests substitute failing stubs to exercise export
/// state restoration.
pub trait Rasterizer: Send + Sync {
    fn rasterize(&self, view: &LabelView, opts: &RasterOptions)
    -> Result<RgbaImage, EtiquetaError>;
}

/// Renders label views onto an RGBA canvas using the Spleen bitmap fonts and
/// the QR renderer.
pub struct LabelRasterizer {
    logo: Option<Arc<RgbaImage>>,
}

impl LabelRasterizer {
    /// `logo` is the shared, memoized logo image; `None` renders QR codes
    /// without an overlay.
    pub fn new(logo: Option<Arc<RgbaImage>>) -> Self {
        Self { logo }
    }

    fn draw_column(
        &self,
        canvas: &mut Canvas,
        column: &crate::compose::LabelColumn,
        x0: u32,
        column_width: u32,
        scale: u32,
    ) {
        let max_x = x0 + column_width * scale - HEADER_X * scale;
        let header_line_height = font::LabelFont::Header.char_height() as u32 + HEADER_LINE_GAP;

        let mut y = HEADER_Y * scale;
        for line in &column.header {
            canvas.draw_text(
                line,
                x0 + HEADER_X * scale,
                y,
                font::LabelFont::Header,
                scale,
                max_x,
                canvas::BLACK,
            );
            y += header_line_height * scale;
        }

        // Each column gets its own QR draw; both encode the identical link.
        let qr_bitmap = match qr::render_qr(&column.qr_link, self.logo.as_deref()) {
            Ok(bitmap) => bitmap,
            Err(e) => {
                error!("QR render unavailable, substituting error tile: {}", e);
                qr::error_tile()
            }
        };
        let qr_edge = QR_DISPLAY_EDGE * scale;
        canvas.blit_scaled(&qr_bitmap, x0 + QR_X * scale, QR_Y * scale, qr_edge, qr_edge);

        canvas.draw_text_rotated(
            &column.date,
            x0 + (QR_X + QR_DISPLAY_EDGE + DATE_GAP) * scale,
            QR_Y * scale,
            font::LabelFont::Small,
            scale,
            (QR_Y + QR_DISPLAY_EDGE) * scale,
            canvas::BLACK,
        );
    }
}

impl Rasterizer for LabelRasterizer {
    fn rasterize(
        &self,
        view: &LabelView,
        opts: &RasterOptions,
    ) -> Result<RgbaImage, EtiquetaError> {
        if view.columns.is_empty() {
            return Err(EtiquetaError::Rasterization(
                "label view has no columns".to_string(),
            ));
        }

        let scale = opts.scale.max(1);
        let width = LABEL_WIDTH_MM as u32 * BASE_PX_PER_MM * scale;
        let height = LABEL_HEIGHT_MM as u32 * BASE_PX_PER_MM * scale;
        let column_width = LABEL_WIDTH_MM as u32 * BASE_PX_PER_MM / view.columns.len() as u32;

        let mut canvas = Canvas::new(width, height);

        for (i, column) in view.columns.iter().enumerate() {
            let x0 = i as u32 * column_width * scale;
            self.draw_column(&mut canvas, column, x0, column_width, scale);
        }

        if opts.border == BorderStyle::Dashed {
            canvas.draw_dashed_border(scale, canvas::BORDER_GRAY);
        }

        Ok(canvas.into_image())
    }
}
