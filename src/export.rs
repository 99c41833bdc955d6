//! # Rasterization & Export Engine
//!
//! Converts a mounted label surface into a downloadable PDF or PNG. Both
//! paths are symmetric: enter the transient capture state (border stripped),
//! rasterize at 4× oversampling, encode, and always restore the prior visual
//! state — on success and on every failure path alike.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbaImage};
use pdf_writer::{Content, Filter, Finish, Name, Pdf, Rect, Ref};

use crate::error::EtiquetaError;
use crate::label;
use crate::render::{EXPORT_SCALE, LABEL_HEIGHT_MM, LABEL_WIDTH_MM, RasterOptions, Rasterizer};
use crate::surface::Surface;

/// JPEG quality for the raster embedded in PDF pages.
const PDF_JPEG_QUALITY: u8 = 95;

const MM_TO_PT: f32 = 72.0 / 25.4;

/// Requested output kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Pdf,
    Png,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Png => "png",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Png => "image/png",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = EtiquetaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pdf" => Ok(ExportFormat::Pdf),
            "png" => Ok(ExportFormat::Png),
            other => Err(EtiquetaError::Validation(format!(
                "unknown export format: {}",
                other
            ))),
        }
    }
}

/// A finished export: bytes plus the deterministic filename.
#[derive(Debug, Clone)]
pub struct ExportedFile {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Drives the capture → rasterize → encode → restore cycle.
pub struct ExportEngine<R: Rasterizer> {
    rasterizer: R,
}

impl<R: Rasterizer> ExportEngine<R> {
    pub fn new(rasterizer: R) -> Self {
        Self { rasterizer }
    }

    /// Export the surface's mounted label.
    ///
    /// Refuses with [`EtiquetaError::ExportPrecondition`] (zero side
    /// effects) when nothing is mounted. The capture state entered before
    /// rasterization is restored on every exit path.
    pub fn export(
        &self,
        surface: &mut Surface,
        format: ExportFormat,
    ) -> Result<ExportedFile, EtiquetaError> {
        if surface.is_empty() {
            return Err(EtiquetaError::ExportPrecondition(
                "generate the label preview first".to_string(),
            ));
        }

        let prior_border = surface.enter_capture();
        let result = self.capture(surface, format);
        surface.exit_capture(prior_border);
        result
    }

    fn capture(
        &self,
        surface: &Surface,
        format: ExportFormat,
    ) -> Result<ExportedFile, EtiquetaError> {
        let (view, record) = match (surface.view(), surface.record()) {
            (Some(view), Some(record)) => (view, record),
            _ => {
                return Err(EtiquetaError::ExportPrecondition(
                    "surface emptied during export".to_string(),
                ));
            }
        };

        let opts = RasterOptions {
            scale: EXPORT_SCALE,
            border: surface.border(),
        };
        let raster = self.rasterizer.rasterize(view, &opts)?;

        let bytes = match format {
            ExportFormat::Png => encode_png(&raster)?,
            ExportFormat::Pdf => encode_pdf(&raster)?,
        };

        Ok(ExportedFile {
            filename: label::export_filename(&record.order_id, format.extension()),
            content_type: format.content_type(),
            bytes,
        })
    }
}

/// Lossless PNG encoding of the raster.
pub(crate) fn encode_png(raster: &RgbaImage) -> Result<Vec<u8>, EtiquetaError> {
    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes)
        .write_image(
            raster.as_raw(),
            raster.width(),
            raster.height(),
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| EtiquetaError::Encoding(format!("PNG encoding failed: {}", e)))?;
    Ok(bytes)
}

/// Single landscape page of fixed physical size (105×35 mm) with the raster
/// embedded as one JPEG image filling the page.
fn encode_pdf(raster: &RgbaImage) -> Result<Vec<u8>, EtiquetaError> {
    let rgb = image::DynamicImage::ImageRgba8(raster.clone()).to_rgb8();

    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, PDF_JPEG_QUALITY)
        .write_image(
            rgb.as_raw(),
            rgb.width(),
            rgb.height(),
            ExtendedColorType::Rgb8,
        )
        .map_err(|e| EtiquetaError::Encoding(format!("JPEG encoding failed: {}", e)))?;

    let page_w = LABEL_WIDTH_MM * MM_TO_PT;
    let page_h = LABEL_HEIGHT_MM * MM_TO_PT;

    let catalog_id = Ref::new(1);
    let page_tree_id = Ref::new(2);
    let page_id = Ref::new(3);
    let image_id = Ref::new(4);
    let content_id = Ref::new(5);
    let image_name = Name(b"Im1");

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(page_tree_id);
    pdf.pages(page_tree_id).kids([page_id]).count(1);

    let mut page = pdf.page(page_id);
    page.media_box(Rect::new(0.0, 0.0, page_w, page_h));
    page.parent(page_tree_id);
    page.contents(content_id);
    page.resources().x_objects().pair(image_name, image_id);
    page.finish();

    let mut image = pdf.image_xobject(image_id, &jpeg);
    image.filter(Filter::DctDecode);
    image.width(rgb.width() as i32);
    image.height(rgb.height() as i32);
    image.color_space().device_rgb();
    image.bits_per_component(8);
    image.finish();

    let mut content = Content::new();
    content.save_state();
    // Unit image square scaled to the full page.
    content.transform([page_w, 0.0, 0.0, page_h, 0.0, 0.0]);
    content.x_object(image_name);
    content.restore_state();
    pdf.stream(content_id, &content.finish());

    Ok(pdf.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::compose;
    use crate::label::LabelRecord;
    use crate::render::LabelRasterizer;
    use crate::surface::BorderStyle;

    /// Rasterizer stub that always fails, for state-restoration tests.
    struct FailingRasterizer;

    impl Rasterizer for FailingRasterizer {
        fn rasterize(
            &self,
            _view: &crate::compose::LabelView,
            _opts: &RasterOptions,
        ) -> Result<RgbaImage, EtiquetaError> {
            Err(EtiquetaError::Rasterization("simulated failure".to_string()))
        }
    }

    fn mounted_surface() -> Surface {
        let record = LabelRecord::new("123", "Q-7", "https://ex.com/p/123", "05/03/2024").unwrap();
        let view = compose(&record).unwrap();
        let mut surface = Surface::new("test");
        surface.mount(record, view);
        surface
    }

    #[test]
    fn test_empty_surface_refused_without_side_effects() {
        let engine = ExportEngine::new(LabelRasterizer::new(None));
        let mut surface = Surface::new("test");

        let result = engine.export(&mut surface, ExportFormat::Png);
        assert!(matches!(result, Err(EtiquetaError::ExportPrecondition(_))));
        assert!(!surface.capture_mode());
        assert_eq!(surface.border(), BorderStyle::Dashed);
    }

    #[test]
    fn test_state_restored_after_success() {
        let engine = ExportEngine::new(LabelRasterizer::new(None));
        let mut surface = mounted_surface();

        let export = engine.export(&mut surface, ExportFormat::Png).unwrap();
        assert!(!surface.capture_mode());
        assert_eq!(surface.border(), BorderStyle::Dashed);
        // PNG signature.
        assert_eq!(&export.bytes[..8], b"\x89PNG\r\n\x1a\n");
        assert!(export.filename.starts_with("etiquetas_123_"));
        assert!(export.filename.ends_with(".png"));
    }

    #[test]
    fn test_state_restored_after_raster_failure() {
        let engine = ExportEngine::new(FailingRasterizer);
        let mut surface = mounted_surface();

        let result = engine.export(&mut surface, ExportFormat::Pdf);
        assert!(matches!(result, Err(EtiquetaError::Rasterization(_))));
        assert!(!surface.capture_mode());
        assert_eq!(surface.border(), BorderStyle::Dashed);
        // The mounted label survives a failed export.
        assert!(!surface.is_empty());
    }

    #[test]
    fn test_pdf_export_shape() {
        let engine = ExportEngine::new(LabelRasterizer::new(None));
        let mut surface = mounted_surface();

        let export = engine.export(&mut surface, ExportFormat::Pdf).unwrap();
        assert!(export.bytes.starts_with(b"%PDF-"));
        assert_eq!(export.content_type, "application/pdf");
        assert!(export.filename.ends_with(".pdf"));
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("pdf".parse::<ExportFormat>().unwrap(), ExportFormat::Pdf);
        assert_eq!("PNG".parse::<ExportFormat>().unwrap(), ExportFormat::Png);
        assert!("gif".parse::<ExportFormat>().is_err());
    }
}
