//! # Etiqueta - Printable QR Label Generator
//!
//! Etiqueta composes printable shipping/product labels embedding a QR code
//! with a centered logo, exports them as PDF or PNG, and synchronizes
//! submitted labels to a remote spreadsheet-backed registry for later lookup
//! and on-demand regeneration.
//!
//! ## Quick Start
//!
//! ```no_run
//! use etiqueta::{
//!     compose::compose,
//!     export::{ExportEngine, ExportFormat},
//!     label::LabelRecord,
//!     render::LabelRasterizer,
//!     surface::Surface,
//! };
//!
//! // Describe the label
//! let record = LabelRecord::with_today("123", "Q-7", "https://example.com/p/123")?;
//!
//! // Compose the two-column view and mount it on a surface
//! let view = compose(&record)?;
//! let mut surface = Surface::new("demo");
//! surface.mount(record, view);
//!
//! // Export at print resolution
//! let engine = ExportEngine::new(LabelRasterizer::new(None));
//! let pdf = engine.export(&mut surface, ExportFormat::Pdf)?;
//! std::fs::write(&pdf.filename, &pdf.bytes)?;
//!
//! # Ok::<(), etiqueta::EtiquetaError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`label`] | Records, date formatting, filename rules |
//! | [`compose`] | Pure record → two-column view composition |
//! | [`surface`] | Mount targets with capture-mode state |
//! | [`render`] | View → RGBA raster (QR, logo overlay, bitmap text) |
//! | [`export`] | PDF/PNG export with guaranteed state restoration |
//! | [`registry`] | Remote registry add/list client |
//! | [`assets`] | Memoized image loading |
//! | [`server`] | Web UI and JSON API |
//! | [`error`] | Error types |

pub mod assets;
pub mod compose;
pub mod error;
pub mod export;
pub mod label;
pub mod registry;
pub mod render;
pub mod server;
pub mod surface;

// Re-exports for convenience
pub use error::EtiquetaError;
pub use label::{LabelRecord, RegistryEntry};
