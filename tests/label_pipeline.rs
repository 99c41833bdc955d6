//! # Label Pipeline Tests
//!
//! End-to-end coverage of the compose → mount → export flow, including the
//! lookup surface that regenerates labels from stored registry entries.

use etiqueta::compose::compose;
use etiqueta::error::EtiquetaError;
use etiqueta::export::{ExportEngine, ExportFormat};
use etiqueta::label::{LabelRecord, RegistryEntry};
use etiqueta::render::LabelRasterizer;
use etiqueta::surface::{BorderStyle, Surface};

fn entry() -> RegistryEntry {
    serde_json::from_str(
        r#"{
            "id": 7,
            "pedido": "123",
            "quadro": "Q-7",
            "link": "https://example.com/p/123",
            "data": "2024-03-05T00:00:00Z"
        }"#,
    )
    .unwrap()
}

#[test]
fn lookup_exports_refuse_until_a_preview_mounts() {
    let engine = ExportEngine::new(LabelRasterizer::new(None));
    let mut lookup = Surface::new("consulta");

    // Before any successful preview: refusal, no file, no state change.
    for format in [ExportFormat::Pdf, ExportFormat::Png] {
        let result = engine.export(&mut lookup, format);
        assert!(matches!(result, Err(EtiquetaError::ExportPrecondition(_))));
    }
    assert!(!lookup.capture_mode());
    assert_eq!(lookup.border(), BorderStyle::Dashed);

    // Preview-on-demand: rebuild the record from the stored entry, mount it,
    // and exports start succeeding.
    let record = LabelRecord::from_entry(&entry()).unwrap();
    assert_eq!(record.display_date, "05/03/2024");
    let view = compose(&record).unwrap();
    lookup.mount(record, view);

    let pdf = engine.export(&mut lookup, ExportFormat::Pdf).unwrap();
    assert!(pdf.bytes.starts_with(b"%PDF-"));
    assert!(pdf.filename.starts_with("etiquetas_123_"));
}

#[test]
fn preview_regeneration_is_idempotent() {
    let record = LabelRecord::from_entry(&entry()).unwrap();
    let first = compose(&record).unwrap();
    let second = compose(&record).unwrap();
    assert_eq!(first, second);
}

#[test]
fn remount_replaces_prior_label() {
    let mut surface = Surface::new("etiquetas");

    let first = LabelRecord::new("1", "A", "https://example.com/1", "01/01/2024").unwrap();
    surface.mount(first.clone(), compose(&first).unwrap());

    let second = LabelRecord::new("2", "B", "https://example.com/2", "02/01/2024").unwrap();
    surface.mount(second.clone(), compose(&second).unwrap());

    let engine = ExportEngine::new(LabelRasterizer::new(None));
    let exported = engine.export(&mut surface, ExportFormat::Png).unwrap();
    assert!(exported.filename.starts_with("etiquetas_2_"));
}
