//! # Label Surfaces
//!
//! A [`Surface`] is the mount target for composed label views — the adapter
//! between pure composition and concrete raster output. It tracks the border
//! decoration shown around the preview and the transient capture flag held
//! while an export rasterizes it.

use crate::compose::LabelView;
use crate::label::LabelRecord;

/// Border decoration drawn around a surface's preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BorderStyle {
    /// Light dashed outline shown on screen.
    #[default]
    Dashed,
    /// No decoration; used while capturing for export.
    None,
}

/// A composed label mounted on a surface, together with the record that
/// produced it.
#[derive(Debug, Clone)]
struct Mounted {
    record: LabelRecord,
    view: LabelView,
}

/// A mount target for composed labels.
///
/// Mounting replaces any prior content entirely; the view is never diffed or
/// merged. An empty surface refuses export.
#[derive(Debug)]
pub struct Surface {
    name: &'static str,
    mounted: Option<Mounted>,
    capture_mode: bool,
    border: BorderStyle,
}

impl Surface {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            mounted: None,
            capture_mode: false,
            border: BorderStyle::default(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Mount a composed view, fully replacing the prior content.
    pub fn mount(&mut self, record: LabelRecord, view: LabelView) {
        self.mounted = Some(Mounted { record, view });
    }

    pub fn clear(&mut self) {
        self.mounted = None;
    }

    pub fn is_empty(&self) -> bool {
        self.mounted.is_none()
    }

    pub fn view(&self) -> Option<&LabelView> {
        self.mounted.as_ref().map(|m| &m.view)
    }

    pub fn record(&self) -> Option<&LabelRecord> {
        self.mounted.as_ref().map(|m| &m.record)
    }

    pub fn capture_mode(&self) -> bool {
        self.capture_mode
    }

    pub fn border(&self) -> BorderStyle {
        self.border
    }

    /// Enter the transient capture state: strip the border so it doesn't
    /// appear in the raster. Returns the prior border for restoration.
    pub(crate) fn enter_capture(&mut self) -> BorderStyle {
        let prior = self.border;
        self.capture_mode = true;
        self.border = BorderStyle::None;
        prior
    }

    /// Leave capture mode, restoring the prior border. Runs on every export
    /// exit path, including failures.
    pub(crate) fn exit_capture(&mut self, prior: BorderStyle) {
        self.capture_mode = false;
        self.border = prior;
    }
}
