//! # Label Data Model
//!
//! Records flowing through the composition pipeline, date formatting, and
//! the export filename convention.
//!
//! A [`LabelRecord`] is ephemeral: built from form/CLI input or reconstructed
//! from a [`RegistryEntry`], consumed by composition and export, and replaced
//! wholesale whenever a surface is re-mounted. Registry entries are owned by
//! the remote backend; the client only ever holds transient read-only copies.

use chrono::{DateTime, Local, NaiveDateTime};
use serde::{Deserialize, Deserializer};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::EtiquetaError;

/// A label about to be composed: one order, one frame, one QR link, one
/// display date. Both columns of the printed sheet are populated from the
/// same record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelRecord {
    pub order_id: String,
    pub frame_code: String,
    pub link: String,
    /// Already in `DD/MM/YYYY` form.
    pub display_date: String,
}

impl LabelRecord {
    /// Build a record from raw input, trimming whitespace.
    ///
    /// All of order id, frame code and link must be non-empty; the date
    /// defaults to today when empty.
    pub fn new(
        order_id: &str,
        frame_code: &str,
        link: &str,
        display_date: &str,
    ) -> Result<Self, EtiquetaError> {
        let order_id = order_id.trim();
        let frame_code = frame_code.trim();
        let link = link.trim();

        if order_id.is_empty() || frame_code.is_empty() || link.is_empty() {
            return Err(EtiquetaError::Validation(
                "order id, frame code and QR link are all required".to_string(),
            ));
        }

        let display_date = match display_date.trim() {
            "" => today_display_date(),
            d => d.to_string(),
        };

        Ok(Self {
            order_id: order_id.to_string(),
            frame_code: frame_code.to_string(),
            link: link.to_string(),
            display_date,
        })
    }

    /// Build a record dated today.
    pub fn with_today(order_id: &str, frame_code: &str, link: &str) -> Result<Self, EtiquetaError> {
        Self::new(order_id, frame_code, link, "")
    }

    /// Reconstruct a record from a stored registry entry, converting the
    /// stored ISO date into display form. Never writes back to the registry.
    pub fn from_entry(entry: &RegistryEntry) -> Result<Self, EtiquetaError> {
        Self::new(
            &entry.order_id,
            &entry.frame_code,
            &entry.link,
            &to_display_date(&entry.raw_date),
        )
    }
}

/// A row fetched from the remote registry. Field names follow the backend's
/// wire format; the server-assigned id is opaque and may arrive as a JSON
/// string or number.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegistryEntry {
    #[serde(default, deserialize_with = "opaque_id")]
    pub id: String,
    #[serde(rename = "pedido", default)]
    pub order_id: String,
    #[serde(rename = "quadro", default)]
    pub frame_code: String,
    #[serde(default)]
    pub link: String,
    /// As stored by the backend, usually ISO-8601.
    #[serde(rename = "data", default)]
    pub raw_date: String,
}

/// Accept the backend's id whether it serializes it as a string or a number.
fn opaque_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// Today's date in `DD/MM/YYYY` form (local time).
pub fn today_display_date() -> String {
    Local::now().format("%d/%m/%Y").to_string()
}

/// Convert an ISO-8601 date-time into `DD/MM/YYYY` display form.
///
/// Conversion only applies to values shaped like `YYYY-MM-DDT...`; anything
/// else (including strings already in display form) passes through unchanged.
/// Date parts are taken as written, without timezone shifting.
pub fn to_display_date(value: &str) -> String {
    if !looks_like_iso_datetime(value) {
        return value.to_string();
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return dt.format("%d/%m/%Y").to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return dt.format("%d/%m/%Y").to_string();
    }
    value.to_string()
}

/// `YYYY-MM-DDT` prefix check, mirroring the shape the backend emits.
fn looks_like_iso_datetime(value: &str) -> bool {
    let b = value.as_bytes();
    b.len() > 10
        && b[..4].iter().all(u8::is_ascii_digit)
        && b[4] == b'-'
        && b[5..7].iter().all(u8::is_ascii_digit)
        && b[7] == b'-'
        && b[8..10].iter().all(u8::is_ascii_digit)
        && b[10] == b'T'
}

/// Milliseconds since the Unix epoch, for filenames and cache busting.
pub fn epoch_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Deterministic export filename: `etiquetas_{order}_{millis}.{ext}`,
/// falling back to a literal `etiquetas` when the order id is empty.
pub fn export_filename_at(order_id: &str, millis: u64, ext: &str) -> String {
    let order = match order_id.trim() {
        "" => "etiquetas",
        o => o,
    };
    format!("etiquetas_{}_{}.{}", order, millis, ext)
}

/// [`export_filename_at`] stamped with the current time.
pub fn export_filename(order_id: &str, ext: &str) -> String {
    export_filename_at(order_id, epoch_millis(), ext)
}
