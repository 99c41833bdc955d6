//! # Label Composition
//!
//! Turns a [`LabelRecord`] into a [`LabelView`]: a pure, renderable
//! description of the two-column label sheet. Composition performs no I/O
//! and touches no surface; mounting a view onto a [`crate::surface::Surface`]
//! and rasterizing it are separate steps.

use crate::error::EtiquetaError;
use crate::label::LabelRecord;

/// Every label sheet carries exactly this many columns, all populated from
/// the same record.
pub const COLUMNS_PER_LABEL: usize = 2;

/// One column of the printed sheet: header lines, the QR payload, and the
/// date shown beside the QR.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelColumn {
    /// Header lines, top to bottom.
    pub header: Vec<String>,
    /// Link encoded by the column's QR code.
    pub qr_link: String,
    /// `DD/MM/YYYY` date printed beside the QR.
    pub date: String,
}

/// A renderable description of a full label sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelView {
    pub columns: Vec<LabelColumn>,
}

/// Compose a two-column label view from a record.
///
/// Validates the record first: a record with missing fields blocks
/// composition entirely, leaving no partial view behind.
pub fn compose(record: &LabelRecord) -> Result<LabelView, EtiquetaError> {
    if record.order_id.trim().is_empty()
        || record.frame_code.trim().is_empty()
        || record.link.trim().is_empty()
    {
        return Err(EtiquetaError::Validation(
            "cannot compose a label with missing fields".to_string(),
        ));
    }

    let column = LabelColumn {
        header: vec![
            format!("Pedido: {}", record.order_id),
            format!("Cód. Quadro: {}", record.frame_code),
        ],
        qr_link: record.link.clone(),
        date: record.display_date.clone(),
    };

    Ok(LabelView {
        columns: vec![column.clone(), column],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record() -> LabelRecord {
        LabelRecord::new("123", "Q-7", "https://ex.com/p/123", "05/03/2024").unwrap()
    }

    #[test]
    fn test_compose_yields_two_identical_columns() {
        let view = compose(&record()).unwrap();
        assert_eq!(view.columns.len(), COLUMNS_PER_LABEL);
        assert_eq!(view.columns[0], view.columns[1]);
    }

    #[test]
    fn test_columns_carry_record_content() {
        let view = compose(&record()).unwrap();
        for column in &view.columns {
            assert_eq!(column.header[0], "Pedido: 123");
            assert_eq!(column.header[1], "Cód. Quadro: Q-7");
            assert_eq!(column.qr_link, "https://ex.com/p/123");
            assert_eq!(column.date, "05/03/2024");
        }
    }

    #[test]
    fn test_compose_rejects_blank_fields() {
        let mut rec = record();
        rec.link = "   ".to_string();
        assert!(matches!(
            compose(&rec),
            Err(EtiquetaError::Validation(_))
        ));
    }
}
