//! Exports: table rows to CSV, records to an envelope JSON file.
//!
//! The CSV is meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::data::Envelope;
use crate::domain::{SaleRecord, TableRow};
use crate::error::AppError;

/// Write table rows (already in display order) to a CSV file.
pub fn write_table_csv(path: &Path, rows: &[TableRow]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    let mut out = BufWriter::new(file);

    writeln!(out, "id,date,product,quantity,value")
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for row in rows {
        writeln!(
            out,
            "{},{},{},{},{:.2}",
            row.id.map(|id| id.to_string()).unwrap_or_default(),
            row.date,
            csv_field(&row.product),
            row.quantity,
            row.value.round_dp(2),
        )
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    out.flush()
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV: {e}")))
}

/// Write records as a success envelope, the same shape the backend serves.
pub fn write_envelope_json(path: &Path, records: &[SaleRecord]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(BufWriter::new(file), &Envelope::success(records))
        .map_err(|e| AppError::new(2, format!("Failed to write envelope JSON: {e}")))
}

/// Quote a field when it contains a separator, a quote or a line break.
fn csv_field(raw: &str) -> String {
    if raw.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}
