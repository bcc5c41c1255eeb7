//! One-shot seeding of the record store from a CSV export.
//!
//! Rows are read in full before the store is touched, so an unreadable file
//! leaves the existing data set in place.

use crate::error::Result;
use crate::storage::{Record, RecordStore};
use serde::Deserialize;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Column layout of the traceability export. Absent columns read as empty.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CsvRow {
    barcode: String,
    batch_id: String,
    shift_id: String,
    place_id: String,
    manufacturing_date: String,
    quality_status: String,
    defect_type: String,
    operator_id: String,
    operator_name: String,
    timestamp: String,
    product_id: String,
}

impl From<CsvRow> for Record {
    fn from(row: CsvRow) -> Self {
        Record {
            barcode: row.barcode.trim().to_string(),
            batch_id: row.batch_id,
            shift_id: row.shift_id,
            place_id: row.place_id,
            manufacturing_date: row.manufacturing_date,
            quality_status: row.quality_status,
            defect_type: row.defect_type,
            operator_id: row.operator_id,
            operator_name: row.operator_name,
            timestamp: row.timestamp,
            product_id: row.product_id,
            last_scanned_at: None,
        }
    }
}

/// Outcome of a seed run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    /// Rows in the store after the replace
    pub inserted: usize,
    /// Rows dropped while reading
    pub skipped: usize,
}

/// Parsed rows plus the number of rows that could not be used.
pub fn read_records(path: &Path) -> Result<(Vec<Record>, usize)> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    // Surfaces an unreadable file before any row is counted
    reader.headers()?;

    let mut records = Vec::new();
    let mut skipped = 0;

    for (idx, row) in reader.deserialize::<CsvRow>().enumerate() {
        // header is line 1
        let line = idx + 2;
        match row {
            Ok(row) => {
                let record = Record::from(row);
                if record.barcode.is_empty() {
                    warn!(line, "Dropping row without barcode");
                    skipped += 1;
                    continue;
                }
                records.push(record);
            }
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                warn!(line, error = %e, "CSV read error, dropping row");
                skipped += 1;
            }
        }
    }

    debug!(rows = records.len(), skipped, "CSV consumed");
    Ok((records, skipped))
}

/// Replace the whole store with the contents of `path`.
pub fn seed(store: &RecordStore, path: &Path) -> Result<SeedReport> {
    let start = Instant::now();
    info!(path = %path.display(), "Seeding record store");

    let (records, skipped) = read_records(path)?;
    let inserted = store.replace_all(&records)?;

    info!(
        inserted,
        skipped,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Seed complete"
    );

    Ok(SeedReport { inserted, skipped })
}
