use crate::error::{Error, Result};
use crate::storage::Record;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::info;

const SELECT_COLUMNS: &str = "barcode, batch_id, shift_id, place_id, manufacturing_date, \
     quality_status, defect_type, operator_id, operator_name, timestamp, product_id, last_scanned_at";

/// SQLite-backed record store.
///
/// Every operation holds the connection lock for its full duration, so a
/// keyed read-modify-write is atomic with respect to other requests.
pub struct RecordStore {
    conn: Mutex<Connection>,
}

impl RecordStore {
    /// Open (or create) the database file and ensure the schema exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        let store = Self::bootstrap(conn)?;
        info!(path = %path.display(), "Record store opened");
        Ok(store)
    }

    pub fn in_memory() -> Result<Self> {
        Self::bootstrap(Connection::open_in_memory()?)
    }

    fn bootstrap(conn: Connection) -> Result<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS barcodes (
                barcode             TEXT PRIMARY KEY NOT NULL,
                batch_id            TEXT NOT NULL,
                shift_id            TEXT NOT NULL,
                place_id            TEXT NOT NULL,
                manufacturing_date  TEXT NOT NULL,
                quality_status      TEXT NOT NULL,
                defect_type         TEXT NOT NULL,
                operator_id         TEXT NOT NULL,
                operator_name       TEXT NOT NULL,
                timestamp           TEXT NOT NULL,
                product_id          TEXT NOT NULL,
                last_scanned_at     TEXT
            )",
            [],
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| Error::LockPoisoned)
    }

    /// Delete every record and insert `records` in a single transaction.
    ///
    /// Later duplicates of a barcode overwrite earlier ones. Returns the
    /// number of rows in the store afterwards.
    pub fn replace_all(&self, records: &[Record]) -> Result<usize> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        tx.execute("DELETE FROM barcodes", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO barcodes (
                    barcode, batch_id, shift_id, place_id, manufacturing_date,
                    quality_status, defect_type, operator_id, operator_name,
                    timestamp, product_id, last_scanned_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            )?;
            for r in records {
                stmt.execute(params![
                    r.barcode,
                    r.batch_id,
                    r.shift_id,
                    r.place_id,
                    r.manufacturing_date,
                    r.quality_status,
                    r.defect_type,
                    r.operator_id,
                    r.operator_name,
                    r.timestamp,
                    r.product_id,
                    r.last_scanned_at,
                ])?;
            }
        }

        let count: i64 = tx.query_row("SELECT COUNT(*) FROM barcodes", [], |row| row.get(0))?;
        tx.commit()?;
        Ok(count as usize)
    }

    /// Set `last_scanned_at` on the record and return the updated record,
    /// or `None` when no record has this barcode.
    pub fn mark_scanned(&self, barcode: &str, scanned_at: &str) -> Result<Option<Record>> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        let updated = tx.execute(
            "UPDATE barcodes SET last_scanned_at = ?1 WHERE barcode = ?2",
            params![scanned_at, barcode],
        )?;
        if updated == 0 {
            return Ok(None);
        }

        let record = Self::select_one(&tx, barcode)?;
        tx.commit()?;
        Ok(record)
    }

    pub fn get(&self, barcode: &str) -> Result<Option<Record>> {
        let conn = self.lock()?;
        Self::select_one(&conn, barcode)
    }

    pub fn count(&self) -> Result<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM barcodes", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn select_one(conn: &Connection, barcode: &str) -> Result<Option<Record>> {
        let sql = format!("SELECT {} FROM barcodes WHERE barcode = ?1", SELECT_COLUMNS);
        let record = conn
            .query_row(&sql, params![barcode], Self::map_row)
            .optional()?;
        Ok(record)
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<Record> {
        Ok(Record {
            barcode: row.get(0)?,
            batch_id: row.get(1)?,
            shift_id: row.get(2)?,
            place_id: row.get(3)?,
            manufacturing_date: row.get(4)?,
            quality_status: row.get(5)?,
            defect_type: row.get(6)?,
            operator_id: row.get(7)?,
            operator_name: row.get(8)?,
            timestamp: row.get(9)?,
            product_id: row.get(10)?,
            last_scanned_at: row.get(11)?,
        })
    }
}
