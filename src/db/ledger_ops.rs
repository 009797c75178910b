//! SQLite-backed lifecycle ledger
//!
//! Each public operation runs inside exactly one transaction. Dropping an
//! uncommitted `Transaction` rolls it back, so any `?` inside the closure
//! leaves the database untouched; the error is logged and handed back.

use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension, Row, Transaction};
use tracing::{error, info};

use super::ledger_conn::{init_schema, open_ledger_db};
use super::{Ledger, LifecycleRecord, NewRecord};
use crate::enums::Status;
use crate::error::{CoreError, Result};

const RECORD_COLUMNS: &str = "id, uploader_id, unique_filename, crypt_filename, zip_filename, \
     final_filename, original_file_size, zip_file_size, crypt_file_size, created_at, \
     zipped_at, encrypted_at, decrypted_at, extracted_at, status, error_message";

pub struct SqliteLedger {
    conn: Connection,
}

impl SqliteLedger {
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        Ok(Self {
            conn: open_ledger_db(db_path)?,
        })
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        init_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Every record, oldest first
    pub fn all_records(&mut self) -> Result<Vec<LifecycleRecord>> {
        self.in_transaction("all_records", |tx| {
            let mut stmt =
                tx.prepare(&format!("SELECT {RECORD_COLUMNS} FROM file_metadata ORDER BY id"))?;
            let records = stmt
                .query_map([], record_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(records)
        })
    }

    fn in_transaction<T>(
        &mut self,
        op: &'static str,
        f: impl FnOnce(&Transaction<'_>) -> Result<T>,
    ) -> Result<T> {
        let result = self
            .conn
            .transaction()
            .map_err(CoreError::from)
            .and_then(|tx| {
                let value = f(&tx)?;
                tx.commit()?;
                Ok(value)
            });

        if let Err(e) = &result {
            error!(op, error = %e, "ledger transaction rolled back");
        }
        result
    }
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<LifecycleRecord> {
    Ok(LifecycleRecord {
        id: row.get(0)?,
        uploader_id: row.get(1)?,
        unique_filename: row.get(2)?,
        crypt_filename: row.get(3)?,
        zip_filename: row.get(4)?,
        final_filename: row.get(5)?,
        original_file_size: row.get(6)?,
        zip_file_size: row.get(7)?,
        crypt_file_size: row.get(8)?,
        created_at: row.get(9)?,
        zipped_at: row.get(10)?,
        encrypted_at: row.get(11)?,
        decrypted_at: row.get(12)?,
        extracted_at: row.get(13)?,
        status: row.get(14)?,
        error_message: row.get(15)?,
    })
}

fn current_status(tx: &Transaction<'_>, id: i64) -> Result<Option<Status>> {
    Ok(tx
        .query_row(
            "SELECT status FROM file_metadata WHERE id = ?1",
            [id],
            |r| r.get(0),
        )
        .optional()?)
}

/// A conditional UPDATE touched no row: report why
fn rejected(tx: &Transaction<'_>, id: i64, to: Status) -> CoreError {
    match current_status(tx, id) {
        Ok(Some(from)) => CoreError::InvalidTransition { id, from, to },
        Ok(None) => CoreError::RecordNotFound(id),
        Err(e) => e,
    }
}

fn find_first(tx: &Transaction<'_>, where_clause: &str) -> Result<Option<LifecycleRecord>> {
    let sql = format!(
        "SELECT {RECORD_COLUMNS} FROM file_metadata WHERE {where_clause} ORDER BY id LIMIT 1"
    );
    Ok(tx.query_row(&sql, [], record_from_row).optional()?)
}

impl Ledger for SqliteLedger {
    fn create(&mut self, record: &NewRecord) -> Result<i64> {
        let id = self.in_transaction("create", |tx| {
            tx.execute(
                "INSERT INTO file_metadata
                    (uploader_id, unique_filename, crypt_filename, zip_filename, crypt_file_size)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    record.uploader_id,
                    record.unique_filename,
                    record.crypt_filename,
                    record.zip_filename,
                    record.crypt_file_size,
                ],
            )?;
            Ok(tx.last_insert_rowid())
        })?;
        info!(id, unique_filename = %record.unique_filename, "ledger record created");
        Ok(id)
    }

    fn get(&mut self, id: i64) -> Result<LifecycleRecord> {
        self.in_transaction("get", |tx| {
            tx.query_row(
                &format!("SELECT {RECORD_COLUMNS} FROM file_metadata WHERE id = ?1"),
                [id],
                record_from_row,
            )
            .optional()?
            .ok_or(CoreError::RecordNotFound(id))
        })
    }

    fn find_next_pending(&mut self) -> Result<Option<LifecycleRecord>> {
        self.in_transaction("find_next_pending", |tx| {
            find_first(tx, "status = 'created'")
        })
    }

    fn find_next_interrupted(&mut self) -> Result<Option<LifecycleRecord>> {
        self.in_transaction("find_next_interrupted", |tx| {
            find_first(tx, "status IN ('zipped', 'encrypted', 'decrypted')")
        })
    }

    fn mark_zipped(&mut self, id: i64, at: &str) -> Result<()> {
        self.in_transaction("mark_zipped", |tx| {
            let rows = tx.execute(
                "UPDATE file_metadata SET zipped_at = ?1, status = ?2
                 WHERE id = ?3 AND status = ?4",
                params![at, Status::Zipped, id, Status::Created],
            )?;
            if rows == 0 {
                return Err(rejected(tx, id, Status::Zipped));
            }
            Ok(())
        })
    }

    fn mark_encrypted(&mut self, id: i64, crypt_size: &str, at: &str) -> Result<()> {
        self.in_transaction("mark_encrypted", |tx| {
            let rows = tx.execute(
                "UPDATE file_metadata SET crypt_file_size = ?1, encrypted_at = ?2, status = ?3
                 WHERE id = ?4 AND status = ?5",
                params![crypt_size, at, Status::Encrypted, id, Status::Zipped],
            )?;
            if rows == 0 {
                return Err(rejected(tx, id, Status::Encrypted));
            }
            Ok(())
        })
    }

    fn mark_decrypted(&mut self, id: i64, zip_size: &str, at: &str) -> Result<()> {
        self.in_transaction("mark_decrypted", |tx| {
            let rows = tx.execute(
                "UPDATE file_metadata SET zip_file_size = ?1, decrypted_at = ?2, status = ?3
                 WHERE id = ?4 AND status = ?5",
                params![zip_size, at, Status::Decrypted, id, Status::Encrypted],
            )?;
            if rows == 0 {
                return Err(rejected(tx, id, Status::Decrypted));
            }
            Ok(())
        })
    }

    fn mark_extracted(
        &mut self,
        id: i64,
        original_size: &str,
        final_filename: &str,
        at: &str,
    ) -> Result<()> {
        self.in_transaction("mark_extracted", |tx| {
            let rows = tx.execute(
                "UPDATE file_metadata
                 SET original_file_size = ?1, final_filename = ?2, extracted_at = ?3, status = ?4
                 WHERE id = ?5 AND status = ?6",
                params![
                    original_size,
                    final_filename,
                    at,
                    Status::Extracted,
                    id,
                    Status::Decrypted
                ],
            )?;
            if rows == 0 {
                return Err(rejected(tx, id, Status::Extracted));
            }
            Ok(())
        })
    }

    fn mark_error(&mut self, id: i64, message: &str) -> Result<()> {
        self.in_transaction("mark_error", |tx| {
            let rows = tx.execute(
                "UPDATE file_metadata SET error_message = ?1, status = ?2
                 WHERE id = ?3 AND status IN ('created', 'zipped', 'encrypted', 'decrypted')",
                params![message, Status::Error, id],
            )?;
            if rows == 0 {
                return Err(rejected(tx, id, Status::Error));
            }
            Ok(())
        })
    }

    fn status_history(&mut self, id: i64) -> Result<Vec<Status>> {
        self.in_transaction("status_history", |tx| {
            let mut stmt =
                tx.prepare("SELECT status FROM status_history WHERE file_id = ?1 ORDER BY seq")?;
            let statuses = stmt
                .query_map([id], |r| r.get(0))?
                .collect::<rusqlite::Result<Vec<Status>>>()?;
            Ok(statuses)
        })
    }
}
