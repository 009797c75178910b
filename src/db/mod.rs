// src/db/mod.rs
//! Lifecycle ledger: durable per-artifact status records
//!
//! The pipeline only talks to the [`Ledger`] trait. [`SqliteLedger`] is the
//! shipped implementation; its schema lives in `ledger_conn`.

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::Serialize;

use crate::enums::Status;
use crate::error::Result;

pub mod ledger_conn;
pub mod ledger_ops;

pub use ledger_conn::open_ledger_db;
pub use ledger_ops::SqliteLedger;

/// Values known when a unit of work is first recorded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecord {
    pub uploader_id: Option<i64>,
    pub unique_filename: String,
    pub crypt_filename: String,
    pub zip_filename: String,
    pub crypt_file_size: Option<String>,
}

/// One row of `file_metadata`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LifecycleRecord {
    pub id: i64,
    pub uploader_id: Option<i64>,
    pub unique_filename: String,
    pub crypt_filename: Option<String>,
    pub zip_filename: Option<String>,
    pub final_filename: Option<String>,
    pub original_file_size: Option<String>,
    pub zip_file_size: Option<String>,
    pub crypt_file_size: Option<String>,
    pub created_at: String,
    pub zipped_at: Option<String>,
    pub encrypted_at: Option<String>,
    pub decrypted_at: Option<String>,
    pub extracted_at: Option<String>,
    pub status: Status,
    pub error_message: Option<String>,
}

/// Create/read/update operations the pipeline reports transitions through.
///
/// Every call is one all-or-nothing transaction. Status updates are
/// conditional on the expected previous status, so a skipped or reversed
/// transition fails with `InvalidTransition` instead of being applied.
/// Failures are returned to the caller; nothing retries internally.
pub trait Ledger {
    fn create(&mut self, record: &NewRecord) -> Result<i64>;

    fn get(&mut self, id: i64) -> Result<LifecycleRecord>;

    /// Oldest record still in `created`
    fn find_next_pending(&mut self) -> Result<Option<LifecycleRecord>>;

    /// Oldest record stopped between `created` and `extracted` (crash recovery)
    fn find_next_interrupted(&mut self) -> Result<Option<LifecycleRecord>>;

    fn mark_zipped(&mut self, id: i64, at: &str) -> Result<()>;

    fn mark_encrypted(&mut self, id: i64, crypt_size: &str, at: &str) -> Result<()>;

    fn mark_decrypted(&mut self, id: i64, zip_size: &str, at: &str) -> Result<()>;

    fn mark_extracted(
        &mut self,
        id: i64,
        original_size: &str,
        final_filename: &str,
        at: &str,
    ) -> Result<()>;

    /// Move any non-terminal record to `error`
    fn mark_error(&mut self, id: i64, message: &str) -> Result<()>;

    /// Every status the record has held, oldest first
    fn status_history(&mut self, id: i64) -> Result<Vec<Status>>;
}

impl ToSql for Status {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Status {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}
