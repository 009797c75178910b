// src/artifact.rs
//! In-memory identity of one unit of work
//!
//! Only valid for the duration of one pipeline run; the ledger row is the
//! source of truth and an `Artifact` can always be rebuilt from it.

use crate::consts::{CRYPT_EXT, SQL_EXT, ZIP_EXT};
use crate::db::LifecycleRecord;
use crate::error::{CoreError, Result};
use crate::naming::base_name_of;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub base_name: String,
    pub unique_name: String,
    /// `<base>.sql` in the queries stage
    pub sql_file_name: String,
    /// `<unique>.zip` in the raw and staging stages
    pub zip_file_name: String,
    /// `<base>.crypt` in the raw stage
    pub crypt_file_name: String,
}

impl Artifact {
    /// Derive every stage file name from an already-assigned unique name
    pub fn new(base_name: &str, unique_name: &str) -> Self {
        Self {
            base_name: base_name.to_owned(),
            unique_name: unique_name.to_owned(),
            sql_file_name: format!("{base_name}.{SQL_EXT}"),
            zip_file_name: format!("{unique_name}.{ZIP_EXT}"),
            crypt_file_name: format!("{base_name}.{CRYPT_EXT}"),
        }
    }

    /// Rebuild from a ledger row without touching the clock
    pub fn from_record(record: &LifecycleRecord) -> Result<Self> {
        let crypt = record.crypt_filename.as_deref().ok_or_else(|| {
            CoreError::Config(format!("ledger record {} has no crypt_filename", record.id))
        })?;
        let base = base_name_of(crypt)?;
        let mut artifact = Self::new(&base, &record.unique_filename);
        if let Some(zip) = &record.zip_filename {
            artifact.zip_file_name = zip.clone();
        }
        Ok(artifact)
    }
}
