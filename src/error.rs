// src/error.rs
//! Public error type for the entire crate

use std::path::PathBuf;

use thiserror::Error;

use crate::enums::Status;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Stage file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Authentication tag mismatch. Carries no tag, nonce or plaintext bytes.
    #[error("Integrity check failed: sealed container was modified or the key is wrong")]
    Integrity,

    #[error("Encryption failed")]
    Seal,

    #[error("Malformed container: {0}")]
    MalformedContainer(String),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Database error: {0}")]
    Sql(#[from] rusqlite::Error),

    #[error("Ledger record {0} not found")]
    RecordNotFound(i64),

    #[error("Invalid transition for record {id}: {from} -> {to}")]
    InvalidTransition { id: i64, from: Status, to: Status },

    /// A failed record could not be moved to `error`; it stays resumable
    #[error("Record {id} failed ({cause}) and its error status could not be saved: {ledger}")]
    ErrorNotRecorded {
        id: i64,
        cause: Box<CoreError>,
        ledger: Box<CoreError>,
    },

    #[error("Unknown stage: {0}")]
    UnknownStage(String),

    #[error("Unknown status: {0}")]
    UnknownStatus(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
