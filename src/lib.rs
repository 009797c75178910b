// src/lib.rs
//! crypt-pipeline: staged zip → seal → open → extract pipeline with a durable ledger
//!
//! Features:
//! - AES-128-OCB sealed containers (`tag || nonce || ciphertext`), fail-closed opening
//! - Single-entry zip archiving between stages
//! - Four stage directories: raw, staging, clean, queries
//! - SQLite lifecycle ledger with a status audit trail

pub mod aliases;
pub mod archive;
pub mod artifact;
pub mod config;
pub mod consts;
pub mod crypto;
pub mod db;
pub mod enums;
pub mod error;
pub mod export;
pub mod file_ops;
pub mod key_ops;
pub mod naming;
pub mod pipeline;
pub mod util;

// Re-export everything users need at the crate root
pub use aliases::{PlainText, SealKey16};
pub use config::load as load_config;
pub use crypto::{open, seal, SealedContainer};
pub use db::{Ledger, LifecycleRecord, NewRecord, SqliteLedger};
pub use enums::Status;
pub use error::{CoreError, Result as CoreResult};
pub use key_ops::{KeyProvider, StaticKeyProvider};
pub use naming::{Stage, StageLayout};
pub use pipeline::{Pipeline, RunReport};
