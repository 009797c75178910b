// src/export/mod.rs
//! Export utilities for the lifecycle ledger
//!
//! The export is an audit copy only: it holds file names, sizes, timestamps
//! and status history, never key material or artifact contents.

pub use json::export_ledger_json;

pub mod json;
