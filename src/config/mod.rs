// src/config/mod.rs
//! Configuration for the crypter pipeline
//!
//! TOML file + env overrides. The seal key is never defaulted: it must come
//! from `[keys] seal_key_hex` or `CRYPTER_SEAL_KEY`.

pub use app::{load, load_from, Config, Keys, Naming, Paths, Worker};

mod app;
mod defaults;
