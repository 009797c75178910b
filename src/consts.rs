// src/consts.rs
//! Shared constants: algorithm parameters and file-name defaults

/// AES-128 key length in bytes
pub const KEY_LEN: usize = 16;

/// OCB nonce length in bytes (the longest RFC 7253 allows)
pub const NONCE_LEN: usize = 15;

/// OCB authentication tag length in bytes
pub const TAG_LEN: usize = 16;

/// Smallest possible sealed container: tag + nonce + empty ciphertext
pub const MIN_CONTAINER_LEN: usize = TAG_LEN + NONCE_LEN;

pub const SQL_EXT: &str = "sql";
pub const ZIP_EXT: &str = "zip";
pub const CRYPT_EXT: &str = "crypt";

/// `unique_name` timestamp format, second granularity
pub const UNIQUE_NAME_TIME_FORMAT: &str = "%Y%m%d%H%M%S";

/// Default seconds between ledger polls in the worker loop
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 20;

pub const ENV_CONFIG: &str = "CRYPTER_CONFIG";
pub const ENV_SEAL_KEY: &str = "CRYPTER_SEAL_KEY";
pub const ENV_LEDGER_DB: &str = "CRYPTER_LEDGER_DB";
pub const ENV_ROOT: &str = "CRYPTER_ROOT";

pub const DEFAULT_CONFIG_FILE: &str = "crypter.toml";
