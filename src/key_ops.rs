// src/key_ops.rs
//! Key provisioning for the AEAD codec
//!
//! The pipeline never holds a hardcoded key: it asks a [`KeyProvider`],
//! which today is a single static key loaded from configuration. Rotation
//! or per-tenant keys plug in here without touching the pipeline.

use zeroize::Zeroize;

use crate::aliases::SealKey16;
use crate::consts::KEY_LEN;
use crate::error::{CoreError, Result};

pub trait KeyProvider {
    /// Key used for both sealing and opening
    fn seal_key(&self) -> Result<&SealKey16>;
}

/// One process-wide key, injected at startup
pub struct StaticKeyProvider {
    key: SealKey16,
}

impl StaticKeyProvider {
    pub fn new(key: SealKey16) -> Self {
        Self { key }
    }

    /// Decode a 32-character hex string into a 16-byte key
    pub fn from_hex(key_hex: &str) -> Result<Self> {
        let mut decoded = hex::decode(key_hex.trim())
            .map_err(|_| CoreError::Config("seal key is not valid hex".into()))?;

        if decoded.len() != KEY_LEN {
            let len = decoded.len();
            decoded.zeroize();
            return Err(CoreError::Config(format!(
                "seal key must be {KEY_LEN} bytes, got {len}"
            )));
        }

        let mut bytes = [0u8; KEY_LEN];
        bytes.copy_from_slice(&decoded);
        decoded.zeroize();

        let provider = Self::new(SealKey16::new(bytes));
        bytes.zeroize();
        Ok(provider)
    }
}

impl KeyProvider for StaticKeyProvider {
    fn seal_key(&self) -> Result<&SealKey16> {
        Ok(&self.key)
    }
}
