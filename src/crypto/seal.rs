// src/crypto/seal.rs
use ocb3::aead::{AeadInPlace, Key, KeyInit, Nonce};
use rand::RngCore;

use super::{Aes128Ocb, SealedContainer};
use crate::aliases::SealKey16;
use crate::consts::NONCE_LEN;
use crate::error::{CoreError, Result};

/// Seal plaintext → `tag || nonce || ciphertext` (in-memory)
///
/// Draws a fresh random nonce on every call, so sealing the same bytes
/// twice under one key never yields the same container.
pub fn seal(plaintext: &[u8], key: &SealKey16) -> Result<Vec<u8>> {
    let cipher = Aes128Ocb::new(Key::<Aes128Ocb>::from_slice(key.expose_secret()));

    let mut nonce = [0u8; NONCE_LEN];
    rand::rng().fill_bytes(&mut nonce);

    let mut buffer = plaintext.to_vec();
    let tag = cipher
        .encrypt_in_place_detached(Nonce::<Aes128Ocb>::from_slice(&nonce), b"", &mut buffer)
        .map_err(|_| CoreError::Seal)?;

    Ok(SealedContainer {
        tag: tag.as_slice(),
        nonce: &nonce,
        ciphertext: &buffer,
    }
    .to_bytes())
}
