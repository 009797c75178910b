// src/crypto/open.rs
use ocb3::aead::{AeadInPlace, Key, KeyInit, Nonce, Tag};
use zeroize::Zeroize;

use super::{Aes128Ocb, SealedContainer};
use crate::aliases::{PlainText, SealKey16};
use crate::error::{CoreError, Result};

/// Open a sealed container → plaintext (in-memory)
///
/// Fails closed: on tag mismatch the scratch buffer is wiped and only
/// [`CoreError::Integrity`] comes back.
pub fn open(container: &[u8], key: &SealKey16) -> Result<PlainText> {
    let parts = SealedContainer::parse(container)?;
    let cipher = Aes128Ocb::new(Key::<Aes128Ocb>::from_slice(key.expose_secret()));

    let mut buffer = parts.ciphertext.to_vec();
    let verified = cipher.decrypt_in_place_detached(
        Nonce::<Aes128Ocb>::from_slice(parts.nonce),
        b"",
        &mut buffer,
        Tag::<Aes128Ocb>::from_slice(parts.tag),
    );

    if verified.is_err() {
        buffer.zeroize();
        return Err(CoreError::Integrity);
    }
    Ok(PlainText::new(buffer))
}
