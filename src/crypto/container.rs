// src/crypto/container.rs
use crate::consts::{MIN_CONTAINER_LEN, NONCE_LEN, TAG_LEN};
use crate::error::{CoreError, Result};

/// Borrowed view over the three regions of a sealed container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SealedContainer<'a> {
    pub tag: &'a [u8],
    pub nonce: &'a [u8],
    pub ciphertext: &'a [u8],
}

impl<'a> SealedContainer<'a> {
    /// Split at the fixed tag/nonce offsets. Anything shorter than the
    /// prefix is rejected whole, never partially parsed.
    pub fn parse(bytes: &'a [u8]) -> Result<Self> {
        if bytes.len() < MIN_CONTAINER_LEN {
            return Err(CoreError::MalformedContainer(format!(
                "sealed container is {} bytes, expected at least {MIN_CONTAINER_LEN}",
                bytes.len()
            )));
        }
        let (tag, rest) = bytes.split_at(TAG_LEN);
        let (nonce, ciphertext) = rest.split_at(NONCE_LEN);
        Ok(Self {
            tag,
            nonce,
            ciphertext,
        })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.tag.len() + self.nonce.len() + self.ciphertext.len());
        out.extend_from_slice(self.tag);
        out.extend_from_slice(self.nonce);
        out.extend_from_slice(self.ciphertext);
        out
    }
}
