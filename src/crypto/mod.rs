// src/crypto/mod.rs
//! AEAD codec: pure in-memory sealing and opening, no file I/O
//!
//! A sealed container is `tag || nonce || ciphertext` with AES-128-OCB,
//! a 15-byte nonce and a 16-byte tag. There is no header or version byte:
//! the lengths are constants of the algorithm, so every reader of this
//! format must change together with [`Aes128Ocb`].

use aes::Aes128;
use ocb3::aead::consts::{U15, U16};
use ocb3::Ocb3;

mod container;
mod open;
mod seal;

pub use container::SealedContainer;
pub use open::open;
pub use seal::seal;

/// AES-128-OCB with the container's nonce and tag sizes
pub(crate) type Aes128Ocb = Ocb3<Aes128, U15, U16>;
