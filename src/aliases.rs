// src/aliases.rs
//! Secret wrappers from secure-gate
//!
//! These zeroize on drop and never print their contents through `Debug`.

use secure_gate::{dynamic_alias, fixed_alias};

// Fixed-size secrets
fixed_alias!(SealKey16, 16); // AES-128 key for the sealed container

// Dynamic secrets
dynamic_alias!(PlainText, Vec<u8>);
