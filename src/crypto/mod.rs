//! Cryptographic primitives for ShardVault.
//!
//! This module provides:
//! - AES-256-GCM encryption and decryption (`encryption`)
//! - Per-record data keys that zero themselves on drop (`keys`)

pub mod encryption;
pub mod keys;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{encrypt, decrypt, DataKey};
pub use encryption::{decrypt, encrypt, NONCE_LEN, TAG_LEN};
pub use keys::{DataKey, KEY_LEN};
