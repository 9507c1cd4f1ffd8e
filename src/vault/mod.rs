//! Vault module — sharded secret storage.
//!
//! This module provides:
//! - `VaultOptions`, the prefix / shard-count knobs (`options`)
//! - Storage slot naming for a record (`layout`)
//! - Key id generation (`key_id`)
//! - Splitting and joining of the encoded ciphertext (`shard`)
//! - The `SecretVault` handle with the four vault operations (`store`)
//!
//! Sharding is a plain partition of the Base64 ciphertext, not a
//! threshold scheme: every shard plus the key slot is needed to recover
//! a secret, and the key lives in the same store as the shards.  The
//! vault is only as confidential as the store's access control.

pub mod key_id;
pub mod layout;
pub mod options;
pub mod shard;
pub mod store;

// Re-export the most commonly used items.
pub use layout::RecordSlots;
pub use options::VaultOptions;
pub use store::SecretVault;
