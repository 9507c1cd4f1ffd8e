use crate::errors::{Result, VaultError};

/// Namespace prefix for every slot the vault writes.
pub const DEFAULT_PREFIX: &str = "secure_vault_";

/// Number of shards each encoded ciphertext is split into.
pub const DEFAULT_SHARD_COUNT: usize = 3;

/// Upper bound on `shard_count`.
pub const MAX_SHARD_COUNT: usize = 64;

/// How many fresh key ids `store_key` tries before giving up.
pub const DEFAULT_KEY_ID_ATTEMPTS: u32 = 8;

/// Tunables for a `SecretVault`.
///
/// Changing `prefix` or `shard_count` after secrets were stored makes
/// those secrets unreachable, since both are part of the slot layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultOptions {
    pub prefix: String,
    pub shard_count: usize,
    pub key_id_attempts: u32,
}

impl Default for VaultOptions {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            shard_count: DEFAULT_SHARD_COUNT,
            key_id_attempts: DEFAULT_KEY_ID_ATTEMPTS,
        }
    }
}

impl VaultOptions {
    /// Reject options that would produce an unusable slot layout.
    pub fn validate(&self) -> Result<()> {
        if self.prefix.is_empty() {
            return Err(VaultError::InvalidConfig("prefix cannot be empty".into()));
        }
        if self.prefix.contains(':') {
            return Err(VaultError::InvalidConfig(
                "prefix cannot contain ':'".into(),
            ));
        }
        if self.shard_count == 0 || self.shard_count > MAX_SHARD_COUNT {
            return Err(VaultError::InvalidConfig(format!(
                "shard_count must be between 1 and {MAX_SHARD_COUNT} (got {})",
                self.shard_count
            )));
        }
        if self.key_id_attempts == 0 {
            return Err(VaultError::InvalidConfig(
                "key_id_attempts must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
