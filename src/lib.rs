pub mod cli;
pub mod compare;
pub mod config;
pub mod crypto;
pub mod errors;
pub mod logging;
pub mod storage;
pub mod vault;

#[cfg(feature = "audit-log")]
pub mod audit;

pub use compare::{
    secure_base64_compare, secure_compare, secure_hash_compare, secure_hex_compare,
    HashAlgorithm,
};
pub use errors::{Result, VaultError};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use vault::{SecretVault, VaultOptions};
