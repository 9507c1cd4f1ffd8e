use thiserror::Error;

/// Errors produced by the vault, its stores and the CLI.
///
/// `NotFound` covers every way a record can fail to open: a missing
/// slot, bad Base64, a wrong key, a failed tag.  The vault API maps it
/// to `None` / `false`, so callers only ever see operational errors.
#[derive(Debug, Error)]
pub enum VaultError {
    #[error("Secret not found")]
    NotFound,

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("No unused key id found after {0} attempts")]
    KeyIdCollision(u32),

    #[error("Invalid vault options: {0}")]
    InvalidConfig(String),

    // Backends
    #[error("Storage failure: {0}")]
    StorageFailure(String),

    #[error("Keyring error: {0}")]
    KeyringError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    // CLI
    #[error("Config file error: {0}")]
    ConfigError(String),

    #[error("Command failed: {0}")]
    CommandFailed(String),

    /// A `verify` or `compare` check came out negative.
    #[error("{0}")]
    CheckFailed(String),

    #[error("Audit error: {0}")]
    AuditError(String),
}

pub type Result<T> = std::result::Result<T, VaultError>;
