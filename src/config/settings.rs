use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{Result, VaultError};
use crate::vault::options::{
    VaultOptions, DEFAULT_KEY_ID_ATTEMPTS, DEFAULT_PREFIX, DEFAULT_SHARD_COUNT,
};

/// Project-level configuration, loaded from `.shardvault.toml`.
///
/// Every field has a sensible default so ShardVault works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Namespace prefix for every vault slot.
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Number of shards each secret's ciphertext is split into.
    #[serde(default = "default_shard_count")]
    pub shard_count: usize,

    /// Fresh key ids to try before reporting a collision.
    #[serde(default = "default_key_id_attempts")]
    pub key_id_attempts: u32,

    /// Store file (relative to the project root) used by the CLI.
    #[serde(default = "default_store_path")]
    pub store_path: String,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

fn default_shard_count() -> usize {
    DEFAULT_SHARD_COUNT
}

fn default_key_id_attempts() -> u32 {
    DEFAULT_KEY_ID_ATTEMPTS
}

fn default_store_path() -> String {
    ".shardvault/store.json".to_string()
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            shard_count: default_shard_count(),
            key_id_attempts: default_key_id_attempts(),
            store_path: default_store_path(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the project root.
    pub const FILE_NAME: &'static str = ".shardvault.toml";

    /// Load settings from `<project_dir>/.shardvault.toml`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let config_path = project_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            VaultError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        Ok(settings)
    }

    /// Full path to the store file.
    ///
    /// Example: `project_dir/.shardvault/store.json`
    pub fn resolve_store_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.store_path)
    }

    /// Convert into validated vault options.
    pub fn vault_options(&self) -> Result<VaultOptions> {
        let options = VaultOptions {
            prefix: self.prefix.clone(),
            shard_count: self.shard_count,
            key_id_attempts: self.key_id_attempts,
        };
        options.validate()?;
        Ok(options)
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn default_settings_are_sensible() {
        let s = Settings::default();
        assert_eq!(s.prefix, "secure_vault_");
        assert_eq!(s.shard_count, 3);
        assert_eq!(s.key_id_attempts, 8);
        assert_eq!(s.store_path, ".shardvault/store.json");
    }

    #[test]
    fn load_returns_defaults_when_no_config_file() {
        let tmp = TempDir::new().unwrap();
        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.shard_count, 3);
    }

    #[test]
    fn load_parses_toml_file() {
        let tmp = TempDir::new().unwrap();
        let config = r#"
prefix = "myapp_"
shard_count = 5
key_id_attempts = 2
store_path = "secrets/slots.json"
"#;
        fs::write(tmp.path().join(".shardvault.toml"), config).unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.prefix, "myapp_");
        assert_eq!(settings.shard_count, 5);
        assert_eq!(settings.key_id_attempts, 2);
        assert_eq!(
            settings.resolve_store_path(tmp.path()),
            tmp.path().join("secrets/slots.json")
        );
    }

    #[test]
    fn load_uses_defaults_for_missing_fields() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".shardvault.toml"), "shard_count = 4\n").unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.shard_count, 4);
        assert_eq!(settings.prefix, "secure_vault_");
    }

    #[test]
    fn load_errors_on_invalid_toml() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".shardvault.toml"), "not valid {{toml").unwrap();

        let result = Settings::load(tmp.path());
        assert!(matches!(result, Err(VaultError::ConfigError(_))));
    }

    #[test]
    fn vault_options_are_validated() {
        let s = Settings {
            shard_count: 0,
            ..Settings::default()
        };
        assert!(s.vault_options().is_err());

        let opts = Settings::default().vault_options().unwrap();
        assert_eq!(opts, VaultOptions::default());
    }
}
