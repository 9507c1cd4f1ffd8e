//! Key-value storage backends the vault persists through.
//!
//! This module provides:
//! - The `KeyValueStore` trait (`get`/`put`/`delete` plus batch forms)
//! - An in-memory backend for tests and embedding (`memory`)
//! - An atomic JSON-file backend used by the CLI (`file`)
//! - An OS keyring backend behind the `keyring-store` feature (`keyring`)
//!
//! Backends guarantee per-key atomicity.  The batch methods have default
//! implementations that loop over single-key calls; backends that can
//! write several keys in one step override them.

pub mod file;
pub mod memory;

#[cfg(feature = "keyring-store")]
pub mod keyring;

pub use file::FileStore;
pub use memory::MemoryStore;

#[cfg(feature = "keyring-store")]
pub use self::keyring::KeyringStore;

use tracing::warn;

use crate::errors::Result;

/// A string-to-string persistent store.
///
/// Every method returns `VaultError::StorageFailure` (or `Io`) when the
/// medium itself fails.  A missing key is never an error: `get` returns
/// `Ok(None)` and `delete` succeeds.
pub trait KeyValueStore: Send + Sync {
    /// Read a single slot.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a single slot, replacing any previous value.
    fn put(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a single slot.  Removing an absent slot succeeds.
    fn delete(&self, key: &str) -> Result<()>;

    /// List every stored key that starts with `prefix`, sorted.
    fn keys(&self, prefix: &str) -> Result<Vec<String>>;

    /// Returns `true` if the slot exists.
    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// Read several slots, preserving the order of `keys`.
    fn get_many(&self, keys: &[String]) -> Result<Vec<Option<String>>> {
        keys.iter().map(|k| self.get(k)).collect()
    }

    /// Write several slots.
    ///
    /// The default implementation writes one slot at a time and, if a
    /// write fails, removes the slots it already wrote before returning
    /// the original error.
    fn put_many(&self, entries: &[(String, String)]) -> Result<()> {
        for (written, (key, value)) in entries.iter().enumerate() {
            if let Err(e) = self.put(key, value) {
                warn!(
                    written,
                    total = entries.len(),
                    "batch write failed, rolling back"
                );
                for (done, _) in &entries[..written] {
                    let _ = self.delete(done);
                }
                return Err(e);
            }
        }
        Ok(())
    }

    /// Remove several slots.
    ///
    /// Attempts every key even after a failure and returns the first
    /// error encountered.
    fn delete_many(&self, keys: &[String]) -> Result<()> {
        let mut first_error = None;
        for key in keys {
            if let Err(e) = self.delete(key) {
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        (**self).put(key, value)
    }

    fn delete(&self, key: &str) -> Result<()> {
        (**self).delete(key)
    }

    fn keys(&self, prefix: &str) -> Result<Vec<String>> {
        (**self).keys(prefix)
    }

    fn contains(&self, key: &str) -> Result<bool> {
        (**self).contains(key)
    }

    fn get_many(&self, keys: &[String]) -> Result<Vec<Option<String>>> {
        (**self).get_many(keys)
    }

    fn put_many(&self, entries: &[(String, String)]) -> Result<()> {
        (**self).put_many(entries)
    }

    fn delete_many(&self, keys: &[String]) -> Result<()> {
        (**self).delete_many(keys)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        (**self).put(key, value)
    }

    fn delete(&self, key: &str) -> Result<()> {
        (**self).delete(key)
    }

    fn keys(&self, prefix: &str) -> Result<Vec<String>> {
        (**self).keys(prefix)
    }

    fn contains(&self, key: &str) -> Result<bool> {
        (**self).contains(key)
    }

    fn get_many(&self, keys: &[String]) -> Result<Vec<Option<String>>> {
        (**self).get_many(keys)
    }

    fn put_many(&self, entries: &[(String, String)]) -> Result<()> {
        (**self).put_many(entries)
    }

    fn delete_many(&self, keys: &[String]) -> Result<()> {
        (**self).delete_many(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::VaultError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Accepts `budget` writes, then fails every write after that.
    struct Flaky {
        inner: MemoryStore,
        budget: AtomicUsize,
    }

    impl KeyValueStore for Flaky {
        fn get(&self, key: &str) -> Result<Option<String>> {
            self.inner.get(key)
        }

        fn put(&self, key: &str, value: &str) -> Result<()> {
            if self.budget.load(Ordering::SeqCst) == 0 {
                return Err(VaultError::StorageFailure("quota exceeded".into()));
            }
            self.budget.fetch_sub(1, Ordering::SeqCst);
            self.inner.put(key, value)
        }

        fn delete(&self, key: &str) -> Result<()> {
            self.inner.delete(key)
        }

        fn keys(&self, prefix: &str) -> Result<Vec<String>> {
            self.inner.keys(prefix)
        }
    }

    fn entries(n: usize) -> Vec<(String, String)> {
        (0..n).map(|i| (format!("k{i}"), format!("v{i}"))).collect()
    }

    #[test]
    fn default_put_many_rolls_back_on_failure() {
        let store = Flaky {
            inner: MemoryStore::new(),
            budget: AtomicUsize::new(2),
        };

        let result = store.put_many(&entries(4));
        assert!(matches!(result, Err(VaultError::StorageFailure(_))));
        assert!(store.keys("").unwrap().is_empty());
    }

    #[test]
    fn default_put_many_writes_everything_when_healthy() {
        let store = Flaky {
            inner: MemoryStore::new(),
            budget: AtomicUsize::new(10),
        };

        store.put_many(&entries(3)).unwrap();
        assert_eq!(store.keys("k").unwrap(), vec!["k0", "k1", "k2"]);
    }

    #[test]
    fn get_many_preserves_order_and_gaps() {
        let store = MemoryStore::new();
        store.put("b", "2").unwrap();
        store.put("a", "1").unwrap();

        let keys = vec!["a".to_string(), "missing".to_string(), "b".to_string()];
        let values = store.get_many(&keys).unwrap();
        assert_eq!(
            values,
            vec![Some("1".to_string()), None, Some("2".to_string())]
        );
    }
}
