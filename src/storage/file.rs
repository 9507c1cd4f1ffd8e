//! JSON-file backend.
//!
//! All slots live in a single JSON object on disk:
//!
//! ```text
//! { "secure_vault_openai_1718000000000_k3j9x0a1b:enckey": "...", ... }
//! ```
//!
//! Every mutation rewrites the whole file through a temp file + rename,
//! so a batch of slots lands on disk together or not at all.  Writers
//! hold an exclusive lock on `<store>.lock` from load to rename, which
//! keeps separate handles and processes from overwriting each other.

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tempfile::NamedTempFile;
use tracing::debug;

use super::KeyValueStore;
use crate::errors::{Result, VaultError};

type Slots = BTreeMap<String, String>;

/// A `KeyValueStore` persisted to one JSON file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    /// Serialises read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl FileStore {
    /// Use the store file at `path`.  The file is created on first write.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Returns the path to the store file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Slots> {
        if !self.path.exists() {
            return Ok(Slots::new());
        }

        let data = fs::read(&self.path).map_err(|e| {
            VaultError::StorageFailure(format!("cannot read {}: {e}", self.path.display()))
        })?;

        if data.is_empty() {
            return Ok(Slots::new());
        }

        serde_json::from_slice(&data).map_err(|e| {
            VaultError::StorageFailure(format!(
                "store file {} is not valid JSON: {e}",
                self.path.display()
            ))
        })
    }

    fn dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    fn lock_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".lock");
        self.dir().join(name)
    }

    fn ensure_dir(&self) -> Result<PathBuf> {
        let dir = self.dir();
        fs::create_dir_all(&dir).map_err(|e| {
            VaultError::StorageFailure(format!(
                "cannot create store directory {}: {e}",
                dir.display()
            ))
        })?;
        Ok(dir)
    }

    fn open_lock_file(&self) -> Result<File> {
        let path = self.lock_path();
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)
            .map_err(|e| {
                VaultError::StorageFailure(format!("cannot open {}: {e}", path.display()))
            })?;
        restrict_permissions(&path)?;
        Ok(file)
    }

    /// Write the whole map atomically: a uniquely named temp file in the
    /// store directory, renamed over the target.
    fn save(&self, dir: &Path, slots: &Slots) -> Result<()> {
        let buf = serde_json::to_vec_pretty(slots)
            .map_err(|e| VaultError::SerializationError(format!("store: {e}")))?;

        let mut tmp = NamedTempFile::new_in(dir)
            .map_err(|e| VaultError::StorageFailure(format!("cannot create temp file: {e}")))?;
        tmp.write_all(&buf)
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| VaultError::StorageFailure(format!("cannot write store: {e}")))?;
        restrict_permissions(tmp.path())?;

        tmp.persist(&self.path)
            .map_err(|e| VaultError::StorageFailure(format!("cannot replace store: {}", e.error)))?;

        debug!(path = %self.path.display(), slots = slots.len(), "store file written");
        Ok(())
    }

    /// Run `f` against the current contents and persist the result,
    /// holding both the in-process and the on-disk lock throughout.
    fn update(&self, f: impl FnOnce(&mut Slots)) -> Result<()> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| VaultError::StorageFailure("file store lock poisoned".into()))?;

        let dir = self.ensure_dir()?;
        let mut file_lock = fd_lock::RwLock::new(self.open_lock_file()?);
        let _held = file_lock
            .write()
            .map_err(|e| VaultError::StorageFailure(format!("cannot lock store: {e}")))?;

        let mut slots = self.load()?;
        f(&mut slots);
        self.save(&dir, &slots)
    }

    fn read(&self) -> Result<Slots> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| VaultError::StorageFailure("file store lock poisoned".into()))?;
        self.load()
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
        .map_err(|e| VaultError::StorageFailure(format!("cannot set store permissions: {e}")))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read()?.remove(key))
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        self.update(|slots| {
            slots.insert(key.to_string(), value.to_string());
        })
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.update(|slots| {
            slots.remove(key);
        })
    }

    fn keys(&self, prefix: &str) -> Result<Vec<String>> {
        Ok(self
            .read()?
            .into_keys()
            .filter(|k| k.starts_with(prefix))
            .collect())
    }

    fn get_many(&self, keys: &[String]) -> Result<Vec<Option<String>>> {
        let mut slots = self.read()?;
        Ok(keys.iter().map(|k| slots.remove(k)).collect())
    }

    fn put_many(&self, entries: &[(String, String)]) -> Result<()> {
        self.update(|slots| {
            for (key, value) in entries {
                slots.insert(key.clone(), value.clone());
            }
        })
    }

    fn delete_many(&self, keys: &[String]) -> Result<()> {
        self.update(|slots| {
            for key in keys {
                slots.remove(key);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path().join("store.json"));
        assert!(store.get("anything").unwrap().is_none());
        assert!(store.keys("").unwrap().is_empty());
    }

    #[test]
    fn writes_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("store.json");

        let store = FileStore::open(&path);
        store
            .put_many(&[
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "2".to_string()),
            ])
            .unwrap();

        let reopened = FileStore::open(&path);
        assert_eq!(reopened.get("a").unwrap().as_deref(), Some("1"));
        assert_eq!(reopened.get("b").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn delete_many_removes_only_named_slots() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path().join("store.json"));
        store.put("a", "1").unwrap();
        store.put("b", "2").unwrap();
        store.put("c", "3").unwrap();

        store
            .delete_many(&["a".to_string(), "c".to_string(), "zz".to_string()])
            .unwrap();
        assert_eq!(store.keys("").unwrap(), vec!["b"]);
    }

    #[test]
    fn corrupt_file_is_a_storage_failure() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "not json {{").unwrap();

        let store = FileStore::open(&path);
        assert!(matches!(
            store.get("a"),
            Err(VaultError::StorageFailure(_))
        ));
    }

    #[test]
    fn only_store_and_lock_file_remain() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path().join("store.json"));
        store.put("a", "1").unwrap();
        store.put("b", "2").unwrap();

        let mut names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["store.json", "store.json.lock"]);
    }

    #[test]
    fn separate_handles_do_not_lose_writes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let path = path.clone();
                std::thread::spawn(move || {
                    let store = FileStore::open(&path);
                    for i in 0..10 {
                        store.put(&format!("t{t}-{i}"), "v").unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(FileStore::open(&path).keys("t").unwrap().len(), 80);
    }

    #[cfg(unix)]
    #[test]
    fn store_file_has_restrictive_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        FileStore::open(&path).put("a", "1").unwrap();

        let perms = fs::metadata(&path).unwrap().permissions();
        assert_eq!(perms.mode() & 0o777, 0o600);
    }
}
