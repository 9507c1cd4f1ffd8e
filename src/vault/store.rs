//! High-level vault operations.
//!
//! `SecretVault` wraps a `KeyValueStore` and the crypto layer so that
//! callers work with four calls: `store_key`, `retrieve_key`,
//! `verify_key` and `delete_key`.
//!
//! Failure policy:
//! - a missing slot, undecodable Base64, a wrong key or a failed GCM tag
//!   all come back as `None` / `false`, indistinguishable from each other;
//! - a failing storage medium comes back as `VaultError::StorageFailure`.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use tracing::{debug, warn};
use zeroize::{Zeroize, Zeroizing};

use crate::crypto::encryption::{decrypt, encrypt};
use crate::crypto::keys::DataKey;
use crate::errors::{Result, VaultError};
use crate::storage::KeyValueStore;

use super::key_id;
use super::layout::{self, RecordSlots};
use super::options::VaultOptions;
use super::shard;

/// The vault handle.  Construct one per store at application start and
/// pass it to whoever needs it.
pub struct SecretVault<S> {
    store: S,
    options: VaultOptions,
}

impl<S: KeyValueStore> SecretVault<S> {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Create a vault over `store` with the default options
    /// (`secure_vault_` prefix, 3 shards).
    pub fn new(store: S) -> Self {
        Self {
            store,
            options: VaultOptions::default(),
        }
    }

    /// Create a vault with explicit options, validating them first.
    pub fn with_options(store: S, options: VaultOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { store, options })
    }

    // ------------------------------------------------------------------
    // Secret operations
    // ------------------------------------------------------------------

    /// Encrypt `secret`, shard it, and persist it.  Returns the new key id.
    ///
    /// All `N + 1` slots are handed to the store in one `put_many` call.
    pub fn store_key(&self, service: &str, secret: &str) -> Result<String> {
        let key_id = self.fresh_key_id(service)?;
        let slots = self.slots(&key_id);

        let key = DataKey::generate();
        let blob = encrypt(key.as_bytes(), secret.as_bytes())?;
        let encoded = Zeroizing::new(BASE64.encode(&blob));
        let shards = shard::split(&encoded, self.options.shard_count);

        let mut entries = Vec::with_capacity(shards.len() + 1);
        entries.push((slots.key.clone(), key.to_base64().to_string()));
        entries.extend(slots.shards.iter().cloned().zip(shards));

        let written = self.store.put_many(&entries);

        // The key slot value is raw key material.
        for (_, value) in entries.iter_mut() {
            value.zeroize();
        }

        written.map_err(into_storage_failure)?;

        debug!(
            key_id = %key_id,
            shards = self.options.shard_count,
            "secret stored"
        );
        Ok(key_id)
    }

    /// Reassemble and decrypt the secret stored under `key_id`.
    ///
    /// Returns `Ok(None)` if any slot is missing or the record does not
    /// decrypt.  Only a storage-medium failure is an `Err`.
    pub fn retrieve_key(&self, key_id: &str) -> Result<Option<Zeroizing<String>>> {
        let Some((key_b64, encoded)) = self.read_record(key_id)? else {
            debug!(key_id = %key_id, "retrieve: record absent");
            return Ok(None);
        };

        match open_record(&key_b64, &encoded) {
            Ok(secret) => Ok(Some(secret)),
            Err(VaultError::NotFound) => {
                debug!(key_id = %key_id, "retrieve: record unreadable");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Returns `true` iff the key slot and all shard slots exist.
    ///
    /// No decryption is attempted.
    pub fn verify_key(&self, key_id: &str) -> Result<bool> {
        if !key_id::is_plausible(key_id) {
            return Ok(false);
        }
        let values = self
            .store
            .get_many(&self.slots(key_id).all())
            .map_err(into_storage_failure)?;
        Ok(values.iter().all(Option::is_some))
    }

    /// Remove the key slot and every shard slot.
    ///
    /// Idempotent: an absent record still yields `true`.  Returns
    /// `false` only if the store failed.
    pub fn delete_key(&self, key_id: &str) -> bool {
        if !key_id::is_plausible(key_id) {
            return true;
        }
        match self.store.delete_many(&self.slots(key_id).all()) {
            Ok(()) => {
                debug!(key_id = %key_id, "secret deleted");
                true
            }
            Err(e) => {
                warn!(key_id = %key_id, error = %e, "delete failed");
                false
            }
        }
    }

    /// Replace the secret behind `key_id` with `new_secret`.
    ///
    /// Store first, then delete: the new record is written before the
    /// old one is removed.  If the old record cannot be removed the new
    /// one is discarded and the call fails.  Returns the new key id.
    pub fn rotate_key(&self, key_id: &str, service: &str, new_secret: &str) -> Result<String> {
        let new_id = self.store_key(service, new_secret)?;

        if !self.delete_key(key_id) {
            self.delete_key(&new_id);
            return Err(VaultError::StorageFailure(format!(
                "could not remove previous record '{key_id}' during rotation"
            )));
        }

        debug!(old = %key_id, new = %new_id, "secret rotated");
        Ok(new_id)
    }

    /// List the key ids of every complete record, sorted.
    pub fn list_key_ids(&self) -> Result<Vec<String>> {
        let prefix = &self.options.prefix;
        let slots = self.store.keys(prefix).map_err(into_storage_failure)?;

        let mut ids = Vec::new();
        for slot in &slots {
            if let Some(id) = layout::key_id_from_key_slot(prefix, slot) {
                if self.verify_key(id)? {
                    ids.push(id.to_string());
                }
            }
        }
        ids.sort();
        Ok(ids)
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Returns the options this vault was built with.
    pub fn options(&self) -> &VaultOptions {
        &self.options
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Slot names for `key_id` under this vault's layout.
    pub fn slots(&self, key_id: &str) -> RecordSlots {
        RecordSlots::new(&self.options.prefix, key_id, self.options.shard_count)
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    /// Pick a key id none of whose slots are in use.
    fn fresh_key_id(&self, service: &str) -> Result<String> {
        for attempt in 1..=self.options.key_id_attempts {
            let candidate = key_id::generate(service);
            let values = self
                .store
                .get_many(&self.slots(&candidate).all())
                .map_err(into_storage_failure)?;

            if values.iter().all(Option::is_none) {
                return Ok(candidate);
            }
            warn!(attempt, key_id = %candidate, "key id already in use, regenerating");
        }
        Err(VaultError::KeyIdCollision(self.options.key_id_attempts))
    }

    /// Read every slot of a record in one batch.
    ///
    /// Returns the encoded key and the reassembled encoded blob, or
    /// `None` if any slot is missing.
    fn read_record(&self, key_id: &str) -> Result<Option<(Zeroizing<String>, Zeroizing<String>)>> {
        if !key_id::is_plausible(key_id) {
            return Ok(None);
        }

        let mut values = self
            .store
            .get_many(&self.slots(key_id).all())
            .map_err(into_storage_failure)?
            .into_iter();

        let Some(Some(key_b64)) = values.next() else {
            return Ok(None);
        };
        let key_b64 = Zeroizing::new(key_b64);

        let shards: Option<Vec<String>> = values.collect();
        let Some(shards) = shards else {
            return Ok(None);
        };

        Ok(Some((key_b64, Zeroizing::new(shard::join(&shards)))))
    }
}

/// Decode the key and blob and decrypt.  Every failure is `NotFound`.
fn open_record(key_b64: &str, encoded: &str) -> Result<Zeroizing<String>> {
    let key = DataKey::from_base64(key_b64)?;
    let blob = BASE64.decode(encoded).map_err(|_| VaultError::NotFound)?;
    let plaintext = decrypt(key.as_bytes(), &blob)?;

    String::from_utf8(plaintext).map(Zeroizing::new).map_err(|e| {
        let mut bad_bytes = e.into_bytes();
        bad_bytes.zeroize();
        VaultError::NotFound
    })
}

/// Anything the store reports is an operational failure of the medium.
fn into_storage_failure(e: VaultError) -> VaultError {
    match e {
        VaultError::StorageFailure(_) => e,
        other => VaultError::StorageFailure(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn vault() -> SecretVault<MemoryStore> {
        SecretVault::new(MemoryStore::new())
    }

    #[test]
    fn store_writes_key_and_shards_only() {
        let vault = vault();
        let id = vault.store_key("openai", "sk-test-123").unwrap();

        let mut expected = vault.slots(&id).all();
        expected.sort();
        assert_eq!(vault.store().keys("").unwrap(), expected);
    }

    #[test]
    fn no_slot_contains_the_plaintext() {
        let vault = vault();
        let secret = "plain-secret-value";
        let id = vault.store_key("svc", secret).unwrap();

        for slot in vault.slots(&id).all() {
            let value = vault.store().get(&slot).unwrap().unwrap();
            assert!(!value.contains(secret));
        }
    }

    #[test]
    fn shards_concatenate_to_valid_base64_blob() {
        let vault = vault();
        let id = vault.store_key("svc", "hello").unwrap();

        let shards: Vec<String> = vault
            .slots(&id)
            .shards
            .iter()
            .map(|s| vault.store().get(s).unwrap().unwrap())
            .collect();
        let blob = BASE64.decode(shard::join(&shards)).unwrap();
        // nonce + 5 bytes + tag
        assert_eq!(blob.len(), 12 + 5 + 16);
    }

    #[test]
    fn custom_options_change_layout() {
        let opts = VaultOptions {
            prefix: "app_".into(),
            shard_count: 5,
            ..VaultOptions::default()
        };
        let vault = SecretVault::with_options(MemoryStore::new(), opts).unwrap();
        let id = vault.store_key("svc", "value").unwrap();

        assert_eq!(vault.store().keys("app_").unwrap().len(), 6);
        assert_eq!(vault.retrieve_key(&id).unwrap().as_deref().map(String::as_str), Some("value"));
    }

    #[test]
    fn with_options_validates() {
        let opts = VaultOptions {
            shard_count: 0,
            ..VaultOptions::default()
        };
        assert!(SecretVault::with_options(MemoryStore::new(), opts).is_err());
    }

    #[test]
    fn implausible_ids_are_absent() {
        let vault = vault();
        assert!(!vault.verify_key("").unwrap());
        assert!(!vault.verify_key("x:enckey").unwrap());
        assert!(vault.retrieve_key("a\u{0}b").unwrap().is_none());
    }

    #[test]
    fn implausible_ids_never_reach_the_store_on_delete() {
        let vault = vault();
        vault.store().put("secure_vault_:enckey", "foreign").unwrap();

        assert!(vault.delete_key(""));
        assert!(vault.delete_key("x:y"));
        assert_eq!(
            vault.store().get("secure_vault_:enckey").unwrap().as_deref(),
            Some("foreign")
        );
    }
}
