//! Storage slot names for one record.
//!
//! ```text
//! {prefix}{key_id}:enckey        Base64 data key
//! {prefix}{key_id}:shard:{i}     Base64 fragment i of nonce || ciphertext
//! ```

const KEY_SUFFIX: &str = ":enckey";
const SHARD_INFIX: &str = ":shard:";

/// The full set of slot names belonging to one key id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSlots {
    pub key: String,
    pub shards: Vec<String>,
}

impl RecordSlots {
    pub fn new(prefix: &str, key_id: &str, shard_count: usize) -> Self {
        Self {
            key: format!("{prefix}{key_id}{KEY_SUFFIX}"),
            shards: (0..shard_count)
                .map(|i| format!("{prefix}{key_id}{SHARD_INFIX}{i}"))
                .collect(),
        }
    }

    /// Key slot first, then the shards in index order.
    pub fn all(&self) -> Vec<String> {
        let mut slots = Vec::with_capacity(self.shards.len() + 1);
        slots.push(self.key.clone());
        slots.extend(self.shards.iter().cloned());
        slots
    }
}

/// Recover the key id from a key slot name, if `slot` is one.
pub fn key_id_from_key_slot<'a>(prefix: &str, slot: &'a str) -> Option<&'a str> {
    slot.strip_prefix(prefix)?
        .strip_suffix(KEY_SUFFIX)
        .filter(|id| !id.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_names_follow_layout() {
        let slots = RecordSlots::new("secure_vault_", "openai_1_abc", 3);
        assert_eq!(slots.key, "secure_vault_openai_1_abc:enckey");
        assert_eq!(
            slots.shards,
            vec![
                "secure_vault_openai_1_abc:shard:0",
                "secure_vault_openai_1_abc:shard:1",
                "secure_vault_openai_1_abc:shard:2",
            ]
        );
        assert_eq!(slots.all().len(), 4);
        assert_eq!(slots.all()[0], slots.key);
    }

    #[test]
    fn key_id_parsed_back_from_key_slot() {
        assert_eq!(
            key_id_from_key_slot("p_", "p_svc_1_x:enckey"),
            Some("svc_1_x")
        );
        assert_eq!(key_id_from_key_slot("p_", "p_svc_1_x:shard:0"), None);
        assert_eq!(key_id_from_key_slot("p_", "other:enckey"), None);
        assert_eq!(key_id_from_key_slot("p_", "p_:enckey"), None);
    }
}
