//! Key id generation.
//!
//! A key id looks like `{service}_{unix_millis}_{suffix}` where the
//! suffix is nine random lowercase alphanumerics.  The service label is
//! cleaned so a key id never contains `:`, which separates the key id
//! from the slot suffix in storage.

use chrono::Utc;
use rand::Rng;

/// Characters used for the random suffix.
const SUFFIX_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Length of the random suffix.
const SUFFIX_LEN: usize = 9;

/// Maximum accepted key id length.
const MAX_KEY_ID_LEN: usize = 256;

/// Maximum number of service characters kept in a key id.
const MAX_SERVICE_LEN: usize = 64;

/// Build a new key id for `service`.
pub fn generate(service: &str) -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| SUFFIX_CHARSET[rng.random_range(0..SUFFIX_CHARSET.len())] as char)
        .collect();

    format!(
        "{}_{}_{}",
        sanitize_service(service),
        Utc::now().timestamp_millis(),
        suffix
    )
}

/// Replace anything outside `[A-Za-z0-9._-]` with `-`.
///
/// An empty label becomes `secret`.
pub fn sanitize_service(service: &str) -> String {
    let cleaned: String = service
        .chars()
        .take(MAX_SERVICE_LEN)
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.' {
                c
            } else {
                '-'
            }
        })
        .collect();

    if cleaned.is_empty() {
        "secret".to_string()
    } else {
        cleaned
    }
}

/// Cheap syntactic check applied before any storage lookup.
pub fn is_plausible(key_id: &str) -> bool {
    !key_id.is_empty()
        && key_id.len() <= MAX_KEY_ID_LEN
        && !key_id.contains(':')
        && !key_id.chars().any(char::is_control)
}
