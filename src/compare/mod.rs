//! Constant-time comparison of security-sensitive strings.
//!
//! `secure_compare` pads both inputs to the longer length and compares
//! the padded buffers with `subtle`, so its running time depends only on
//! the longer input's length.  The original-length check is folded in
//! with a constant-time AND after the full byte comparison has run.
//!
//! The format-checking wrappers (`secure_hex_compare`,
//! `secure_base64_compare`, `secure_hash_compare`) reject malformed input
//! early.  That fast path is not constant-time with respect to
//! well-formed vs. malformed input; only well-formed comparisons carry
//! the timing guarantee.
//!
//! None of these functions panic or return errors: "could not compare"
//! is always reported as `false`.

mod hash;

pub use hash::HashAlgorithm;

use std::sync::OnceLock;

use regex::Regex;
use subtle::{Choice, ConstantTimeEq};

/// Compare two byte slices in time that depends only on the longer length.
pub fn secure_compare_bytes(a: &[u8], b: &[u8]) -> bool {
    let max_len = a.len().max(b.len());

    let mut padded_a = vec![0u8; max_len];
    let mut padded_b = vec![0u8; max_len];
    padded_a[..a.len()].copy_from_slice(a);
    padded_b[..b.len()].copy_from_slice(b);

    let bytes_equal: Choice = padded_a.as_slice().ct_eq(padded_b.as_slice());
    let lengths_equal: Choice = (a.len() as u64).ct_eq(&(b.len() as u64));

    (bytes_equal & lengths_equal).into()
}

/// Compare two strings by their UTF-8 bytes.
pub fn secure_compare(a: &str, b: &str) -> bool {
    secure_compare_bytes(a.as_bytes(), b.as_bytes())
}

/// Like `secure_compare`, but an absent input is never equal to anything.
pub fn secure_compare_opt(a: Option<&str>, b: Option<&str>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => secure_compare(a, b),
        _ => false,
    }
}

/// Compare two hex strings.  Either input failing `^[0-9a-fA-F]+$`
/// yields `false` without comparing.
pub fn secure_hex_compare(a: &str, b: &str) -> bool {
    if !is_hex(a) || !is_hex(b) {
        return false;
    }
    secure_compare(a, b)
}

/// Compare two standard-alphabet Base64 strings.  Either input that is
/// empty or fails `^[A-Za-z0-9+/]*={0,2}$` yields `false` without
/// comparing.
pub fn secure_base64_compare(a: &str, b: &str) -> bool {
    if !is_base64(a) || !is_base64(b) {
        return false;
    }
    secure_compare(a, b)
}

/// Compare two hex digests of `algorithm`.  Both must be exactly the
/// digest's hex length.
pub fn secure_hash_compare(a: &str, b: &str, algorithm: HashAlgorithm) -> bool {
    let expected = algorithm.hex_len();
    if a.len() != expected || b.len() != expected {
        return false;
    }
    secure_hex_compare(a, b)
}

/// `secure_hash_compare` with the algorithm given by name
/// (`"md5"`, `"sha1"`, `"sha256"`, `"sha512"`).  Unknown names yield
/// `false`.
pub fn secure_hash_compare_named(a: &str, b: &str, algorithm: &str) -> bool {
    match algorithm.parse::<HashAlgorithm>() {
        Ok(alg) => secure_hash_compare(a, b, alg),
        Err(_) => false,
    }
}

fn is_hex(s: &str) -> bool {
    static HEX: OnceLock<Option<Regex>> = OnceLock::new();
    matches_pattern(&HEX, r"^[0-9a-fA-F]+$", s)
}

fn is_base64(s: &str) -> bool {
    static BASE64: OnceLock<Option<Regex>> = OnceLock::new();
    !s.is_empty() && matches_pattern(&BASE64, r"^[A-Za-z0-9+/]*={0,2}$", s)
}

/// A pattern that fails to compile matches nothing.
fn matches_pattern(cell: &OnceLock<Option<Regex>>, pattern: &str, s: &str) -> bool {
    cell.get_or_init(|| Regex::new(pattern).ok())
        .as_ref()
        .map_or(false, |re| re.is_match(s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_strings_match() {
        assert!(secure_compare("token-abc", "token-abc"));
        assert!(secure_compare("", ""));
    }

    #[test]
    fn different_strings_do_not_match() {
        assert!(!secure_compare("token-abc", "token-abd"));
        assert!(!secure_compare("xoken-abc", "token-abc"));
    }

    #[test]
    fn zero_padding_does_not_fake_equality() {
        // "abc" padded to 4 bytes is "abc\0".
        assert!(!secure_compare("abc", "abc\0"));
        assert!(!secure_compare_bytes(b"", b"\0"));
    }

    #[test]
    fn prefix_is_not_equal() {
        assert!(!secure_compare("secret", "secret-longer"));
        assert!(!secure_compare("secret-longer", "secret"));
    }

    #[test]
    fn absent_inputs_are_false() {
        assert!(!secure_compare_opt(None, None));
        assert!(!secure_compare_opt(Some("a"), None));
        assert!(!secure_compare_opt(None, Some("a")));
        assert!(secure_compare_opt(Some("a"), Some("a")));
    }

    #[test]
    fn hex_format_is_enforced() {
        assert!(!secure_hex_compare("zz", "zz"));
        assert!(!secure_hex_compare("", ""));
        assert!(secure_hex_compare("deadBEEF", "deadBEEF"));
        assert!(!secure_hex_compare("deadbeef", "DEADBEEF"));
    }

    #[test]
    fn base64_format_is_enforced() {
        assert!(secure_base64_compare("aGVsbG8=", "aGVsbG8="));
        assert!(!secure_base64_compare("aGVsbG8=", "aGVsbG9="));
        assert!(!secure_base64_compare("a-b_", "a-b_"));
        assert!(!secure_base64_compare("abc===", "abc==="));
        assert!(!secure_base64_compare("", ""));
    }

    #[test]
    fn hash_length_is_enforced() {
        let a = "a".repeat(64);
        assert!(secure_hash_compare(&a, &a, HashAlgorithm::Sha256));
        assert!(!secure_hash_compare(&a, &a, HashAlgorithm::Sha512));
        assert!(!secure_hash_compare(&a[..63], &a[..63], HashAlgorithm::Sha256));
    }

    #[test]
    fn named_hash_compare() {
        let md5 = "d41d8cd98f00b204e9800998ecf8427e";
        assert!(secure_hash_compare_named(md5, md5, "md5"));
        assert!(secure_hash_compare_named(md5, md5, "MD5"));
        assert!(!secure_hash_compare_named(md5, md5, "sha1"));
        assert!(!secure_hash_compare_named(md5, md5, "crc32"));
    }
}
