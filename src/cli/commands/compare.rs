//! `shardvault compare` — constant-time equality check of two values.

use crate::cli::output;
use crate::cli::CompareFormat;
use crate::compare::{
    secure_base64_compare, secure_compare, secure_hash_compare, secure_hex_compare,
    HashAlgorithm,
};
use crate::errors::{Result, VaultError};

/// Execute the `compare` command.  A mismatch is `CheckFailed`.
pub fn execute(a: &str, b: &str, format: CompareFormat) -> Result<()> {
    if !matches(a, b, format) {
        return Err(VaultError::CheckFailed("Values do not match".into()));
    }
    output::success("Values match");
    Ok(())
}

/// Dispatch to the comparator for `format`.
pub fn matches(a: &str, b: &str, format: CompareFormat) -> bool {
    match format {
        CompareFormat::Raw => secure_compare(a, b),
        CompareFormat::Hex => secure_hex_compare(a, b),
        CompareFormat::Base64 => secure_base64_compare(a, b),
        CompareFormat::Md5 => secure_hash_compare(a, b, HashAlgorithm::Md5),
        CompareFormat::Sha1 => secure_hash_compare(a, b, HashAlgorithm::Sha1),
        CompareFormat::Sha256 => secure_hash_compare(a, b, HashAlgorithm::Sha256),
        CompareFormat::Sha512 => secure_hash_compare(a, b, HashAlgorithm::Sha512),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_and_hex_dispatch() {
        assert!(matches("zz", "zz", CompareFormat::Raw));
        assert!(!matches("zz", "zz", CompareFormat::Hex));
    }

    #[test]
    fn mismatch_is_a_check_failure() {
        assert!(execute("token", "token", CompareFormat::Raw).is_ok());
        assert!(matches!(
            execute("token", "tokem", CompareFormat::Raw),
            Err(VaultError::CheckFailed(_))
        ));
    }

    #[test]
    fn hash_dispatch_checks_length() {
        let sha1 = "da39a3ee5e6b4b0d3255bfef95601890afd80709";
        assert!(matches(sha1, sha1, CompareFormat::Sha1));
        assert!(!matches(sha1, sha1, CompareFormat::Sha256));
    }
}
