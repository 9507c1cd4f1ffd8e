//! Fixed-size partition of an encoded ciphertext into shards.
//!
//! `split` cuts the string into `n` contiguous pieces of
//! `ceil(len / n)` characters; trailing pieces may be shorter or empty.
//! `join` is plain concatenation in index order.

/// Split `encoded` into exactly `n` contiguous shards.
///
/// `n` must be at least 1.
pub fn split(encoded: &str, n: usize) -> Vec<String> {
    let chars: Vec<char> = encoded.chars().collect();
    let len = chars.len();
    let size = (len + n - 1) / n;

    (0..n)
        .map(|i| {
            let start = (i * size).min(len);
            let end = (start + size).min(len);
            chars[start..end].iter().collect()
        })
        .collect()
}

/// Reassemble shards produced by `split`.
pub fn join<S: AsRef<str>>(shards: &[S]) -> String {
    let total = shards.iter().map(|s| s.as_ref().len()).sum();
    let mut out = String::with_capacity(total);
    for shard in shards {
        out.push_str(shard.as_ref());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_into_roughly_equal_pieces() {
        let shards = split("abcdefghij", 3);
        assert_eq!(shards, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn always_returns_n_shards() {
        let shards = split("ab", 4);
        assert_eq!(shards.len(), 4);
        assert_eq!(shards, vec!["a", "b", "", ""]);

        let shards = split("", 3);
        assert_eq!(shards, vec!["", "", ""]);
    }

    #[test]
    fn single_shard_is_whole_string() {
        assert_eq!(split("QUJD", 1), vec!["QUJD"]);
    }

    #[test]
    fn join_restores_original() {
        let encoded = "U2hhcmRWYXVsdCB0ZXN0IHBheWxvYWQ=";
        for n in 1..=8 {
            assert_eq!(join(&split(encoded, n)), encoded);
        }
    }
}
