//! Per-item hashing and the digest folds.
//!
//! Every 64-bit value fed to a fold is written in little-endian byte order,
//! so digests are reproducible across processes and platforms.
use sha2::{Digest, Sha256};
use xxhash_rust::xxh64::{xxh64, Xxh64};

/// Hashes a work unit identity.
///
/// The hash of `name` is seeded with the hash of `namespace`, so identical
/// names in different namespaces do not collide by construction, and no
/// separator is needed to tell `("ab", "c")` from `("a", "bc")`.
pub fn item_hash(namespace: &str, name: &str) -> u64 {
    xxh64(name.as_bytes(), xxh64(namespace.as_bytes(), 0))
}

/// Folds the sequence through a streaming XXH64. The result is the 64-bit
/// sum in big-endian byte order.
pub fn fold_xxh64(hashes: &[u64]) -> [u8; 8] {
    let mut h = Xxh64::new(0);
    for hash in hashes {
        h.update(&hash.to_le_bytes());
    }
    h.digest().to_be_bytes()
}

/// Folds the sequence through SHA-256.
pub fn fold_sha256(hashes: &[u64]) -> [u8; 32] {
    let mut h = Sha256::new();
    for hash in hashes {
        h.update(hash.to_le_bytes());
    }
    h.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_item_hash_deterministic() {
        assert_eq!(item_hash("ns1", "a"), item_hash("ns1", "a"));
        assert_eq!(item_hash("", ""), item_hash("", ""));
    }

    #[test]
    fn test_item_hash_is_seeded_by_namespace() {
        assert_eq!(item_hash("ns", "pod"), xxh64(b"pod", xxh64(b"ns", 0)));
        assert_ne!(item_hash("a", "x"), item_hash("b", "x"));
    }

    #[test]
    fn test_item_hash_no_concatenation_ambiguity() {
        assert_ne!(item_hash("ab", "c"), item_hash("a", "bc"));
        assert_ne!(item_hash("", "abc"), item_hash("abc", ""));
    }

    #[test]
    fn test_item_hash_namespace_sample_no_collisions() {
        let hashes: HashSet<u64> = (0..10_000)
            .map(|i| item_hash(&format!("namespace-{}", i), "x"))
            .collect();
        assert_eq!(hashes.len(), 10_000);
    }

    #[test]
    fn test_fold_empty() {
        // XXH64 of zero bytes, seed 0
        assert_eq!(hex::encode(fold_xxh64(&[])), "ef46db3751d8e999");
        assert_eq!(
            hex::encode(fold_sha256(&[])),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
        );
    }

    #[test]
    fn test_fold_little_endian_layout() {
        let value: u64 = 0x0102030405060708;
        let bytes = [8u8, 7, 6, 5, 4, 3, 2, 1];
        assert_eq!(fold_xxh64(&[value]), xxh64(&bytes, 0).to_be_bytes());
        let expected: [u8; 32] = Sha256::digest(bytes).into();
        assert_eq!(fold_sha256(&[value]), expected);
    }

    #[test]
    fn test_fold_streams_values() {
        let values = [1u64, 2, u64::MAX];
        let mut buf = vec![];
        for v in values {
            buf.extend_from_slice(&v.to_le_bytes());
        }
        assert_eq!(fold_xxh64(&values), xxh64(&buf, 0).to_be_bytes());
    }

    #[test]
    fn test_fold_is_order_sensitive() {
        // canonical ordering is the accumulator's job
        assert_ne!(fold_xxh64(&[1, 2]), fold_xxh64(&[2, 1]));
        assert_ne!(fold_sha256(&[1, 2]), fold_sha256(&[2, 1]));
    }
}
