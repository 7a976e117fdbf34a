//! Keccak-256 helpers
//!
//! Every commitment in the system, trie leaves and nodes, content addresses,
//! and the combined input hash, uses Keccak-256.

use sha3::{Digest as _, Keccak256};

use onestep_spec::Digest;

/// Keccak-256 of a byte string.
pub fn keccak256(data: &[u8]) -> Digest {
    let mut h = Keccak256::new();
    h.update(data);
    Digest::new(h.finalize().into())
}

/// Keccak-256 of two concatenated digests, the trie node rule.
pub fn keccak256_pair(left: &Digest, right: &Digest) -> Digest {
    let mut h = Keccak256::new();
    h.update(left.as_bytes());
    h.update(right.as_bytes());
    Digest::new(h.finalize().into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_constant() {
        // The well-known Keccak-256 of the empty string.
        assert_eq!(
            keccak256(&[]).to_hex(),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn test_known_vector() {
        assert_eq!(
            keccak256(b"abc").to_hex(),
            "4e03657aea45a94fc7d47ba826c8d667c0d1e6e33a64a036ec44f58fa12d6c45"
        );
    }

    #[test]
    fn test_pair_matches_concat() {
        let a = keccak256(b"left");
        let b = keccak256(b"right");
        let mut concat = Vec::new();
        concat.extend_from_slice(a.as_bytes());
        concat.extend_from_slice(b.as_bytes());
        assert_eq!(keccak256_pair(&a, &b), keccak256(&concat));
        assert_ne!(keccak256_pair(&a, &b), keccak256_pair(&b, &a));
    }
}
