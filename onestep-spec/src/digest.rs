//! Commitment digests
//!
//! A `Digest` is the opaque 32-byte Keccak-256 output used for state roots,
//! content addresses, and the combined input commitment. Serde renders it as
//! bare lowercase hex, the form the external hashes artifact carries.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::error::SpecError;

/// Digest length in bytes.
pub const DIGEST_LEN: usize = 32;

/// A 32-byte commitment digest.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct Digest([u8; DIGEST_LEN]);

impl Digest {
    /// The all-zero digest, used as the missing-sibling filler in the trie.
    pub const ZERO: Self = Digest([0; DIGEST_LEN]);

    #[inline]
    pub const fn new(bytes: [u8; DIGEST_LEN]) -> Self {
        Digest(bytes)
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    /// Lowercase hex, no prefix (64 chars).
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// `0x`-prefixed lowercase hex (66 chars), the checkpoint-file form.
    pub fn to_prefixed_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Parse from hex, with or without a `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self, SpecError> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        if s.len() != 2 * DIGEST_LEN {
            return Err(SpecError::InvalidDigestLength(s.len()));
        }
        let bytes = hex::decode(s)
            .map_err(|e| SpecError::InvalidDigestHex(e.to_string()))?;
        let mut out = [0u8; DIGEST_LEN];
        out.copy_from_slice(&bytes);
        Ok(Digest(out))
    }

    /// Copy from a 32-byte slice.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, SpecError> {
        if bytes.len() != DIGEST_LEN {
            return Err(SpecError::InvalidDigestLength(bytes.len()));
        }
        let mut out = [0u8; DIGEST_LEN];
        out.copy_from_slice(bytes);
        Ok(Digest(out))
    }
}

impl From<[u8; DIGEST_LEN]> for Digest {
    fn from(bytes: [u8; DIGEST_LEN]) -> Self {
        Digest(bytes)
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

impl Serialize for Digest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Digest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Digest::from_hex(&s).map_err(de::Error::custom)
    }
}
