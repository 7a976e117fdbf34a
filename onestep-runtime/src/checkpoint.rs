//! Checkpoint codec
//!
//! A checkpoint is the immutable `{root, step}` record persisted at capture
//! points. The JSON byte content is the compatibility contract parsed by
//! independent verifiers: field order `root` then `step`, root as `0x` plus
//! 64 lowercase hex chars, step `-1` for the pre-execution state. File
//! naming (`golden.json`, `final.json`, `checkpoint-N.json`) is deployment
//! convention, not part of the contract.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use onestep_spec::Digest;

use crate::error::Result;
use crate::ram::Ram;
use crate::trie;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    #[serde(with = "prefixed_hex")]
    pub root: Digest,
    pub step: i64,
}

impl Checkpoint {
    /// Commit the address space and tag the result with `step`.
    pub fn capture(ram: &Ram, step: i64) -> Self {
        Checkpoint {
            root: trie::state_root(ram),
            step,
        }
    }

    /// Canonical JSON bytes.
    pub fn encode(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Parse the canonical encoding, as an external verifier would.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Persist at `path`, logging size and root.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let data = self.encode()?;
        info!(
            path = %path.display(),
            len = data.len(),
            root = %self.root.to_prefixed_hex(),
            step = self.step,
            "writing checkpoint"
        );
        fs::write(path, data)?;
        Ok(())
    }
}

mod prefixed_hex {
    use serde::{de, Deserialize, Deserializer, Serializer};

    use onestep_spec::Digest;

    pub fn serialize<S: Serializer>(digest: &Digest, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&digest.to_prefixed_hex())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Digest, D::Error> {
        let s = String::deserialize(deserializer)?;
        Digest::from_hex(&s).map_err(de::Error::custom)
    }
}
