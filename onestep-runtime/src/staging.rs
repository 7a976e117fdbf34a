//! Content-addressed input staging
//!
//! Inputs are persisted under their own Keccak-256 hash and referenced by
//! hash alone from then on. Several staged payloads combine into one input
//! commitment by hashing the concatenation of their hashes in caller order;
//! that combined digest, not the payloads, is what lands in guest memory.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use onestep_spec::Digest;

use crate::crypto::keccak256;
use crate::error::Result;

pub struct InputStager {
    basedir: PathBuf,
}

impl InputStager {
    /// Create a stager rooted at `basedir`, creating the directory if needed.
    pub fn new(basedir: impl Into<PathBuf>) -> Result<Self> {
        let basedir = basedir.into();
        fs::create_dir_all(&basedir)?;
        Ok(InputStager { basedir })
    }

    pub fn basedir(&self) -> &Path {
        &self.basedir
    }

    /// Hash `payload` and persist it under the hex digest. Staging the same
    /// bytes again is a no-op returning the same digest.
    pub fn stage(&self, payload: &[u8]) -> Result<Digest> {
        let digest = keccak256(payload);
        let path = self.basedir.join(digest.to_hex());
        if path.exists() {
            debug!(hash = %digest, "payload already staged");
        } else {
            info!(path = %path.display(), len = payload.len(), "staging payload");
            fs::write(&path, payload)?;
        }
        Ok(digest)
    }

    /// Hash the concatenation of `hashes` in the given order. Order matters:
    /// the staging side and any later reconstruction must agree on it.
    pub fn combine(hashes: &[Digest]) -> Digest {
        let mut preimage = Vec::with_capacity(32 * hashes.len());
        for hash in hashes {
            preimage.extend_from_slice(hash.as_bytes());
        }
        keccak256(&preimage)
    }

    /// Combine and persist the concatenated preimage under the combined
    /// digest, so a verifier can recover the constituent hashes.
    pub fn stage_combined(&self, hashes: &[Digest]) -> Result<Digest> {
        let mut preimage = Vec::with_capacity(32 * hashes.len());
        for hash in hashes {
            preimage.extend_from_slice(hash.as_bytes());
        }
        self.stage(&preimage)
    }
}
