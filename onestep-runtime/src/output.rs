//! Output handshake reader
//!
//! After a normal halt the guest leaves a fixed 0x24-byte window at
//! `0x3000_0800`: a 4-byte magic followed by the 32-byte result commitment.
//! The magic is a convention, not a structural guarantee, so a mismatch is
//! recorded and logged rather than fatal. The result pairs with the input
//! commitment into the final `{InputHash, OutputHash}` artifact.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use onestep_spec::{Digest, OUTPUT_MAGIC, OUTPUT_WINDOW_BASE, OUTPUT_WINDOW_LEN};

use crate::engine::MachineState;
use crate::error::Result;

/// Decoded output window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputWindow {
    pub magic: [u8; 4],
    pub hash: Digest,
}

impl OutputWindow {
    pub fn magic_ok(&self) -> bool {
        self.magic == OUTPUT_MAGIC
    }
}

/// Read the output window from guest memory after halt.
pub fn read_output<M: MachineState + ?Sized>(machine: &M) -> Result<OutputWindow> {
    let mut buf = [0u8; OUTPUT_WINDOW_LEN];
    machine.read_memory(OUTPUT_WINDOW_BASE, &mut buf)?;
    let mut magic = [0u8; 4];
    magic.copy_from_slice(&buf[..4]);
    let hash = Digest::from_slice(&buf[4..])?;
    if magic == OUTPUT_MAGIC {
        info!(output = %hash, "output window read");
    } else {
        warn!(found = %hex::encode(magic), "output window magic mismatch");
    }
    Ok(OutputWindow { magic, hash })
}

/// The externally consumed proof-of-execution artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Hashes {
    pub input_hash: Digest,
    pub output_hash: Digest,
}

impl Hashes {
    pub fn new(input_hash: Digest, output_hash: Digest) -> Self {
        Hashes {
            input_hash,
            output_hash,
        }
    }

    /// Persist as `hashes.json`-style content at `path`.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let data = serde_json::to_vec(self)?;
        info!(path = %path.display(), "writing hashes artifact");
        fs::write(path, data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hashes_json_field_names() {
        let hashes = Hashes::new(Digest::new([0x11; 32]), Digest::new([0x22; 32]));
        let json = serde_json::to_string(&hashes).unwrap();
        assert_eq!(
            json,
            format!(
                "{{\"InputHash\":\"{}\",\"OutputHash\":\"{}\"}}",
                "11".repeat(32),
                "22".repeat(32)
            )
        );
    }

    #[test]
    fn test_hashes_write_to() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hashes.json");
        let hashes = Hashes::new(Digest::new([1; 32]), Digest::new([2; 32]));
        hashes.write_to(&path).unwrap();
        let back: Hashes = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        assert_eq!(back, hashes);
    }

    #[test]
    fn test_magic_ok() {
        let good = OutputWindow {
            magic: OUTPUT_MAGIC,
            hash: Digest::ZERO,
        };
        assert!(good.magic_ok());
        let bad = OutputWindow {
            magic: [0, 0, 0, 0],
            hash: Digest::ZERO,
        };
        assert!(!bad.magic_ok());
    }
}
