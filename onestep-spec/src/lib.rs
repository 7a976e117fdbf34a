//! # onestep conventions
//!
//! Shared conventions for committing the state of a stepwise 32-bit machine:
//! the reserved register bank, the guest I/O windows, the halt sentinels, and
//! the `Digest` commitment type. Everything here is part of the compatibility
//! contract between the committing side and any independent verifier, so the
//! values are pinned and must not drift.
//!
//! ## Memory conventions
//! - Sparse 32-bit address space of 32-bit words, big-endian byte packing
//! - Register bank: 36 words at `0xC000_0000` (r0-r31, pc, hi, lo, heap)
//! - Combined input commitment written at `0x3000_0000` before start
//! - Output handshake window at `0x3000_0800` (4-byte magic + 32-byte digest)
//! - Halt sentinels: pc `0x5EAD_0000` (guest completion), `0x5EAD_0004`
//!   (controller-forced stop)

pub mod digest;
pub mod error;
pub mod register;

pub use digest::{Digest, DIGEST_LEN};
pub use error::SpecError;
pub use register::{is_bank_addr, Register, NUM_BANK_WORDS};

/// Base address of the reserved register bank.
pub const REGISTER_BANK_BASE: Address = 0xC000_0000;

/// Address the combined input commitment is written to before execution.
pub const INPUT_COMMITMENT_ADDR: Address = 0x3000_0000;

/// Base of the output handshake window.
pub const OUTPUT_WINDOW_BASE: Address = 0x3000_0800;

/// Size of the output handshake window in bytes (magic + digest).
pub const OUTPUT_WINDOW_LEN: usize = 0x24;

/// Magic constant opening a well-formed output window.
pub const OUTPUT_MAGIC: [u8; 4] = [0x13, 0x37, 0xf0, 0x0d];

/// Program counter value a guest branches to on intentional completion.
pub const HALT_PC: Address = 0x5EAD_0000;

/// Program counter value forced by the controller at a target step.
pub const HALT_PC_FORCED: Address = 0x5EAD_0004;

/// Step tag of the pre-execution ("golden") checkpoint.
pub const GOLDEN_STEP: i64 = -1;

/// Machine word.
pub type Word = u32;

/// Machine address.
pub type Address = u32;
