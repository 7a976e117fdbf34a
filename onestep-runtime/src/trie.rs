//! Canonical state commitment
//!
//! Reduces a sparse address space to a single Keccak-256 root. The scheme is
//! a compatibility contract with external verifiers and is pinned exactly:
//!
//! 1. The leaf set is every register-bank slot (all 36, zero or not) plus
//!    every populated non-bank address, sorted by ascending address.
//! 2. `leaf = Keccak256(be32(address) || be32(word))`.
//! 3. Levels reduce pairwise left to right with `Keccak256(left || right)`;
//!    a trailing odd node pairs with the all-zero digest.
//! 4. An empty leaf set commits to `Keccak256("")`.
//!
//! Sorting the leaves makes the root independent of insertion order, and the
//! zero-removal invariant of [`Ram`] makes "absent" and "written zero"
//! commit identically outside the bank.

use onestep_spec::{register::is_bank_addr, Address, Digest, Register, Word};

use crate::crypto::{keccak256, keccak256_pair};
use crate::ram::Ram;

/// Root of an address space with no entries at all: Keccak-256 of the empty
/// byte string,
/// `c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470`.
pub fn empty_root() -> Digest {
    keccak256(&[])
}

fn leaf(addr: Address, word: Word) -> Digest {
    let mut buf = [0u8; 8];
    buf[..4].copy_from_slice(&addr.to_be_bytes());
    buf[4..].copy_from_slice(&word.to_be_bytes());
    keccak256(&buf)
}

/// Commit the full address space, register bank included, to a single root.
pub fn state_root(ram: &Ram) -> Digest {
    let mut entries: Vec<(Address, Word)> = ram
        .iter()
        .filter(|&(addr, word)| !is_bank_addr(addr) && word != 0)
        .collect();
    // The bank is always materialized, zero-valued slots included.
    for reg in Register::bank() {
        let addr = reg.bank_addr();
        entries.push((addr, ram.read(addr)));
    }
    entries.sort_unstable_by_key(|&(addr, _)| addr);

    reduce(entries.iter().map(|&(addr, word)| leaf(addr, word)).collect())
}

fn reduce(mut level: Vec<Digest>) -> Digest {
    if level.is_empty() {
        return empty_root();
    }
    while level.len() > 1 {
        level = level
            .chunks(2)
            .map(|pair| match pair {
                [l, r] => keccak256_pair(l, r),
                [l] => keccak256_pair(l, &Digest::ZERO),
                _ => unreachable!(),
            })
            .collect();
    }
    level[0]
}
