//! Register bank mapping
//!
//! The emulator's register file is committed uniformly with memory by copying
//! it into 36 consecutive words of a reserved high region. The bijection
//! between logical registers and bank addresses below is fixed; both sides of
//! a dispute must agree on it byte for byte.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Address, REGISTER_BANK_BASE};

/// Number of words in the reserved register bank (r0-r31, pc, hi, lo, heap).
pub const NUM_BANK_WORDS: usize = 36;

/// A logical register and its slot in the reserved bank.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Register {
    R0 = 0,
    R1 = 1,
    R2 = 2,
    R3 = 3,
    R4 = 4,
    R5 = 5,
    R6 = 6,
    R7 = 7,
    R8 = 8,
    R9 = 9,
    R10 = 10,
    R11 = 11,
    R12 = 12,
    R13 = 13,
    R14 = 14,
    R15 = 15,
    R16 = 16,
    R17 = 17,
    R18 = 18,
    R19 = 19,
    R20 = 20,
    R21 = 21,
    R22 = 22,
    R23 = 23,
    R24 = 24,
    R25 = 25,
    R26 = 26,
    R27 = 27,
    R28 = 28,
    R29 = 29,
    R30 = 30,
    R31 = 31,
    /// Program counter.
    Pc = 32,
    /// Multiply/divide high word.
    Hi = 33,
    /// Multiply/divide low word.
    Lo = 34,
    /// Heap break pointer.
    Heap = 35,
}

impl Register {
    pub const ZERO: Self = Self::R0;

    #[inline]
    pub fn from_index(index: usize) -> Option<Self> {
        if index < NUM_BANK_WORDS {
            Some(unsafe { std::mem::transmute(index as u8) })
        } else {
            None
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Address of this register's slot in the reserved bank.
    #[inline]
    pub fn bank_addr(self) -> Address {
        REGISTER_BANK_BASE + 4 * self as Address
    }

    /// True for r0-r31.
    #[inline]
    pub fn is_general(self) -> bool {
        (self as usize) < 32
    }

    /// All 36 bank registers in slot order.
    pub fn bank() -> impl Iterator<Item = Register> {
        (0..NUM_BANK_WORDS).filter_map(Register::from_index)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Pc => "pc",
            Self::Hi => "hi",
            Self::Lo => "lo",
            Self::Heap => "heap",
            _ => GENERAL_NAMES[self.index()],
        }
    }
}

const GENERAL_NAMES: [&str; 32] = [
    "r0", "r1", "r2", "r3", "r4", "r5", "r6", "r7", "r8", "r9", "r10", "r11",
    "r12", "r13", "r14", "r15", "r16", "r17", "r18", "r19", "r20", "r21",
    "r22", "r23", "r24", "r25", "r26", "r27", "r28", "r29", "r30", "r31",
];

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// True for addresses inside the reserved register bank.
#[inline]
pub fn is_bank_addr(addr: Address) -> bool {
    (REGISTER_BANK_BASE..REGISTER_BANK_BASE + 4 * NUM_BANK_WORDS as Address)
        .contains(&addr)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bank_addresses_are_consecutive() {
        let mut expected = REGISTER_BANK_BASE;
        for reg in Register::bank() {
            assert_eq!(reg.bank_addr(), expected);
            expected += 4;
        }
        assert_eq!(expected, REGISTER_BANK_BASE + 4 * NUM_BANK_WORDS as u32);
    }

    #[test]
    fn test_pc_slot() {
        assert_eq!(Register::Pc.bank_addr(), 0xC000_0080);
        assert_eq!(Register::Pc.index(), 32);
    }

    #[test]
    fn test_special_slots_follow_generals() {
        assert_eq!(Register::Hi.bank_addr(), 0xC000_0084);
        assert_eq!(Register::Lo.bank_addr(), 0xC000_0088);
        assert_eq!(Register::Heap.bank_addr(), 0xC000_008C);
    }

    #[test]
    fn test_from_index_roundtrip() {
        for i in 0..NUM_BANK_WORDS {
            let reg = Register::from_index(i).unwrap();
            assert_eq!(reg.index(), i);
        }
        assert_eq!(Register::from_index(NUM_BANK_WORDS), None);
    }

    #[test]
    fn test_is_general() {
        assert!(Register::R0.is_general());
        assert!(Register::R31.is_general());
        assert!(!Register::Pc.is_general());
        assert!(!Register::Heap.is_general());
    }

    #[test]
    fn test_is_bank_addr() {
        assert!(is_bank_addr(REGISTER_BANK_BASE));
        assert!(is_bank_addr(Register::Heap.bank_addr()));
        assert!(!is_bank_addr(REGISTER_BANK_BASE - 4));
        assert!(!is_bank_addr(REGISTER_BANK_BASE + 4 * 36));
        assert!(!is_bank_addr(0x3000_0000));
    }

    #[test]
    fn test_names() {
        assert_eq!(Register::R0.name(), "r0");
        assert_eq!(Register::R31.name(), "r31");
        assert_eq!(Register::Pc.to_string(), "pc");
        assert_eq!(Register::Heap.to_string(), "heap");
    }
}
