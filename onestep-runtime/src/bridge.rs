//! Register bridge
//!
//! Copies the engine's canonical register set into the reserved bank slots of
//! the sparse address space, and back. Sync is lazy: it runs immediately
//! before a commitment is taken, never on ordinary steps, so bank slots are
//! stale at any other moment.

use onestep_spec::Register;

use crate::engine::MachineState;
use crate::ram::Ram;

/// Copy all 36 registers from the engine into their bank addresses.
pub fn sync_registers<M: MachineState + ?Sized>(machine: &M, ram: &mut Ram) {
    for reg in Register::bank() {
        ram.write(reg.bank_addr(), machine.read_register(reg));
    }
}

/// Write bank slots back into the engine, priming it from a snapshot.
pub fn seed_registers<M: MachineState + ?Sized>(machine: &mut M, ram: &Ram) {
    for reg in Register::bank() {
        machine.write_register(reg, ram.read(reg.bank_addr()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use onestep_spec::{Address, Word, NUM_BANK_WORDS};

    struct BankOnly {
        regs: [Word; NUM_BANK_WORDS],
    }

    impl MachineState for BankOnly {
        fn read_register(&self, reg: Register) -> Word {
            self.regs[reg.index()]
        }

        fn write_register(&mut self, reg: Register, value: Word) {
            self.regs[reg.index()] = value;
        }

        fn read_memory(&self, _addr: Address, _buf: &mut [u8]) -> Result<()> {
            Ok(())
        }

        fn write_memory(&mut self, _addr: Address, _data: &[u8]) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_sync_writes_every_slot() {
        let mut machine = BankOnly {
            regs: [0; NUM_BANK_WORDS],
        };
        for i in 0..NUM_BANK_WORDS {
            machine.regs[i] = (i as Word) * 3 + 1;
        }
        let mut ram = Ram::new();
        sync_registers(&machine, &mut ram);
        for reg in Register::bank() {
            assert_eq!(ram.read(reg.bank_addr()), machine.regs[reg.index()]);
        }
    }

    #[test]
    fn test_sync_overwrites_stale_values() {
        let mut ram = Ram::new();
        ram.write(Register::Pc.bank_addr(), 0x1234);
        let machine = BankOnly {
            regs: [0; NUM_BANK_WORDS],
        };
        sync_registers(&machine, &mut ram);
        assert_eq!(ram.read(Register::Pc.bank_addr()), 0);
    }

    #[test]
    fn test_sync_touches_no_other_addresses() {
        let mut ram = Ram::new();
        ram.write(0x1000, 99);
        let machine = BankOnly {
            regs: [5; NUM_BANK_WORDS],
        };
        sync_registers(&machine, &mut ram);
        assert_eq!(ram.read(0x1000), 99);
        assert_eq!(ram.len(), 1 + NUM_BANK_WORDS);
    }

    #[test]
    fn test_seed_roundtrip() {
        let mut src = BankOnly {
            regs: [0; NUM_BANK_WORDS],
        };
        for i in 0..NUM_BANK_WORDS {
            src.regs[i] = 0x100 + i as Word;
        }
        let mut ram = Ram::new();
        sync_registers(&src, &mut ram);

        let mut dst = BankOnly {
            regs: [0; NUM_BANK_WORDS],
        };
        seed_registers(&mut dst, &ram);
        assert_eq!(dst.regs, src.regs);
    }
}
