//! Stepping-engine collaborator seam
//!
//! The instruction-level emulator is an external collaborator reached only
//! through this narrow capability set: run-with-hook, register access, and
//! raw memory access. Any conforming engine is substitutable.
//!
//! The sparse address space stays a single-writer structure owned by the
//! caller: it is lent to [`Engine::run`], which mirrors every guest store
//! into it and lends it onward to the hook. Nothing holds it between steps.

use onestep_spec::{Address, Register, Word};

use crate::error::Result;
use crate::ram::Ram;

/// Narrow view of a stepping engine's observable CPU state.
pub trait MachineState {
    fn read_register(&self, reg: Register) -> Word;

    fn write_register(&mut self, reg: Register, value: Word);

    /// Fill `buf` from guest memory starting at `addr`.
    fn read_memory(&self, addr: Address, buf: &mut [u8]) -> Result<()>;

    /// Write `data` into guest memory starting at `addr`.
    fn write_memory(&mut self, addr: Address, data: &[u8]) -> Result<()>;
}

/// Per-step observation hook.
///
/// Invoked synchronously on the emulation thread before each instruction,
/// with the number of instructions already completed and the shared sparse
/// space on loan. Step 0 therefore observes the pre-execution state. A hook
/// may force a halt by writing the program counter; errors abort the run.
pub type StepHook<'a> =
    &'a mut dyn FnMut(u64, &mut dyn MachineState, &mut Ram) -> Result<()>;

/// A steppable execution engine.
pub trait Engine: MachineState {
    /// Run from the current pc until it reaches a halt sentinel, a hook
    /// forces one, or `max_steps` instructions have executed, mirroring every
    /// guest store into `ram`. Returns the number of instructions executed.
    /// With no hook installed the per-step observation path must be skipped
    /// entirely.
    fn run(
        &mut self,
        ram: &mut Ram,
        max_steps: u64,
        hook: Option<StepHook<'_>>,
    ) -> Result<u64>;
}
