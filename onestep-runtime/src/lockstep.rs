//! Lockstep observation channel
//!
//! The cross-validation harness compares two independent executions step by
//! step. The producing side is a step hook that publishes one register
//! snapshot per step over a rendezvous channel of capacity 1: the emulation
//! thread blocks until the comparing consumer has drained the previous
//! snapshot, giving strict lockstep backpressure. The consumer itself is an
//! external collaborator.

use std::sync::mpsc::{sync_channel, Receiver, SyncSender};

use onestep_spec::{Register, Word, NUM_BANK_WORDS};

use crate::engine::MachineState;
use crate::error::{Result, RuntimeError};
use crate::ram::Ram;

/// One observed register bank, taken before the instruction at `step`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterSnapshot {
    pub step: u64,
    pub pc: Word,
    /// Populated-entry count of the observer's shadow space, part of the
    /// equivalence check between implementations.
    pub ram_entries: usize,
    pub bank: [Word; NUM_BANK_WORDS],
}

impl RegisterSnapshot {
    pub fn observe<M: MachineState + ?Sized>(step: u64, machine: &M, ram_entries: usize) -> Self {
        let mut bank = [0; NUM_BANK_WORDS];
        for reg in Register::bank() {
            bank[reg.index()] = machine.read_register(reg);
        }
        RegisterSnapshot {
            step,
            pc: bank[Register::Pc.index()],
            ram_entries,
            bank,
        }
    }
}

/// Capacity-1 channel: the producer blocks until the consumer drains.
pub fn snapshot_channel() -> (SyncSender<RegisterSnapshot>, Receiver<RegisterSnapshot>) {
    sync_channel(1)
}

/// Build a step hook publishing one snapshot per step. Used standalone with
/// [`crate::engine::Engine::run`], not through the controller.
pub fn observer(
    tx: SyncSender<RegisterSnapshot>,
) -> impl FnMut(u64, &mut dyn MachineState, &mut Ram) -> Result<()> {
    move |step, machine, ram| {
        let snapshot = RegisterSnapshot::observe(step, machine, ram.len());
        tx.send(snapshot)
            .map_err(|_| RuntimeError::ObserverDisconnected)
    }
}
