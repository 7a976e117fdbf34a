//! Runtime error types

use thiserror::Error;

use onestep_spec::SpecError;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("spec error: {0}")]
    Spec(#[from] SpecError),

    #[error("step budget exceeded: {limit} steps without reaching a halt sentinel")]
    StepBudgetExceeded { limit: u64 },

    #[error("engine stopped at unexpected pc {pc:#010x} after {steps} steps")]
    UnexpectedStop { pc: u32, steps: u64 },

    #[error("program image of {len} bytes does not fit at base {base:#010x}")]
    ImageTooLarge { base: u32, len: usize },

    #[error("memory access failed at {addr:#010x}: {msg}")]
    MemoryAccess { addr: u32, msg: String },

    #[error("lockstep observer disconnected")]
    ObserverDisconnected,

    #[error("checkpoint encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
