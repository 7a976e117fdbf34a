//! # onestep runtime
//!
//! State commitment and checkpointing for a stepwise 32-bit emulator. The
//! machine's registers and memory live in one sparse address space that
//! reduces to a single Keccak-256 root, so two independent re-executions of
//! the same program to the same step produce byte-identical commitments, the
//! property a one-step dispute protocol is built on.
//!
//! The instruction-level emulator is an external collaborator behind the
//! [`Engine`] trait; this crate owns everything around it:
//!
//! - [`Ram`]: the sparse `address -> word` machine state
//! - [`bridge`]: register file <-> reserved bank addresses
//! - [`trie`]: the canonical commitment builder
//! - [`Checkpoint`]: the persisted `{root, step}` record
//! - [`InputStager`]: content-addressed input staging and combination
//! - [`Controller`]: the step-targeted capture protocol
//! - [`output`]: the post-halt output handshake
//! - [`lockstep`]: the cross-validation observation channel
//!
//! ## Example
//!
//! ```rust,no_run
//! use onestep_runtime::{execute, Engine, RunConfig};
//! use onestep_spec::Digest;
//!
//! fn drive<E: Engine>(engine: &mut E, image: &[u8], input: Digest) {
//!     let config = RunConfig::new("tmp/onestep");
//!     let report = execute(engine, image, input, config).unwrap();
//!     println!("halted: {:?}", report.summary.halt);
//! }
//! ```

pub mod bridge;
pub mod checkpoint;
pub mod controller;
pub mod crypto;
pub mod engine;
pub mod error;
pub mod lockstep;
pub mod output;
pub mod ram;
pub mod staging;
pub mod trie;

pub use checkpoint::Checkpoint;
pub use controller::{Controller, Halt, RunConfig, RunSummary, DEFAULT_STEP_BUDGET};
pub use engine::{Engine, MachineState, StepHook};
pub use error::{Result, RuntimeError};
pub use output::{read_output, Hashes, OutputWindow};
pub use ram::Ram;
pub use staging::InputStager;

use onestep_spec::Digest;

/// Everything a completed run produced.
#[derive(Debug, Clone, Copy)]
pub struct RunReport {
    pub summary: RunSummary,

    /// Output window, present after a normal halt.
    pub output: Option<OutputWindow>,

    /// Proof-of-execution artifact, present after a normal halt.
    pub hashes: Option<Hashes>,
}

/// One-call driver: load the image, take the golden checkpoint, write the
/// input commitment, run to a halt, and on guest completion read the output
/// window and persist the hashes artifact.
pub fn execute<E: Engine>(
    engine: &mut E,
    image: &[u8],
    input_commitment: Digest,
    config: RunConfig,
) -> Result<RunReport> {
    let mut controller = Controller::new(config)?;
    controller.load_image(engine, image)?;
    controller.write_golden()?;
    controller.write_input(engine, &input_commitment)?;
    let summary = controller.run(engine)?;

    match summary.halt {
        Halt::Normal { .. } => {
            let window = read_output(engine)?;
            let hashes = Hashes::new(input_commitment, window.hash);
            hashes.write_to(&controller.config().basedir.join("hashes.json"))?;
            Ok(RunReport {
                summary,
                output: Some(window),
                hashes: Some(hashes),
            })
        }
        Halt::AtTarget { .. } => Ok(RunReport {
            summary,
            output: None,
            hashes: None,
        }),
    }
}
