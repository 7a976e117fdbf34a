//! Step controller
//!
//! Drives an external engine from program load to a recognized halt:
//! `Idle -> Running -> {HaltedNormally, HaltedAtTarget}`, with budget
//! exhaustion and unrecognized stops surfaced as fatal errors. The controller
//! owns the sparse shadow space; the per-step hook mutates it by reference,
//! never through ambient state.

use std::env;
use std::fs;
use std::path::PathBuf;

use tracing::{debug, info};

use onestep_spec::{
    Digest, Register, GOLDEN_STEP, HALT_PC, HALT_PC_FORCED, INPUT_COMMITMENT_ADDR,
};

use crate::bridge;
use crate::checkpoint::Checkpoint;
use crate::engine::{Engine, MachineState};
use crate::error::{Result, RuntimeError};
use crate::ram::Ram;

/// Default cap on executed instructions before a run is declared
/// non-terminating.
pub const DEFAULT_STEP_BUDGET: u64 = 10_000_000_000;

#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Directory receiving checkpoints and artifacts.
    pub basedir: PathBuf,

    /// Step to capture and stop at; `None` runs to guest completion with the
    /// per-step hook skipped entirely.
    pub target_step: Option<u64>,

    /// Executed-instruction budget; exceeding it without a halt sentinel is
    /// fatal.
    pub max_steps: u64,
}

impl RunConfig {
    pub fn new(basedir: impl Into<PathBuf>) -> Self {
        RunConfig {
            basedir: basedir.into(),
            target_step: None,
            max_steps: DEFAULT_STEP_BUDGET,
        }
    }

    pub fn with_target_step(mut self, target: u64) -> Self {
        self.target_step = Some(target);
        self
    }

    /// Read `BASEDIR` and `TARGET_STEP` from the environment. A missing or
    /// negative target means run to completion.
    pub fn from_env() -> Self {
        let basedir = env::var("BASEDIR").unwrap_or_else(|_| "tmp/onestep".into());
        let mut config = RunConfig::new(basedir);
        if let Ok(raw) = env::var("TARGET_STEP") {
            if let Ok(step) = raw.parse::<i64>() {
                if step >= 0 {
                    config.target_step = Some(step as u64);
                }
            }
        }
        config
    }
}

/// Terminal states of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Halt {
    /// The guest branched to the completion sentinel; `step` is one past the
    /// last executed instruction.
    Normal { step: u64 },

    /// The controller forced a stop at the configured target step.
    AtTarget { step: u64 },
}

impl Halt {
    pub fn step(&self) -> u64 {
        match *self {
            Halt::Normal { step } | Halt::AtTarget { step } => step,
        }
    }
}

/// Outcome of a completed run.
#[derive(Debug, Clone, Copy)]
pub struct RunSummary {
    pub halt: Halt,

    /// Root of the checkpoint written at the halt point.
    pub root: Digest,
}

pub struct Controller {
    config: RunConfig,
    ram: Ram,
}

impl Controller {
    pub fn new(config: RunConfig) -> Result<Self> {
        fs::create_dir_all(&config.basedir)?;
        Ok(Controller {
            config,
            ram: Ram::new(),
        })
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn ram(&self) -> &Ram {
        &self.ram
    }

    /// Load the program image at address zero into both the engine and the
    /// shadow space, and clear the register bank.
    pub fn load_image<M: MachineState + ?Sized>(
        &mut self,
        machine: &mut M,
        image: &[u8],
    ) -> Result<()> {
        machine.write_memory(0, image)?;
        self.ram.load_image(image, 0)?;
        self.ram.zero_register_bank();
        debug!(len = image.len(), "image loaded");
        Ok(())
    }

    /// Capture the pre-execution checkpoint (`golden.json`, step -1).
    pub fn write_golden(&mut self) -> Result<Digest> {
        self.write_named_checkpoint("golden.json", GOLDEN_STEP)
    }

    /// Write the combined input commitment into guest memory and the shadow
    /// space, then sync registers so the bank is current at start.
    pub fn write_input<M: MachineState + ?Sized>(
        &mut self,
        machine: &mut M,
        commitment: &Digest,
    ) -> Result<()> {
        machine.write_memory(INPUT_COMMITMENT_ADDR, commitment.as_bytes())?;
        self.ram
            .write_bytes(INPUT_COMMITMENT_ADDR, commitment.as_bytes())?;
        bridge::sync_registers(machine, &mut self.ram);
        Ok(())
    }

    /// Run the engine to a recognized halt.
    ///
    /// With a target step configured, a hook observes each step; at the
    /// target it syncs registers, writes `checkpoint-N.json`, and forces the
    /// pc to the stop sentinel. Without a target no hook is installed at all.
    pub fn run<E: Engine>(&mut self, engine: &mut E) -> Result<RunSummary> {
        let max_steps = self.config.max_steps;
        let mut target_root: Option<Digest> = None;

        let steps = match self.config.target_step {
            Some(target) => {
                let basedir = self.config.basedir.clone();
                let captured = &mut target_root;
                let mut hook = move |step: u64,
                                     machine: &mut dyn MachineState,
                                     ram: &mut Ram|
                      -> Result<()> {
                    if step == target {
                        bridge::sync_registers(machine, ram);
                        let checkpoint = Checkpoint::capture(ram, target as i64);
                        checkpoint
                            .write_to(&basedir.join(format!("checkpoint-{target}.json")))?;
                        *captured = Some(checkpoint.root);
                        machine.write_register(Register::Pc, HALT_PC_FORCED);
                    }
                    Ok(())
                };
                engine.run(&mut self.ram, max_steps, Some(&mut hook))?
            }
            None => engine.run(&mut self.ram, max_steps, None)?,
        };

        let pc = engine.read_register(Register::Pc);
        match pc {
            HALT_PC => {
                bridge::sync_registers(engine, &mut self.ram);
                let root = self.write_named_checkpoint("final.json", steps as i64)?;
                info!(steps, root = %root, "halted normally");
                Ok(RunSummary {
                    halt: Halt::Normal { step: steps },
                    root,
                })
            }
            HALT_PC_FORCED => match target_root {
                Some(root) => {
                    let step = self.config.target_step.unwrap_or(steps);
                    info!(step, root = %root, "halted at target step");
                    Ok(RunSummary {
                        halt: Halt::AtTarget { step },
                        root,
                    })
                }
                None => Err(RuntimeError::UnexpectedStop { pc, steps }),
            },
            _ => {
                if steps >= max_steps {
                    Err(RuntimeError::StepBudgetExceeded { limit: max_steps })
                } else {
                    Err(RuntimeError::UnexpectedStop { pc, steps })
                }
            }
        }
    }

    fn write_named_checkpoint(&self, name: &str, step: i64) -> Result<Digest> {
        let checkpoint = Checkpoint::capture(&self.ram, step);
        checkpoint.write_to(&self.config.basedir.join(name))?;
        Ok(checkpoint.root)
    }
}
