//! Scripted replay engine
//!
//! A conforming [`Engine`] whose "program" is a fixed list of per-step
//! effects rather than decoded instructions. Harness tests drive the
//! commitment pipeline against known state transitions with it; it is not an
//! ISA interpreter and never will be.
//!
//! Each scripted step applies its effects, then the pc advances by 4 or
//! branches. A guest signals completion by branching to the halt sentinel.
//! While running, every guest store is mirrored word-granular into the
//! sparse space on loan, as the stepping contract requires.

use std::collections::HashMap;

use onestep_runtime::engine::{Engine, MachineState, StepHook};
use onestep_runtime::ram::Ram;
use onestep_runtime::Result;
use onestep_spec::{Address, Register, Word, HALT_PC, HALT_PC_FORCED, NUM_BANK_WORDS};

/// One observable state change applied during a scripted step.
#[derive(Debug, Clone)]
pub enum Effect {
    SetRegister(Register, Word),
    WriteWord(Address, Word),
    WriteBytes(Address, Vec<u8>),
}

/// A scripted instruction: effects applied, then pc advances or branches.
#[derive(Debug, Clone, Default)]
pub struct Step {
    pub effects: Vec<Effect>,
    /// Branch target overriding the default `pc + 4` advance.
    pub jump: Option<Address>,
}

impl Step {
    pub fn with(effects: Vec<Effect>) -> Self {
        Step {
            effects,
            jump: None,
        }
    }

    /// A step that only branches to the completion sentinel.
    pub fn halt() -> Self {
        Step {
            effects: Vec::new(),
            jump: Some(HALT_PC),
        }
    }

    pub fn then_jump(mut self, target: Address) -> Self {
        self.jump = Some(target);
        self
    }
}

/// Byte-granular guest machine replaying a fixed script from pc 0.
pub struct ScriptEngine {
    registers: [Word; NUM_BANK_WORDS],
    memory: HashMap<Address, u8>,
    script: Vec<Step>,
    cursor: usize,
}

impl ScriptEngine {
    pub fn new(script: Vec<Step>) -> Self {
        ScriptEngine {
            registers: [0; NUM_BANK_WORDS],
            memory: HashMap::new(),
            script,
            cursor: 0,
        }
    }

    fn at_halt(&self) -> bool {
        let pc = self.registers[Register::Pc.index()];
        pc == HALT_PC || pc == HALT_PC_FORCED
    }

    fn apply(&mut self, step: &Step, ram: &mut Ram) -> Result<()> {
        for effect in &step.effects {
            match effect {
                Effect::SetRegister(reg, value) => self.write_register(*reg, *value),
                Effect::WriteWord(addr, word) => {
                    self.write_memory(*addr, &word.to_be_bytes())?;
                    ram.write_bytes(*addr, &word.to_be_bytes())?;
                }
                Effect::WriteBytes(addr, bytes) => {
                    self.write_memory(*addr, bytes)?;
                    ram.write_bytes(*addr, bytes)?;
                }
            }
        }
        let pc = self.registers[Register::Pc.index()];
        self.registers[Register::Pc.index()] = step.jump.unwrap_or(pc.wrapping_add(4));
        Ok(())
    }
}

impl MachineState for ScriptEngine {
    fn read_register(&self, reg: Register) -> Word {
        if reg == Register::ZERO {
            0
        } else {
            self.registers[reg.index()]
        }
    }

    fn write_register(&mut self, reg: Register, value: Word) {
        if reg != Register::ZERO {
            self.registers[reg.index()] = value;
        }
    }

    fn read_memory(&self, addr: Address, buf: &mut [u8]) -> Result<()> {
        for (i, out) in buf.iter_mut().enumerate() {
            let byte_addr = addr.wrapping_add(i as u32);
            *out = self.memory.get(&byte_addr).copied().unwrap_or(0);
        }
        Ok(())
    }

    fn write_memory(&mut self, addr: Address, data: &[u8]) -> Result<()> {
        for (i, &byte) in data.iter().enumerate() {
            let byte_addr = addr.wrapping_add(i as u32);
            if byte == 0 {
                self.memory.remove(&byte_addr);
            } else {
                self.memory.insert(byte_addr, byte);
            }
        }
        Ok(())
    }
}

impl Engine for ScriptEngine {
    fn run(
        &mut self,
        ram: &mut Ram,
        max_steps: u64,
        mut hook: Option<StepHook<'_>>,
    ) -> Result<u64> {
        let mut executed = 0u64;
        loop {
            if self.at_halt() || executed >= max_steps {
                break;
            }
            if let Some(hook) = hook.as_mut() {
                hook(executed, self, ram)?;
                // The hook may have forced a halt.
                if self.at_halt() {
                    break;
                }
            }
            let Some(step) = self.script.get(self.cursor).cloned() else {
                // Script exhausted without a halt; stop where we are and let
                // the controller classify the pc.
                break;
            };
            self.apply(&step, ram)?;
            self.cursor += 1;
            executed += 1;
        }
        Ok(executed)
    }
}
