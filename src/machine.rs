//! The execution engine: fetch, charge gas, execute.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, trace};

use crate::calldata::Calldata;
use crate::instructions::{Instruction, InstructionSet};
use crate::memory::LinearMemory;
use crate::opcodes;
use crate::stack::OperandStack;
use crate::storage::PersistentStorage;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VmError {
    #[error("out of gas")]
    OutOfGas,
    #[error("stack overflow")]
    StackOverflow,
    #[error("stack underflow")]
    StackUnderflow,
    #[error("invalid stack index {0}")]
    InvalidIndex(usize),
    #[error("invalid jump destination {0}")]
    InvalidJump(u64),
    #[error("unknown opcode 0x{0:02x} at pc={1}")]
    UnknownOpcode(u8, usize),
}

/// Terminal status of a halted run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Halt {
    Stop,
    Return,
}

/// Cooperative cancellation flag, polled once per instruction. Clones share
/// the same flag, so one copy can be handed to another thread.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone)]
pub struct VmConfig {
    pub gas_limit: u64,
    pub calldata: Vec<u8>,
    /// Storage carried over from an earlier run, if any.
    pub storage: Option<PersistentStorage>,
    pub cancel: CancelToken,
}

impl Default for VmConfig {
    fn default() -> Self {
        Self {
            gas_limit: 10_000_000,
            calldata: Vec::new(),
            storage: None,
            cancel: CancelToken::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Machine {
    pub pc: usize,
    pub gas: u64,
    pub code: Vec<u8>,
    pub stack: OperandStack,
    pub memory: LinearMemory,
    pub storage: PersistentStorage,
    pub calldata: Calldata,
    pub return_data: Vec<u8>,
    pub halted: Option<Halt>,
    cancel: CancelToken,
    jump_destinations: HashSet<usize>,
    instructions: Arc<InstructionSet>,
}

impl Machine {
    pub fn new(code: Vec<u8>, cfg: VmConfig) -> Self {
        Self::with_instructions(code, cfg, Arc::new(InstructionSet::new()))
    }

    /// Construct with an injected instruction table, allowing a restricted
    /// or extended opcode subset.
    pub fn with_instructions(code: Vec<u8>, cfg: VmConfig, instructions: Arc<InstructionSet>) -> Self {
        let jump_destinations = scan_jump_destinations(&code);
        debug!(count = jump_destinations.len(), "jump destinations precomputed");
        Self {
            pc: 0,
            gas: cfg.gas_limit,
            code,
            stack: OperandStack::new(),
            memory: LinearMemory::new(),
            storage: cfg.storage.unwrap_or_default(),
            calldata: Calldata::new(cfg.calldata),
            return_data: Vec::new(),
            halted: None,
            cancel: cfg.cancel,
            jump_destinations,
            instructions,
        }
    }

    /// Drive the machine to a terminal halt or a fatal error. Mutations from
    /// instructions completed before a failure are kept, not rolled back.
    pub fn run(&mut self) -> Result<(), VmError> {
        while self.halted.is_none() {
            if self.cancel.is_cancelled() {
                debug!(pc = self.pc, gas = self.gas, "cancelled");
                break;
            }
            self.step()?;
        }
        Ok(())
    }

    /// One fetch-charge-execute iteration. Gas is deducted before the
    /// handler runs: an unaffordable instruction clamps gas to zero and
    /// fails without taking effect.
    pub fn step(&mut self) -> Result<(), VmError> {
        let pc_before = self.pc;
        let inst = self.fetch()?;
        if !self.use_gas(inst.constant_gas) {
            return Err(VmError::OutOfGas);
        }
        (inst.execute)(self)?;
        trace!(
            pc = pc_before,
            op = inst.name,
            gas = self.gas,
            depth = self.stack.depth(),
            "executed"
        );
        Ok(())
    }

    /// Resolve the instruction at pc and advance past the opcode byte.
    /// Past the end of code this is an implicit STOP (Yellow Paper 9.4.1).
    fn fetch(&mut self) -> Result<Instruction, VmError> {
        if self.pc >= self.code.len() {
            return self
                .instructions
                .get(opcodes::STOP)
                .ok_or(VmError::UnknownOpcode(opcodes::STOP, self.pc));
        }
        let opcode = self.code[self.pc];
        let inst = self
            .instructions
            .get(opcode)
            .ok_or(VmError::UnknownOpcode(opcode, self.pc))?;
        self.pc += 1;
        Ok(inst)
    }

    fn use_gas(&mut self, amount: u64) -> bool {
        if amount > self.gas {
            self.gas = 0;
            return false;
        }
        self.gas -= amount;
        true
    }

    /// Next operand byte from the code buffer, zero if the code is
    /// truncated. Advances pc.
    pub fn read_code_byte(&mut self) -> u8 {
        let byte = self.code.get(self.pc).copied().unwrap_or(0);
        self.pc += 1;
        byte
    }

    pub fn is_jump_destination(&self, offset: usize) -> bool {
        self.jump_destinations.contains(&offset)
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }
}

/// One pass over the code recording every JUMPDEST byte that is an
/// instruction boundary. Bytes inside PUSH1..PUSH32 operands are opaque
/// data and are skipped without inspection.
fn scan_jump_destinations(code: &[u8]) -> HashSet<usize> {
    let mut set = HashSet::new();
    let mut pc = 0usize;
    while pc < code.len() {
        let op = code[pc];
        if op == opcodes::JUMPDEST {
            set.insert(pc);
            pc += 1;
        } else if (opcodes::PUSH1..=opcodes::PUSH32).contains(&op) {
            pc += 1 + (op - opcodes::PUSH1 + 1) as usize;
        } else {
            pc += 1;
        }
    }
    set
}
