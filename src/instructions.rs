//! Instruction table and opcode handlers.
//!
//! Each opcode maps to an [`Instruction`] carrying its name, constant gas
//! charge and a handler function. Handlers are plain functions over the
//! machine state; the table is built once and injected into the machine,
//! so embedders can run with a restricted opcode subset.

use crate::machine::{Halt, Machine, VmError};
use crate::opcodes::*;
use crate::word::{self, Word};

pub type ExecuteFn = fn(&mut Machine) -> Result<(), VmError>;

#[derive(Debug, Clone, Copy)]
pub struct Instruction {
    pub opcode: u8,
    pub name: &'static str,
    pub constant_gas: u64,
    pub execute: ExecuteFn,
}

/// Opcode byte -> instruction lookup table, immutable after construction.
#[derive(Debug, Clone)]
pub struct InstructionSet {
    table: [Option<Instruction>; 256],
}

impl InstructionSet {
    /// Build the table for the supported subset.
    pub fn new() -> Self {
        let defs: &[(u8, &'static str, u64, ExecuteFn)] = &[
            (STOP, "STOP", 0, op_stop),
            (ADD, "ADD", GAS_FASTEST_STEP, op_add),
            (MUL, "MUL", GAS_FAST_STEP, op_mul),
            (SUB, "SUB", GAS_FASTEST_STEP, op_sub),
            (DIV, "DIV", GAS_FAST_STEP, op_div),
            (MOD, "MOD", GAS_FAST_STEP, op_mod),
            (ADDMOD, "ADDMOD", GAS_MID_STEP, op_addmod),
            (MULMOD, "MULMOD", GAS_MID_STEP, op_mulmod),
            (CALLDATALOAD, "CALLDATALOAD", GAS_FASTEST_STEP, op_calldataload),
            (CALLDATASIZE, "CALLDATASIZE", GAS_QUICK_STEP, op_calldatasize),
            (CODESIZE, "CODESIZE", GAS_QUICK_STEP, op_codesize),
            (MLOAD, "MLOAD", GAS_FASTEST_STEP, op_mload),
            (MSTORE, "MSTORE", GAS_FASTEST_STEP, op_mstore),
            (MSTORE8, "MSTORE8", GAS_FASTEST_STEP, op_mstore8),
            (SLOAD, "SLOAD", GAS_SLOAD, op_sload),
            (SSTORE, "SSTORE", GAS_SSTORE, op_sstore),
            (JUMP, "JUMP", GAS_MID_STEP, op_jump),
            (JUMPI, "JUMPI", GAS_SLOW_STEP, op_jumpi),
            (PC, "PC", GAS_QUICK_STEP, op_pc),
            (MSIZE, "MSIZE", GAS_QUICK_STEP, op_msize),
            (GAS, "GAS", GAS_QUICK_STEP, op_gas),
            (JUMPDEST, "JUMPDEST", GAS_JUMPDEST, op_jumpdest),
            (PUSH1, "PUSH1", GAS_FASTEST_STEP, op_push1),
            (DUP1, "DUP1", GAS_FASTEST_STEP, op_dup1),
            (DUP2, "DUP2", GAS_FASTEST_STEP, op_dup2),
            (DUP3, "DUP3", GAS_FASTEST_STEP, op_dup3),
            (SWAP1, "SWAP1", GAS_FASTEST_STEP, op_swap1),
            (RETURN, "RETURN", 0, op_return),
        ];
        let mut set = Self { table: [None; 256] };
        for &(opcode, name, constant_gas, execute) in defs {
            set.register(Instruction { opcode, name, constant_gas, execute });
        }
        set
    }

    pub fn register(&mut self, inst: Instruction) {
        self.table[inst.opcode as usize] = Some(inst);
    }

    pub fn get(&self, opcode: u8) -> Option<Instruction> {
        self.table[opcode as usize]
    }

    pub fn name_of(&self, opcode: u8) -> &'static str {
        self.get(opcode).map(|i| i.name).unwrap_or("?")
    }
}

impl Default for InstructionSet {
    fn default() -> Self {
        Self::new()
    }
}

fn binop(m: &mut Machine, f: impl Fn(Word, Word) -> Word) -> Result<(), VmError> {
    let a = m.stack.pop()?;
    let b = m.stack.pop()?;
    m.stack.push(f(a, b))
}

fn ternop(m: &mut Machine, f: impl Fn(Word, Word, Word) -> Word) -> Result<(), VmError> {
    let a = m.stack.pop()?;
    let b = m.stack.pop()?;
    let n = m.stack.pop()?;
    m.stack.push(f(a, b, n))
}

fn op_stop(m: &mut Machine) -> Result<(), VmError> {
    m.halted = Some(Halt::Stop);
    Ok(())
}

fn op_add(m: &mut Machine) -> Result<(), VmError> {
    binop(m, |a, b| a.overflowing_add(b).0)
}

fn op_mul(m: &mut Machine) -> Result<(), VmError> {
    binop(m, |a, b| a.overflowing_mul(b).0)
}

fn op_sub(m: &mut Machine) -> Result<(), VmError> {
    binop(m, |a, b| a.overflowing_sub(b).0)
}

fn op_div(m: &mut Machine) -> Result<(), VmError> {
    binop(m, |a, b| if b.is_zero() { Word::zero() } else { a / b })
}

fn op_mod(m: &mut Machine) -> Result<(), VmError> {
    binop(m, |a, b| if b.is_zero() { Word::zero() } else { a % b })
}

fn op_addmod(m: &mut Machine) -> Result<(), VmError> {
    ternop(m, word::add_mod)
}

fn op_mulmod(m: &mut Machine) -> Result<(), VmError> {
    ternop(m, word::mul_mod)
}

// Offsets wider than 64 bits drop the load without pushing; geth bounds
// calldata the same way.
fn op_calldataload(m: &mut Machine) -> Result<(), VmError> {
    let offset = m.stack.pop()?;
    if let Some(o) = word::to_u64(offset) {
        let value = m.calldata.read_word(o);
        m.stack.push(value)?;
    }
    Ok(())
}

fn op_calldatasize(m: &mut Machine) -> Result<(), VmError> {
    m.stack.push(Word::from(m.calldata.size()))
}

fn op_codesize(m: &mut Machine) -> Result<(), VmError> {
    m.stack.push(Word::from(m.code.len() as u64))
}

fn op_mload(m: &mut Machine) -> Result<(), VmError> {
    let offset = word::to_usize_truncated(m.stack.pop()?);
    let value = m.memory.load_word(offset);
    m.stack.push(value)
}

fn op_mstore(m: &mut Machine) -> Result<(), VmError> {
    let offset = word::to_usize_truncated(m.stack.pop()?);
    let value = m.stack.pop()?;
    m.memory.store_word(offset, value);
    Ok(())
}

fn op_mstore8(m: &mut Machine) -> Result<(), VmError> {
    let offset = word::to_usize_truncated(m.stack.pop()?);
    let value = m.stack.pop()?;
    m.memory.store_byte(offset, (value.low_u64() & 0xff) as u8);
    Ok(())
}

fn op_sload(m: &mut Machine) -> Result<(), VmError> {
    let slot = m.stack.pop()?;
    let value = m.storage.get(slot);
    m.stack.push(value)
}

fn op_sstore(m: &mut Machine) -> Result<(), VmError> {
    let slot = m.stack.pop()?;
    let value = m.stack.pop()?;
    m.storage.put(slot, value);
    Ok(())
}

fn jump_to(m: &mut Machine, target: Word) -> Result<(), VmError> {
    let dest = word::to_u64(target).ok_or(VmError::InvalidJump(target.low_u64()))? as usize;
    if !m.is_jump_destination(dest) {
        return Err(VmError::InvalidJump(dest as u64));
    }
    m.pc = dest;
    Ok(())
}

fn op_jump(m: &mut Machine) -> Result<(), VmError> {
    let target = m.stack.pop()?;
    jump_to(m, target)
}

fn op_jumpi(m: &mut Machine) -> Result<(), VmError> {
    let target = m.stack.pop()?;
    let cond = m.stack.pop()?;
    if cond.is_zero() {
        return Ok(());
    }
    jump_to(m, target)
}

fn op_pc(m: &mut Machine) -> Result<(), VmError> {
    // pc has already advanced past the opcode byte at this point
    m.stack.push(Word::from(m.pc as u64))
}

fn op_msize(m: &mut Machine) -> Result<(), VmError> {
    m.stack.push(Word::from((m.memory.active_words() * 32) as u64))
}

fn op_gas(m: &mut Machine) -> Result<(), VmError> {
    m.stack.push(Word::from(m.gas))
}

fn op_jumpdest(_m: &mut Machine) -> Result<(), VmError> {
    Ok(())
}

fn op_push1(m: &mut Machine) -> Result<(), VmError> {
    let operand = m.read_code_byte();
    m.stack.push(Word::from(operand as u64))
}

fn dup(m: &mut Machine, i: usize) -> Result<(), VmError> {
    let value = m.stack.peek(i)?;
    m.stack.push(value)
}

fn op_dup1(m: &mut Machine) -> Result<(), VmError> {
    dup(m, 0)
}

fn op_dup2(m: &mut Machine) -> Result<(), VmError> {
    dup(m, 1)
}

fn op_dup3(m: &mut Machine) -> Result<(), VmError> {
    dup(m, 2)
}

fn op_swap1(m: &mut Machine) -> Result<(), VmError> {
    m.stack.swap(1)
}

fn op_return(m: &mut Machine) -> Result<(), VmError> {
    let offset = word::to_usize_truncated(m.stack.pop()?);
    let length = word::to_usize_truncated(m.stack.pop()?);
    m.return_data = m.memory.load_range(offset, length);
    m.halted = Some(Halt::Return);
    Ok(())
}
