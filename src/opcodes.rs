// Opcode constants for the supported instruction subset.

// 0x00 range - arithmetic/stop
pub const STOP: u8 = 0x00;
pub const ADD: u8 = 0x01;
pub const MUL: u8 = 0x02;
pub const SUB: u8 = 0x03;
pub const DIV: u8 = 0x04;
pub const MOD: u8 = 0x06;
pub const ADDMOD: u8 = 0x08;
pub const MULMOD: u8 = 0x09;

// 0x30 range - environment
pub const CALLDATALOAD: u8 = 0x35;
pub const CALLDATASIZE: u8 = 0x36;
pub const CODESIZE: u8 = 0x38;

// 0x50 range - stack/memory/storage/flow
pub const MLOAD: u8 = 0x51;
pub const MSTORE: u8 = 0x52;
pub const MSTORE8: u8 = 0x53;
pub const SLOAD: u8 = 0x54;
pub const SSTORE: u8 = 0x55;
pub const JUMP: u8 = 0x56;
pub const JUMPI: u8 = 0x57;
pub const PC: u8 = 0x58;
pub const MSIZE: u8 = 0x59;
pub const GAS: u8 = 0x5A;
pub const JUMPDEST: u8 = 0x5B;

// 0x60..0x7f - PUSH1..PUSH32. Only PUSH1 executes, but the whole range
// matters to the jump-destination prescan, which must skip operand bytes.
pub const PUSH1: u8 = 0x60;
pub const PUSH32: u8 = 0x7F;

// 0x80 range - DUP1..DUP3
pub const DUP1: u8 = 0x80;
pub const DUP2: u8 = 0x81;
pub const DUP3: u8 = 0x82;

// 0x90 range
pub const SWAP1: u8 = 0x90;

// 0xf0 range
pub const RETURN: u8 = 0xF3;

// Constant gas step classes, see geth core/vm/gas.go.
pub const GAS_QUICK_STEP: u64 = 2;
pub const GAS_FASTEST_STEP: u64 = 3;
pub const GAS_FAST_STEP: u64 = 5;
pub const GAS_MID_STEP: u64 = 8;
pub const GAS_SLOW_STEP: u64 = 10;

// Flat placeholder storage costs; the dynamic cold/warm schedule with
// refunds is out of scope.
pub const GAS_SLOAD: u64 = 50;
pub const GAS_SSTORE: u64 = 0;
pub const GAS_JUMPDEST: u64 = 1;
