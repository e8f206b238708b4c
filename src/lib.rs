pub mod calldata;
pub mod disasm;
pub mod instructions;
pub mod machine;
pub mod memory;
pub mod opcodes;
pub mod stack;
pub mod storage;
pub mod word;

pub use calldata::Calldata;
pub use instructions::{Instruction, InstructionSet};
pub use machine::{CancelToken, Halt, Machine, VmConfig, VmError};
pub use memory::LinearMemory;
pub use stack::OperandStack;
pub use storage::PersistentStorage;
pub use word::Word;
