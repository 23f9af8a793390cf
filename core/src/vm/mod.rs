pub mod fault;
pub mod history;
pub mod hook;
pub mod instruction;
pub mod machine;
pub mod stack;
pub mod state;

pub use fault::Fault;
pub use history::{HISTORY_CAPACITY, HistoryRing};
pub use hook::{DebugHook, HookVerdict};
pub use instruction::{Instruction, Operand, mnemonic, opcode_arity};
pub use machine::{Machine, Step};
pub use stack::{StackDiff, StackDiffEntry, ValueStack};
pub use state::{INPUT_CAPACITY, LineBuffer, MAX_ADDR, MachineState, RAM_WORDS};
