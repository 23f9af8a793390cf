pub mod ctrl;
pub mod debug;
pub mod io;
pub mod vm;

pub mod prelude {
    pub use crate::ctrl::{MachineController, RunState};
    pub use crate::debug::{Debugger, View};
    pub use crate::io::{IoError, ProgramIo, StdIo};
    pub use crate::vm::{
        DebugHook, Fault, HistoryRing, HookVerdict, Instruction, Machine, MachineState, Operand,
        Step, ValueStack,
    };
}
