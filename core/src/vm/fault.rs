use thiserror::Error;

use crate::io::IoError;

/// Reasons the executor stops other than a normal HALT.
///
/// Every variant that originates in program text carries the offending
/// word and the IP of the faulting instruction so the debugger can show
/// where execution died.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Fault {
    #[error("invalid opcode {word:04x} at {ip:04x}")]
    InvalidOpcode { word: u16, ip: u16 },

    #[error("expected register operand, got {word:04x} at {ip:04x}")]
    ExpectedRegister { word: u16, ip: u16 },

    #[error("invalid operand {word:04x} at {ip:04x}")]
    InvalidOperand { word: u16, ip: u16 },

    #[error("instruction pointer {ip:04x} outside program memory")]
    IpOutOfRange { ip: u16 },

    #[error("memory address {addr:04x} out of range at {ip:04x}")]
    AddressOutOfRange { addr: u16, ip: u16 },

    #[error("stack underflow at {ip:04x}")]
    StackUnderflow { ip: u16 },

    #[error("division by zero at {ip:04x}")]
    DivisionByZero { ip: u16 },

    #[error("program input failed: {0}")]
    Input(#[from] IoError),

    #[error("halt requested by debugger")]
    DebuggerHalt,
}

impl Fault {
    /// Faults worth dropping into the interactive debugger for: the
    /// program text or machine state is wrong and inspection helps.
    /// Input teardown and a debugger-requested halt are clean stops.
    pub fn enters_debugger(&self) -> bool {
        !matches!(self, Fault::Input(_) | Fault::DebuggerHalt)
    }
}
