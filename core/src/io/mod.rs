pub mod pipe;
pub mod stdio;

pub use pipe::{BridgeEvent, ByteQueue, PipeIo};
pub use stdio::StdIo;

use thiserror::Error;

/// Failures of the program input channel.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum IoError {
    #[error("input channel closed")]
    Closed,

    #[error("input read cancelled")]
    Cancelled,

    #[error("input line exceeds {max} bytes")]
    LineTooLong { max: usize },
}

/// Byte-oriented I/O capability handed to a running machine.
///
/// Input is blocking and cancellable; output and diagnostics are
/// fire-and-forget (implementations may buffer). Diagnostics are a
/// separate channel so fault reports never interleave with program
/// output.
pub trait ProgramIo {
    /// Block until a byte is available. `Ok(None)` is end of input;
    /// cancellation surfaces as [`IoError::Cancelled`].
    fn read_byte(&mut self) -> Result<Option<u8>, IoError>;

    /// Emit one byte of program output. Never blocks.
    fn write_byte(&mut self, byte: u8);

    /// Emit a diagnostic line on the error channel.
    fn write_diag(&mut self, msg: &str);

    /// Whether a read would find a byte without blocking. The executor
    /// uses this to tell a debugger that the next IN would block.
    fn input_pending(&self) -> bool;
}
