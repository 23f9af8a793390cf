use std::io::{Read, Write};

use crate::io::{IoError, ProgramIo};

/// Plain stdio passthrough for running a program from the CLI.
///
/// Output is flushed per byte so OUT behaves unbuffered; an interrupted
/// read is retried. `input_pending` reports true: a blocking terminal
/// read is ordinary program input, never the debugger's would-block
/// case.
pub struct StdIo {
    stdin: std::io::Stdin,
    stdout: std::io::Stdout,
}

impl StdIo {
    pub fn new() -> Self {
        Self {
            stdin: std::io::stdin(),
            stdout: std::io::stdout(),
        }
    }
}

impl Default for StdIo {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgramIo for StdIo {
    fn read_byte(&mut self) -> Result<Option<u8>, IoError> {
        let mut buf = [0u8; 1];
        loop {
            match self.stdin.lock().read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(buf[0])),
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(_) => return Err(IoError::Closed),
            }
        }
    }

    fn write_byte(&mut self, byte: u8) {
        let mut out = self.stdout.lock();
        let _ = out.write_all(&[byte]);
        let _ = out.flush();
    }

    fn write_diag(&mut self, msg: &str) {
        eprintln!("{msg}");
    }

    fn input_pending(&self) -> bool {
        true
    }
}
