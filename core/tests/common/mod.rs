#![allow(dead_code)]

use std::collections::VecDeque;
use std::io::Write;
use std::sync::{Arc, Mutex};

use synvm_core::io::{IoError, ProgramIo};
use synvm_core::vm::Machine;

/// Scripted I/O for driving a machine in tests: input served from a
/// preloaded queue, output and diagnostics captured for assertions.
pub struct ScriptedIo {
    input: VecDeque<u8>,
    output: Arc<Mutex<Vec<u8>>>,
    diags: Arc<Mutex<Vec<String>>>,
}

/// Read side of a [`ScriptedIo`]'s captured streams.
#[derive(Clone)]
pub struct Capture {
    output: Arc<Mutex<Vec<u8>>>,
    diags: Arc<Mutex<Vec<String>>>,
}

impl ScriptedIo {
    pub fn new(input: &[u8]) -> (Self, Capture) {
        let output = Arc::new(Mutex::new(Vec::new()));
        let diags = Arc::new(Mutex::new(Vec::new()));
        let capture = Capture {
            output: Arc::clone(&output),
            diags: Arc::clone(&diags),
        };
        (
            Self {
                input: input.iter().copied().collect(),
                output,
                diags,
            },
            capture,
        )
    }
}

impl ProgramIo for ScriptedIo {
    fn read_byte(&mut self) -> Result<Option<u8>, IoError> {
        Ok(self.input.pop_front())
    }

    fn write_byte(&mut self, byte: u8) {
        self.output.lock().unwrap().push(byte);
    }

    fn write_diag(&mut self, msg: &str) {
        self.diags.lock().unwrap().push(msg.to_string());
    }

    fn input_pending(&self) -> bool {
        !self.input.is_empty()
    }
}

impl Capture {
    pub fn output(&self) -> Vec<u8> {
        self.output.lock().unwrap().clone()
    }

    pub fn output_string(&self) -> String {
        String::from_utf8_lossy(&self.output()).into_owned()
    }

    pub fn diags(&self) -> Vec<String> {
        self.diags.lock().unwrap().clone()
    }
}

/// Encode a word program as the little-endian byte image the loader
/// expects.
pub fn image(words: &[u16]) -> Vec<u8> {
    words.iter().flat_map(|w| w.to_le_bytes()).collect()
}

/// Machine preloaded with `program`, no input.
pub fn boot(program: &[u16]) -> (Machine<ScriptedIo>, Capture) {
    boot_with_input(program, b"")
}

/// Machine preloaded with `program` and scripted input bytes.
pub fn boot_with_input(program: &[u16], input: &[u8]) -> (Machine<ScriptedIo>, Capture) {
    let (io, capture) = ScriptedIo::new(input);
    let mut machine = Machine::new(io);
    machine.load_image(&image(program));
    (machine, capture)
}

/// Shared writer for capturing debugger shell output.
#[derive(Clone, Default)]
pub struct SharedBuf(pub Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Debugger wired to a scripted command stream; returns the debugger
/// and the captured shell output.
pub fn scripted_debugger(commands: &str) -> (synvm_core::debug::Debugger, SharedBuf) {
    let buf = SharedBuf::default();
    let debugger = synvm_core::debug::Debugger::with_console(
        Box::new(std::io::Cursor::new(commands.to_string().into_bytes())),
        Box::new(buf.clone()),
    );
    (debugger, buf)
}
