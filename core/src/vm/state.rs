use crate::vm::stack::ValueStack;

/// Number of addressable words: 15-bit address space.
pub const RAM_WORDS: usize = 1 << 15;

/// Highest valid memory address.
pub const MAX_ADDR: u16 = (RAM_WORDS - 1) as u16;

/// Capacity of the program input line buffer, including the newline.
pub const INPUT_CAPACITY: usize = 128;

/// One line of program input, drained one byte per IN instruction.
///
/// A fresh line is read from the I/O channel only once every previously
/// buffered byte (the terminating newline included) has been handed to
/// the program.
#[derive(Clone, PartialEq, Eq)]
pub struct LineBuffer {
    bytes: [u8; INPUT_CAPACITY],
    len: usize,
    pos: usize,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self {
            bytes: [0; INPUT_CAPACITY],
            len: 0,
            pos: 0,
        }
    }

    /// True when every buffered byte has been consumed.
    pub fn drained(&self) -> bool {
        self.pos == self.len
    }

    /// Replace the buffered line. `line` must fit the fixed capacity;
    /// the readline path enforces that before calling.
    pub fn refill(&mut self, line: &[u8]) {
        let len = line.len().min(INPUT_CAPACITY);
        self.bytes[..len].copy_from_slice(&line[..len]);
        self.len = len;
        self.pos = 0;
    }

    /// Hand out the next buffered byte, if any.
    pub fn take_byte(&mut self) -> Option<u8> {
        if self.drained() {
            return None;
        }
        let byte = self.bytes[self.pos];
        self.pos += 1;
        Some(byte)
    }

    /// Bytes not yet consumed by the program.
    pub fn remaining(&self) -> &[u8] {
        &self.bytes[self.pos..self.len]
    }
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LineBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineBuffer")
            .field("len", &self.len)
            .field("pos", &self.pos)
            .finish()
    }
}

/// Complete execution state of one virtual machine.
///
/// Pure data: the executor and snapshot restore are the only mutators.
/// `Clone` deep-copies everything, which is what the debugger's state
/// bank relies on; the I/O channel is deliberately not part of the
/// state.
#[derive(Clone, PartialEq, Eq)]
pub struct MachineState {
    pub ram: Box<[u16; RAM_WORDS]>,
    pub regs: [u16; 8],
    pub stack: ValueStack,
    pub ip: u16,
    pub ticks: u64,
    pub input: LineBuffer,
}

impl MachineState {
    pub fn new() -> Self {
        Self {
            ram: Box::new([0; RAM_WORDS]),
            regs: [0; 8],
            stack: ValueStack::new(),
            ip: 0,
            ticks: 0,
            input: LineBuffer::new(),
        }
    }

    /// Load a program image: little-endian byte pairs written as
    /// consecutive words from address 0. A trailing odd byte becomes the
    /// low byte of one final word; anything past the address space is
    /// silently dropped. Registers and IP are reset. Returns the number
    /// of words written.
    pub fn load_image(&mut self, bytes: &[u8]) -> usize {
        let mut words = 0;
        for (addr, pair) in bytes.chunks(2).take(RAM_WORDS).enumerate() {
            let lo = u16::from(pair[0]);
            let hi = pair.get(1).copied().map_or(0, u16::from);
            self.ram[addr] = hi << 8 | lo;
            words += 1;
        }
        self.regs = [0; 8];
        self.ip = 0;
        words
    }
}

impl Default for MachineState {
    fn default() -> Self {
        Self::new()
    }
}
