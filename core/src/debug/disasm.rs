use crate::vm::instruction::{mnemonic, opcode_arity};
use crate::vm::state::{MAX_ADDR, RAM_WORDS};

/// One decoded line of disassembly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisasmLine {
    pub addr: u16,
    pub text: String,
    /// Words consumed: `1 + arity` for a valid opcode, 1 otherwise. A
    /// scrolling view advances its cursor by the first line's size.
    pub size: u16,
}

/// Render an operand word: literals as four hex digits, registers as
/// `Rn`, and anything above the register range as the masked value with
/// a trailing `?`.
pub fn op_repr(word: u16) -> String {
    if word <= MAX_ADDR {
        return format!("{word:04x}");
    }
    let masked = word & 0x7FFF;
    if masked <= 7 {
        format!("R{masked}")
    } else {
        format!("{masked:04x}?")
    }
}

/// Decode up to `count` lines starting at `start`.
///
/// Total over the whole address space: a word that is a valid opcode
/// prints its mnemonic and operands and consumes `1 + arity` words; any
/// other word prints as raw hex and consumes one. Decoding stops at the
/// end of the 15-bit address space.
pub fn disassemble(ram: &[u16; RAM_WORDS], start: u16, count: usize) -> Vec<DisasmLine> {
    let mut lines = Vec::new();
    let mut addr = u32::from(start);

    while lines.len() < count && addr <= u32::from(MAX_ADDR) {
        let word = ram[addr as usize];
        let line = match (mnemonic(word), opcode_arity(word)) {
            (Some(name), Some(arity)) => {
                let mut text = format!("0x{addr:04x}: {name:<4}");
                for slot in 1..=u32::from(arity) {
                    let operand_addr = addr + slot;
                    if operand_addr > u32::from(MAX_ADDR) {
                        break;
                    }
                    text.push(' ');
                    text.push_str(&format!("{:<5}", op_repr(ram[operand_addr as usize])));
                }
                DisasmLine {
                    addr: addr as u16,
                    text,
                    size: 1 + arity,
                }
            }
            _ => DisasmLine {
                addr: addr as u16,
                text: format!("0x{addr:04x}: {word:04x}          ???"),
                size: 1,
            },
        };
        addr += u32::from(line.size);
        lines.push(line);
    }

    lines
}
