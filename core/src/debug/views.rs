//! Plain-text renderings of machine state for the debugger shell.
//!
//! Everything renders into a `String` so the shell can write a whole
//! pane at once and tests can assert on the text directly.

use std::fmt::Write;

use crate::vm::history::HistoryRing;
use crate::vm::stack::ValueStack;
use crate::vm::state::{MachineState, RAM_WORDS};

/// Words shown per memory row.
const ROW_WORDS: usize = 16;

pub fn render_regs(state: &MachineState) -> String {
    let r = &state.regs;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "R0: {:04x}, R1: {:04x}, R2: {:04x}, R3: {:04x}",
        r[0], r[1], r[2], r[3]
    );
    let _ = writeln!(
        out,
        "R4: {:04x}, R5: {:04x}, R6: {:04x}, R7: {:04x}",
        r[4], r[5], r[6], r[7]
    );
    let _ = writeln!(out, "IP: {:04x}    TICKS: {}", state.ip, state.ticks);
    out
}

pub fn render_stack(stack: &ValueStack) -> String {
    let mut out = String::from("STACK TOP\n");
    for value in stack.iter_from_top() {
        let _ = writeln!(out, ": 0x{value:04x}");
    }
    out.push_str("STACK BASE\n");
    out
}

pub fn render_history(history: &HistoryRing) -> String {
    let mut out = String::from("HISTORY BEGIN:\n");
    let mut printed = 0;
    for value in history.iter() {
        let _ = write!(out, "{value:04x}, ");
        printed += 1;
        if printed % 15 == 0 {
            out.push('\n');
        }
    }
    if printed % 15 != 0 {
        out.push('\n');
    }
    out.push_str("HISTORY END\n");
    out
}

/// Hex dump of `size` words starting at `addr`: rows of 16 words
/// aligned down to a 16-word boundary, split 8+8, with an ASCII column.
pub fn render_memory(ram: &[u16; RAM_WORDS], addr: u16, size: u16) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "MEMORY DUMP ({:04x}, {:04x})",
        addr,
        addr.wrapping_add(size)
    );

    let mut values = [0u16; ROW_WORDS];
    let mut mask = [false; ROW_WORDS];
    let mut row_base = addr & !0xF;
    let mut cursor = u32::from(addr);
    let end = u32::from(addr) + u32::from(size);

    while cursor < end && (cursor as usize) < RAM_WORDS {
        let index = (cursor - u32::from(row_base)) as usize;
        values[index] = ram[cursor as usize];
        mask[index] = true;
        cursor += 1;
        if index == ROW_WORDS - 1 {
            out.push_str(&format_row(row_base, &values, &mask));
            row_base += ROW_WORDS as u16;
            mask = [false; ROW_WORDS];
        }
    }
    if mask.iter().any(|&m| m) {
        out.push_str(&format_row(row_base, &values, &mask));
    }
    out
}

/// Rows of two memory snapshots over `[addr, addr + size)` that differ
/// in at least one word. Each differing row prints twice, first side,
/// then second side, with only the differing cells populated.
pub fn render_memory_diff(
    left: &[u16; RAM_WORDS],
    right: &[u16; RAM_WORDS],
    addr: u16,
    size: u16,
) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "MEMORY DIFF ({:04x}, {:04x})",
        addr,
        addr.wrapping_add(size)
    );

    let mut left_row = [0u16; ROW_WORDS];
    let mut right_row = [0u16; ROW_WORDS];
    let mut mask = [false; ROW_WORDS];
    let mut row_base = addr & !0xF;
    let mut cursor = u32::from(addr);
    let end = u32::from(addr) + u32::from(size);

    while cursor < end && (cursor as usize) < RAM_WORDS {
        let index = (cursor - u32::from(row_base)) as usize;
        let a = left[cursor as usize];
        let b = right[cursor as usize];
        if a != b {
            left_row[index] = a;
            right_row[index] = b;
            mask[index] = true;
        }
        cursor += 1;
        if index == ROW_WORDS - 1 {
            if mask.iter().any(|&m| m) {
                out.push_str(&format_row(row_base, &left_row, &mask));
                out.push_str(&format_row(row_base, &right_row, &mask));
            }
            row_base += ROW_WORDS as u16;
            mask = [false; ROW_WORDS];
        }
    }
    if mask.iter().any(|&m| m) {
        out.push_str(&format_row(row_base, &left_row, &mask));
        out.push_str(&format_row(row_base, &right_row, &mask));
    }
    out
}

fn format_row(base: u16, values: &[u16; ROW_WORDS], mask: &[bool; ROW_WORDS]) -> String {
    let mut out = String::new();
    let _ = write!(out, "{base:04x}: ");
    for i in 0..ROW_WORDS {
        if i == 8 {
            out.push(' ');
        }
        if mask[i] {
            let _ = write!(out, "{:04x} ", values[i]);
        } else {
            out.push_str("     ");
        }
    }
    out.push_str("| ");
    for i in 0..ROW_WORDS {
        if i == 8 {
            out.push(' ');
        }
        out.push(if mask[i] { printable(values[i]) } else { ' ' });
    }
    out.push_str(" |\n");
    out
}

fn printable(value: u16) -> char {
    if (0x21..=0x7E).contains(&value) {
        value as u8 as char
    } else {
        '.'
    }
}
