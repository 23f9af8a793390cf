mod common;

use common::boot;
use synvm_core::debug::{disassemble, op_repr};

#[test]
fn op_repr_formats_each_operand_class() {
    assert_eq!(op_repr(0x0000), "0000");
    assert_eq!(op_repr(0x00FF), "00ff");
    assert_eq!(op_repr(0x7FFF), "7fff");
    assert_eq!(op_repr(0x8000), "R0");
    assert_eq!(op_repr(0x8007), "R7");
    assert_eq!(op_repr(0x8008), "0008?");
    assert_eq!(op_repr(0x9000), "1000?");
}

#[test]
fn valid_opcodes_consume_one_plus_arity() {
    // ADD R0 1 2; OUT 'A'; HALT
    let (machine, _) = boot(&[9, 32768, 1, 2, 19, 65, 0]);
    let lines = disassemble(&machine.state().ram, 0, 3);
    assert_eq!(lines.len(), 3);
    assert_eq!((lines[0].addr, lines[0].size), (0, 4));
    assert_eq!((lines[1].addr, lines[1].size), (4, 2));
    assert_eq!((lines[2].addr, lines[2].size), (6, 1));
    assert!(lines[0].text.contains("ADD"));
    assert!(lines[0].text.contains("R0"));
    assert!(lines[1].text.contains("OUT"));
    assert!(lines[2].text.contains("HALT"));
}

#[test]
fn invalid_words_render_raw_and_consume_one() {
    let (machine, _) = boot(&[0x0090, 21]);
    let lines = disassemble(&machine.state().ram, 0, 2);
    assert_eq!(lines[0].size, 1);
    assert!(lines[0].text.contains("0090"));
    assert!(lines[0].text.contains("???"));
    assert!(lines[1].text.contains("NOP"));
}

#[test]
fn stops_at_end_of_address_space() {
    let (machine, _) = boot(&[]);
    let lines = disassemble(&machine.state().ram, 0x7FFE, 10);
    // Two HALT words left, then nothing.
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[1].addr, 0x7FFF);
}

#[test]
fn total_over_arbitrary_memory_contents() {
    let (mut machine, _) = boot(&[]);
    for addr in 0..0x8000usize {
        machine.state_mut().ram[addr] = (addr as u16).wrapping_mul(2654);
    }
    // Never panics, always makes progress, covers the whole space.
    let lines = disassemble(&machine.state().ram, 0, usize::MAX);
    let mut expected_addr = 0u32;
    for line in &lines {
        assert_eq!(u32::from(line.addr), expected_addr);
        assert!(line.size >= 1);
        expected_addr += u32::from(line.size);
    }
    assert!(expected_addr >= 0x8000);
}

#[test]
fn line_format_matches_the_dump_layout() {
    let (machine, _) = boot(&[1, 32769, 0x0010]);
    let lines = disassemble(&machine.state().ram, 0, 1);
    assert_eq!(lines[0].text, "0x0000: SET  R1    0010 ");
}
