mod common;

use common::{boot, boot_with_input};
use synvm_core::vm::{Instruction, Step, machine::Machine, opcode_arity};

#[test]
fn out_two_chars_then_halt() {
    // OUT 'A'; OUT 'B'; HALT
    let (mut machine, capture) = boot(&[19, 65, 19, 66, 0]);
    machine.run().unwrap();
    assert_eq!(capture.output_string(), "AB");
    assert!(capture.diags().iter().any(|d| d == "Program halted!"));
}

#[test]
fn add_register_plus_literal() {
    // ADD R0 = R0 + 2; OUT R0; HALT
    let (mut machine, capture) = boot(&[9, 32768, 32768, 2, 19, 32768, 0]);
    machine.run().unwrap();
    assert_eq!(capture.output(), vec![2]);
    assert_eq!(machine.state().regs[0], 2);
}

#[test]
fn set_two_registers_and_add() {
    // SET R0 4; SET R1 5; ADD R2 = R0 + R1; OUT R2; HALT
    let program = [1, 32768, 4, 1, 32769, 5, 9, 32770, 32768, 32769, 19, 32770, 0];
    let (mut machine, capture) = boot(&program);
    machine.run().unwrap();
    assert_eq!(capture.output(), vec![9]);
    assert_eq!(machine.state().regs[2], 9);
}

#[test]
fn in_echoes_input_byte() {
    // IN R0; OUT R0; HALT
    let (mut machine, capture) = boot_with_input(&[20, 32768, 19, 32768, 0], b"Z\n");
    machine.run().unwrap();
    assert_eq!(capture.output_string(), "Z");
    assert_eq!(machine.state().regs[0], u16::from(b'Z'));
}

#[test]
fn readline_hands_out_newline_then_refills() {
    // Four INs across two lines: 'h', 'i', '\n', then a fresh readline
    // for 'y'.
    let program = [
        20, 32768, 20, 32769, 20, 32770, 20, 32771, 0,
    ];
    let (mut machine, _capture) = boot_with_input(&program, b"hi\nyo\n");
    machine.run().unwrap();
    let regs = &machine.state().regs;
    assert_eq!(regs[0], u16::from(b'h'));
    assert_eq!(regs[1], u16::from(b'i'));
    assert_eq!(regs[2], u16::from(b'\n'));
    assert_eq!(regs[3], u16::from(b'y'));
}

#[test]
fn non_jump_ops_advance_ip_by_one_plus_arity() {
    // (program, expected ip after one tick)
    let cases: &[(&[u16], u16)] = &[
        (&[21], 1),                          // NOP
        (&[1, 32768, 7], 3),                 // SET
        (&[2, 42], 2),                       // PUSH
        (&[4, 32768, 1, 1], 4),              // EQ
        (&[5, 32768, 2, 1], 4),              // GT
        (&[9, 32768, 1, 2], 4),              // ADD
        (&[10, 32768, 3, 4], 4),             // MULT
        (&[11, 32768, 7, 3], 4),             // MOD
        (&[12, 32768, 6, 3], 4),             // AND
        (&[13, 32768, 6, 3], 4),             // OR
        (&[14, 32768, 0], 3),                // NOT
        (&[15, 32768, 100], 3),              // RMEM
        (&[16, 100, 7], 3),                  // WMEM
        (&[19, 65], 2),                      // OUT
        (&[20, 32768], 2),                   // IN (scripted input below)
    ];
    for (program, expected_ip) in cases {
        let (mut machine, _capture) = boot_with_input(program, b"x\n");
        assert_eq!(machine.tick().unwrap(), Step::Ran);
        assert_eq!(
            machine.state().ip,
            *expected_ip,
            "wrong ip after opcode {}",
            program[0]
        );
        assert_eq!(machine.state().ticks, 1);
    }
}

#[test]
fn decoded_arity_matches_the_opcode_table() {
    for opcode in 0..=21u16 {
        // Register where a register is required, tiny literals elsewhere.
        let (machine, _) = boot(&[opcode, 32768, 1, 1]);
        let instr = Instruction::decode(&machine.state().ram, 0).unwrap();
        assert_eq!(Some(instr.arity()), opcode_arity(opcode), "opcode {opcode}");
    }
    assert_eq!(opcode_arity(22), None);
}

#[test]
fn arithmetic_wraps_mod_0x8000() {
    fn run_one(program: &[u16]) -> u16 {
        let (mut machine, _capture) = boot(program);
        machine.tick().unwrap();
        machine.state().regs[0]
    }

    assert_eq!(run_one(&[9, 32768, 0x7FFF, 1]), 0); // ADD wraps
    assert_eq!(run_one(&[9, 32768, 0x7FFF, 0x7FFF]), 0x7FFE);
    assert_eq!(run_one(&[10, 32768, 0x4000, 2]), 0); // MULT wraps
    assert_eq!(run_one(&[10, 32768, 1234, 1]), 1234);
    assert_eq!(run_one(&[11, 32768, 7, 3]), 1); // MOD
    assert_eq!(run_one(&[12, 32768, 0b1100, 0b1010]), 0b1000); // AND
    assert_eq!(run_one(&[13, 32768, 0b1100, 0b1010]), 0b1110); // OR
    assert_eq!(run_one(&[14, 32768, 0]), 0x7FFF); // NOT is 15-bit
    assert_eq!(run_one(&[14, 32768, 0x7FFF]), 0);
}

#[test]
fn eq_and_gt_store_flags() {
    let (mut machine, _capture) = boot(&[4, 32768, 5, 5, 5, 32769, 6, 5, 0]);
    machine.run().unwrap();
    assert_eq!(machine.state().regs[0], 1);
    assert_eq!(machine.state().regs[1], 1);

    let (mut machine, _capture) = boot(&[4, 32768, 5, 6, 5, 32769, 5, 5, 0]);
    machine.run().unwrap();
    assert_eq!(machine.state().regs[0], 0);
    assert_eq!(machine.state().regs[1], 0);
}

#[test]
fn rmem_and_wmem_round_trip() {
    // WMEM [100] = 1234; RMEM R0 = [100]; HALT
    let (mut machine, _capture) = boot(&[16, 100, 1234, 15, 32768, 100, 0]);
    machine.run().unwrap();
    assert_eq!(machine.state().ram[100], 1234);
    assert_eq!(machine.state().regs[0], 1234);
}

#[test]
fn out_masks_to_low_byte() {
    // SET R0 0x141; OUT R0 -> 'A'
    let (mut machine, capture) = boot(&[1, 32768, 0x141, 19, 32768, 0]);
    machine.run().unwrap();
    assert_eq!(capture.output(), vec![0x41]);
}

#[test]
fn ticks_count_every_dispatch() {
    let (mut machine, _capture) = boot(&[21, 21, 21, 0]);
    machine.run().unwrap();
    assert_eq!(machine.state().ticks, 4);
}

#[test]
fn loader_is_little_endian() {
    let (io, _capture) = common::ScriptedIo::new(b"");
    let mut machine = Machine::new(io);
    let words = machine.load_image(&[0x34, 0x12, 0x56]);
    assert_eq!(words, 2);
    assert_eq!(machine.state().ram[0], 0x1234);
    assert_eq!(machine.state().ram[1], 0x0056); // odd trailing byte
}

#[test]
fn loader_truncates_past_address_space() {
    let (io, _capture) = common::ScriptedIo::new(b"");
    let mut machine = Machine::new(io);
    let image: Vec<u8> = std::iter::repeat(0xAB).take((0x8000 + 16) * 2).collect();
    let words = machine.load_image(&image);
    assert_eq!(words, 0x8000);
    assert_eq!(machine.state().ram[0x7FFF], 0xABAB);
}

#[test]
fn loader_resets_registers_and_ip() {
    let (mut machine, _capture) = boot(&[1, 32768, 7, 0]);
    machine.run().unwrap();
    assert_eq!(machine.state().regs[0], 7);
    machine.load_image(&common::image(&[0]));
    assert_eq!(machine.state().regs[0], 0);
    assert_eq!(machine.state().ip, 0);
}
