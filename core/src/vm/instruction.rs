use crate::vm::fault::Fault;
use crate::vm::state::{MAX_ADDR, RAM_WORDS};

/// Opcode word of the IN instruction; the executor peeks at it to
/// detect reads that would block before handing control to a debugger.
pub const OPCODE_IN: u16 = 20;

const ARITY: [u16; 22] = [
    0, 2, 1, 1, 3, 3, 1, 2, 2, 3, 3, 3, 3, 3, 2, 2, 2, 1, 0, 1, 1, 0,
];

const MNEMONICS: [&str; 22] = [
    "HALT", "SET", "PUSH", "POP", "EQ", "GT", "JMP", "JNZ", "JZ", "ADD", "MULT", "MOD", "AND",
    "OR", "NOT", "RMEM", "WMEM", "CALL", "RET", "OUT", "IN", "NOP",
];

/// Operand count for a raw opcode word, or `None` if it is not one.
pub fn opcode_arity(opcode: u16) -> Option<u16> {
    ARITY.get(usize::from(opcode)).copied()
}

/// Mnemonic for a raw opcode word, or `None` if it is not one.
pub fn mnemonic(opcode: u16) -> Option<&'static str> {
    MNEMONICS.get(usize::from(opcode)).copied()
}

/// A decoded operand word.
///
/// Raw words up to 0x7FFF are literal values; 0x8000..=0x8007 select a
/// register; everything above is invalid and faults during decoding, so
/// the opcode handlers never see a malformed operand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operand {
    Literal(u16),
    Reg(u8),
}

impl Operand {
    pub fn decode(raw: u16, ip: u16) -> Result<Self, Fault> {
        match raw {
            0..=0x7FFF => Ok(Operand::Literal(raw)),
            0x8000..=0x8007 => Ok(Operand::Reg((raw & 7) as u8)),
            _ => Err(Fault::InvalidOperand { word: raw, ip }),
        }
    }

    /// Decode a slot that must name a register (a write destination).
    pub fn expect_reg(raw: u16, ip: u16) -> Result<u8, Fault> {
        match raw {
            0x8000..=0x8007 => Ok((raw & 7) as u8),
            _ => Err(Fault::ExpectedRegister { word: raw, ip }),
        }
    }
}

/// One fully decoded instruction.
///
/// Register destinations are decoded to their index; everything else is
/// an [`Operand`]. Operand-class validation happens entirely in
/// [`Instruction::decode`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Instruction {
    Halt,
    Set(u8, Operand),
    Push(Operand),
    Pop(u8),
    Eq(u8, Operand, Operand),
    Gt(u8, Operand, Operand),
    Jmp(Operand),
    Jnz(Operand, Operand),
    Jz(Operand, Operand),
    Add(u8, Operand, Operand),
    Mult(u8, Operand, Operand),
    Mod(u8, Operand, Operand),
    And(u8, Operand, Operand),
    Or(u8, Operand, Operand),
    Not(u8, Operand),
    Rmem(u8, Operand),
    Wmem(Operand, Operand),
    Call(Operand),
    Ret,
    Out(Operand),
    In(u8),
    Nop,
}

impl Instruction {
    /// Decode the instruction at `ip`. Faults on an IP outside the
    /// address space, an unknown opcode, operands that run past the end
    /// of memory, or operand words of the wrong class.
    pub fn decode(ram: &[u16; RAM_WORDS], ip: u16) -> Result<Self, Fault> {
        if ip > MAX_ADDR {
            return Err(Fault::IpOutOfRange { ip });
        }
        let opcode = ram[usize::from(ip)];
        let arity = opcode_arity(opcode).ok_or(Fault::InvalidOpcode { word: opcode, ip })?;
        if u32::from(ip) + u32::from(arity) > u32::from(MAX_ADDR) {
            return Err(Fault::IpOutOfRange { ip });
        }

        let w = |slot: u16| ram[usize::from(ip + slot)];
        use Instruction::*;
        Ok(match opcode {
            0 => Halt,
            1 => Set(Operand::expect_reg(w(1), ip)?, Operand::decode(w(2), ip)?),
            2 => Push(Operand::decode(w(1), ip)?),
            3 => Pop(Operand::expect_reg(w(1), ip)?),
            4 => Eq(
                Operand::expect_reg(w(1), ip)?,
                Operand::decode(w(2), ip)?,
                Operand::decode(w(3), ip)?,
            ),
            5 => Gt(
                Operand::expect_reg(w(1), ip)?,
                Operand::decode(w(2), ip)?,
                Operand::decode(w(3), ip)?,
            ),
            6 => Jmp(Operand::decode(w(1), ip)?),
            7 => Jnz(Operand::decode(w(1), ip)?, Operand::decode(w(2), ip)?),
            8 => Jz(Operand::decode(w(1), ip)?, Operand::decode(w(2), ip)?),
            9 => Add(
                Operand::expect_reg(w(1), ip)?,
                Operand::decode(w(2), ip)?,
                Operand::decode(w(3), ip)?,
            ),
            10 => Mult(
                Operand::expect_reg(w(1), ip)?,
                Operand::decode(w(2), ip)?,
                Operand::decode(w(3), ip)?,
            ),
            11 => Mod(
                Operand::expect_reg(w(1), ip)?,
                Operand::decode(w(2), ip)?,
                Operand::decode(w(3), ip)?,
            ),
            12 => And(
                Operand::expect_reg(w(1), ip)?,
                Operand::decode(w(2), ip)?,
                Operand::decode(w(3), ip)?,
            ),
            13 => Or(
                Operand::expect_reg(w(1), ip)?,
                Operand::decode(w(2), ip)?,
                Operand::decode(w(3), ip)?,
            ),
            14 => Not(Operand::expect_reg(w(1), ip)?, Operand::decode(w(2), ip)?),
            15 => Rmem(Operand::expect_reg(w(1), ip)?, Operand::decode(w(2), ip)?),
            16 => Wmem(Operand::decode(w(1), ip)?, Operand::decode(w(2), ip)?),
            17 => Call(Operand::decode(w(1), ip)?),
            18 => Ret,
            19 => Out(Operand::decode(w(1), ip)?),
            20 => In(Operand::expect_reg(w(1), ip)?),
            21 => Nop,
            _ => return Err(Fault::InvalidOpcode { word: opcode, ip }),
        })
    }

    /// Number of operand words following the opcode word.
    pub fn arity(&self) -> u16 {
        use Instruction::*;
        match self {
            Halt | Ret | Nop => 0,
            Push(_) | Pop(_) | Jmp(_) | Call(_) | Out(_) | In(_) => 1,
            Set(..) | Jnz(..) | Jz(..) | Not(..) | Rmem(..) | Wmem(..) => 2,
            Eq(..) | Gt(..) | Add(..) | Mult(..) | Mod(..) | And(..) | Or(..) => 3,
        }
    }
}
