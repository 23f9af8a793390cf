use super::Machine;
use crate::io::{IoError, ProgramIo};
use crate::vm::fault::Fault;
use crate::vm::instruction::Operand;
use crate::vm::state::INPUT_CAPACITY;

impl<C: ProgramIo> Machine<C> {
    pub(super) fn op_out(&mut self, a: Operand) {
        let byte = (self.val(a) & 0xFF) as u8;
        self.io.write_byte(byte);
        self.advance(1);
    }

    pub(super) fn op_in(&mut self, r: u8) -> Result<(), Fault> {
        if self.state.input.drained() {
            self.readline()?;
        }
        let byte = self
            .state
            .input
            .take_byte()
            .ok_or(Fault::Input(IoError::Closed))?;
        self.set_reg(r, u16::from(byte));
        self.advance(1);
        Ok(())
    }

    /// Pull one line from the input channel into the line buffer: bytes
    /// up to and including `\n`, or up to EOF if at least one byte
    /// arrived first. The buffer is only replaced on success, so a
    /// cancelled read leaves the program-visible input untouched.
    fn readline(&mut self) -> Result<(), Fault> {
        let mut line = [0u8; INPUT_CAPACITY];
        let mut len = 0;

        loop {
            if len == INPUT_CAPACITY {
                return Err(Fault::Input(IoError::LineTooLong {
                    max: INPUT_CAPACITY,
                }));
            }
            match self.io.read_byte()? {
                Some(byte) => {
                    line[len] = byte;
                    len += 1;
                    if byte == b'\n' {
                        break;
                    }
                }
                None => {
                    if len == 0 {
                        return Err(Fault::Input(IoError::Closed));
                    }
                    break;
                }
            }
        }

        self.state.input.refill(&line[..len]);
        Ok(())
    }
}
