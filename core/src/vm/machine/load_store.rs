use super::{Machine, cap};
use crate::io::ProgramIo;
use crate::vm::fault::Fault;
use crate::vm::instruction::Operand;
use crate::vm::state::MAX_ADDR;

impl<C: ProgramIo> Machine<C> {
    pub(super) fn op_set(&mut self, r: u8, b: Operand) {
        let value = self.val(b);
        self.set_reg(r, value);
        self.advance(2);
    }

    pub(super) fn op_rmem(&mut self, r: u8, b: Operand) -> Result<(), Fault> {
        let addr = self.checked_addr(b)?;
        let value = self.state.ram[usize::from(addr)];
        self.set_reg(r, cap(u32::from(value)));
        self.advance(2);
        Ok(())
    }

    pub(super) fn op_wmem(&mut self, a: Operand, b: Operand) -> Result<(), Fault> {
        let addr = self.checked_addr(a)?;
        let value = self.val(b);
        self.state.ram[usize::from(addr)] = value;
        self.advance(2);
        Ok(())
    }

    /// Resolve an operand used as a memory address. Register contents
    /// normally stay in the 15-bit range, but a return address pushed by
    /// CALL at the top of memory can exceed it, so the bound is checked
    /// here rather than assumed.
    fn checked_addr(&self, operand: Operand) -> Result<u16, Fault> {
        let addr = self.val(operand);
        if addr > MAX_ADDR {
            return Err(Fault::AddressOutOfRange {
                addr,
                ip: self.state.ip,
            });
        }
        Ok(addr)
    }
}
