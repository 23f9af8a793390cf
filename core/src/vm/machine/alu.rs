use super::{Machine, cap};
use crate::io::ProgramIo;
use crate::vm::fault::Fault;
use crate::vm::instruction::Operand;

impl<C: ProgramIo> Machine<C> {
    pub(super) fn op_eq(&mut self, r: u8, b: Operand, c: Operand) {
        let result = u16::from(self.val(b) == self.val(c));
        self.set_reg(r, result);
        self.advance(3);
    }

    pub(super) fn op_gt(&mut self, r: u8, b: Operand, c: Operand) {
        let result = u16::from(self.val(b) > self.val(c));
        self.set_reg(r, result);
        self.advance(3);
    }

    pub(super) fn op_add(&mut self, r: u8, b: Operand, c: Operand) {
        let sum = u32::from(self.val(b)) + u32::from(self.val(c));
        self.set_reg(r, cap(sum));
        self.advance(3);
    }

    pub(super) fn op_mult(&mut self, r: u8, b: Operand, c: Operand) {
        let product = u32::from(self.val(b)) * u32::from(self.val(c));
        self.set_reg(r, cap(product));
        self.advance(3);
    }

    pub(super) fn op_mod(&mut self, r: u8, b: Operand, c: Operand) -> Result<(), Fault> {
        let divisor = self.val(c);
        if divisor == 0 {
            return Err(Fault::DivisionByZero { ip: self.state.ip });
        }
        let result = self.val(b) % divisor;
        self.set_reg(r, cap(u32::from(result)));
        self.advance(3);
        Ok(())
    }

    pub(super) fn op_and(&mut self, r: u8, b: Operand, c: Operand) {
        let result = self.val(b) & self.val(c);
        self.set_reg(r, cap(u32::from(result)));
        self.advance(3);
    }

    pub(super) fn op_or(&mut self, r: u8, b: Operand, c: Operand) {
        let result = self.val(b) | self.val(c);
        self.set_reg(r, cap(u32::from(result)));
        self.advance(3);
    }

    pub(super) fn op_not(&mut self, r: u8, b: Operand) {
        let result = !self.val(b);
        self.set_reg(r, cap(u32::from(result)));
        self.advance(2);
    }
}
