use super::Machine;
use crate::io::ProgramIo;
use crate::vm::fault::Fault;
use crate::vm::instruction::Operand;

impl<C: ProgramIo> Machine<C> {
    pub(super) fn op_push(&mut self, a: Operand) {
        let value = self.val(a);
        self.state.stack.push(value);
        self.advance(1);
    }

    pub(super) fn op_pop(&mut self, r: u8) -> Result<(), Fault> {
        let value = self
            .state
            .stack
            .pop()
            .ok_or(Fault::StackUnderflow { ip: self.state.ip })?;
        self.set_reg(r, value);
        self.advance(1);
        Ok(())
    }
}
