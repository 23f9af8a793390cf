mod alu;
mod branch;
mod io;
mod load_store;
mod stack;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::io::ProgramIo;
use crate::vm::fault::Fault;
use crate::vm::history::HistoryRing;
use crate::vm::hook::{DebugHook, HookVerdict};
use crate::vm::instruction::{Instruction, OPCODE_IN, Operand};
use crate::vm::state::{MAX_ADDR, MachineState};

/// Outcome of one successful tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// The instruction executed; the machine can keep going.
    Ran,
    /// The program ended normally (HALT, or RET on an empty stack).
    Halted,
}

/// The virtual machine: state, IP history, and the program's I/O
/// channel. Decoding and the opcode handlers live here; the debugger
/// only ever sees the state through the [`DebugHook`] calls.
pub struct Machine<C: ProgramIo> {
    state: MachineState,
    history: HistoryRing,
    io: C,
    stop: Arc<AtomicBool>,
}

impl<C: ProgramIo> Machine<C> {
    pub fn new(io: C) -> Self {
        Self::with_stop_flag(io, Arc::new(AtomicBool::new(false)))
    }

    /// Build a machine whose run loop also watches an external stop
    /// flag; the controller uses this to interrupt the executor thread.
    pub fn with_stop_flag(io: C, stop: Arc<AtomicBool>) -> Self {
        Self {
            state: MachineState::new(),
            history: HistoryRing::new(),
            io,
            stop,
        }
    }

    pub fn state(&self) -> &MachineState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut MachineState {
        &mut self.state
    }

    pub fn history(&self) -> &HistoryRing {
        &self.history
    }

    /// Load a program image into memory. See
    /// [`MachineState::load_image`] for the format.
    pub fn load_image(&mut self, bytes: &[u8]) -> usize {
        self.state.load_image(bytes)
    }

    /// One fetch-decode-execute step without a debugger attached.
    pub fn tick(&mut self) -> Result<Step, Fault> {
        self.tick_inner(None)
    }

    /// One step with a debugger consulted before decoding.
    pub fn tick_with_hook(&mut self, hook: &mut dyn DebugHook) -> Result<Step, Fault> {
        self.tick_inner(Some(hook))
    }

    /// One fetch-decode-execute step: append the IP to the history
    /// ring, bump the tick counter, consult the debug hook, decode, and
    /// execute.
    fn tick_inner(&mut self, mut hook: Option<&mut dyn DebugHook>) -> Result<Step, Fault> {
        let ip = self.state.ip;
        self.history.push(ip);
        self.state.ticks += 1;

        if ip > MAX_ADDR {
            return Err(Fault::IpOutOfRange { ip });
        }

        if let Some(hook) = hook.as_deref_mut() {
            let next_op = self.state.ram[usize::from(ip)];
            let would_block =
                next_op == OPCODE_IN && self.state.input.drained() && !self.io.input_pending();
            let verdict = if would_block {
                hook.on_blocked(&mut self.state, &self.history)
            } else {
                hook.before_op(&mut self.state, &self.history)
            };
            if verdict == HookVerdict::Stop {
                return Err(Fault::DebuggerHalt);
            }
        }

        // The hook may have rewritten the state (snapshot load), so
        // decode from the IP as it stands now.
        let instr = Instruction::decode(&self.state.ram, self.state.ip)?;
        self.execute(instr)
    }

    /// Run until HALT, a fault, or the stop flag.
    pub fn run(&mut self) -> Result<(), Fault> {
        self.run_inner(None)
    }

    /// Run with a debugger attached.
    pub fn run_with_hook(&mut self, hook: &mut dyn DebugHook) -> Result<(), Fault> {
        self.run_inner(Some(hook))
    }

    /// Run until HALT, a fault, or the stop flag. `Ok` covers normal
    /// termination and an external stop; faults come back as `Err`
    /// after the hook (if any) has had its post-mortem look.
    fn run_inner(&mut self, mut hook: Option<&mut dyn DebugHook>) -> Result<(), Fault> {
        loop {
            if self.stop.load(Ordering::SeqCst) {
                log::debug!("executor observed stop flag at {:04x}", self.state.ip);
                return Ok(());
            }
            let reborrowed: Option<&mut dyn DebugHook> = match &mut hook {
                Some(h) => Some(&mut **h),
                None => None,
            };
            let step = self.tick_inner(reborrowed);
            match step {
                Ok(Step::Ran) => {}
                Ok(Step::Halted) => return Ok(()),
                Err(fault) => {
                    self.io.write_diag(&fault.to_string());
                    if fault.enters_debugger() {
                        let reborrowed: Option<&mut dyn DebugHook> = match &mut hook {
                            Some(h) => Some(&mut **h),
                            None => None,
                        };
                        if let Some(hook) = reborrowed {
                            hook.on_fault(&mut self.state, &self.history, &fault);
                        }
                    }
                    return Err(fault);
                }
            }
        }
    }

    fn execute(&mut self, instr: Instruction) -> Result<Step, Fault> {
        use Instruction::*;
        match instr {
            Halt => {
                self.io.write_diag("Program halted!");
                return Ok(Step::Halted);
            }
            Ret => return Ok(self.op_ret()),
            Set(r, b) => self.op_set(r, b),
            Push(a) => self.op_push(a),
            Pop(r) => self.op_pop(r)?,
            Eq(r, b, c) => self.op_eq(r, b, c),
            Gt(r, b, c) => self.op_gt(r, b, c),
            Jmp(a) => self.op_jmp(a),
            Jnz(a, b) => self.op_jnz(a, b),
            Jz(a, b) => self.op_jz(a, b),
            Add(r, b, c) => self.op_add(r, b, c),
            Mult(r, b, c) => self.op_mult(r, b, c),
            Mod(r, b, c) => self.op_mod(r, b, c)?,
            And(r, b, c) => self.op_and(r, b, c),
            Or(r, b, c) => self.op_or(r, b, c),
            Not(r, b) => self.op_not(r, b),
            Rmem(r, b) => self.op_rmem(r, b)?,
            Wmem(a, b) => self.op_wmem(a, b)?,
            Call(a) => self.op_call(a),
            Out(a) => self.op_out(a),
            In(r) => self.op_in(r)?,
            Nop => self.advance(0),
        }
        Ok(Step::Ran)
    }

    /// Resolve an operand: literals are their own value, registers read
    /// the register file.
    fn val(&self, operand: Operand) -> u16 {
        match operand {
            Operand::Literal(value) => value,
            Operand::Reg(index) => self.state.regs[usize::from(index)],
        }
    }

    fn set_reg(&mut self, index: u8, value: u16) {
        self.state.regs[usize::from(index)] = value;
    }

    /// Step the IP over the opcode word plus its operands.
    fn advance(&mut self, arity: u16) {
        self.state.ip = self.state.ip.wrapping_add(1 + arity);
    }
}

/// Arithmetic wraps into the 15-bit value range.
pub(super) fn cap(value: u32) -> u16 {
    (value & 0x7FFF) as u16
}
