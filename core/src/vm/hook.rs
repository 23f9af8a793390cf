use crate::vm::fault::Fault;
use crate::vm::history::HistoryRing;
use crate::vm::state::MachineState;

/// What a debug hook wants the executor to do next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HookVerdict {
    /// Carry on with the current tick.
    Resume,
    /// Stop the run; the executor reports a debugger halt.
    Stop,
}

/// Capability the executor offers a debugger.
///
/// The executor calls [`before_op`](DebugHook::before_op) with the live
/// state immediately before decoding each instruction, after the IP has
/// been appended to the history ring. The hook may mutate the state
/// (snapshot restore, for instance); the executor re-reads the IP
/// afterwards. There is no back-pointer from the machine to the
/// debugger, so ownership stays acyclic.
pub trait DebugHook {
    /// Called once per tick before decoding.
    fn before_op(&mut self, state: &mut MachineState, history: &HistoryRing) -> HookVerdict;

    /// Called instead of `before_op` when the next instruction is IN,
    /// the input line buffer is drained, and the input channel has
    /// nothing buffered: executing would block.
    fn on_blocked(&mut self, state: &mut MachineState, history: &HistoryRing) -> HookVerdict;

    /// Called after an execution fault worth inspecting, with the IP
    /// still at the faulting instruction. Purely observational; the
    /// executor stops regardless.
    fn on_fault(&mut self, state: &mut MachineState, history: &HistoryRing, fault: &Fault);
}
