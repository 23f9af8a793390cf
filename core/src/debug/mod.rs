pub mod disasm;
mod shell;
pub mod views;

pub use disasm::{DisasmLine, disassemble, op_repr};

use std::collections::BTreeSet;
use std::io::{BufRead, Write};

use crate::vm::fault::Fault;
use crate::vm::history::HistoryRing;
use crate::vm::hook::{DebugHook, HookVerdict};
use crate::vm::stack::{StackDiff, ValueStack};
use crate::vm::state::{MachineState, RAM_WORDS};

/// Slots in each snapshot bank.
pub const BANK_SLOTS: usize = 10;

/// Default number of disassembly lines per dump.
const DEFAULT_DISASS_LINES: u16 = 15;

/// Words of memory shown per dump at the memory cursor.
const MEMORY_VIEW_WORDS: u16 = 0x200;

/// Panes the shell can render between prompts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum View {
    History,
    Stack,
    Regs,
    Disass,
    Memory,
}

#[derive(Clone, Debug)]
struct ViewToggles {
    history: bool,
    stack: bool,
    regs: bool,
    disass: bool,
    memory: bool,
}

impl Default for ViewToggles {
    fn default() -> Self {
        Self {
            history: true,
            stack: false,
            regs: true,
            disass: true,
            memory: false,
        }
    }
}

/// The interactive debugger.
///
/// Owns the breakpoint set, the snapshot banks, and the command shell;
/// attaches to a machine purely through the [`DebugHook`] calls. It
/// runs on the executor thread, so nothing here needs locking.
pub struct Debugger {
    breakpoints: BTreeSet<u16>,
    states: [Option<MachineState>; BANK_SLOTS],
    stacks: [Option<ValueStack>; BANK_SLOTS],
    rams: [Option<Box<[u16; RAM_WORDS]>>; BANK_SLOTS],

    views: ViewToggles,
    disass_pos: u16,
    disass_next_size: u16,
    disass_lines: u16,
    memory_pos: u16,

    /// Breakpoint hits left to pass over after `c N`.
    skips: u64,
    /// Instructions left to step silently after `s N`.
    sskips: u64,
    /// When set, the shell opens before every instruction.
    interactive: bool,
    /// Latched by the `halt` command; fails the next tick.
    halt_latch: bool,

    prev_command: String,
    input: Box<dyn BufRead + Send>,
    output: Box<dyn Write + Send>,
}

impl Debugger {
    /// Debugger talking to the process's stdin/stdout.
    pub fn new() -> Self {
        Self::with_console(
            Box::new(std::io::BufReader::new(std::io::stdin())),
            Box::new(std::io::stdout()),
        )
    }

    /// Debugger with an injected command console, for front-ends and
    /// tests.
    pub fn with_console(input: Box<dyn BufRead + Send>, output: Box<dyn Write + Send>) -> Self {
        Self {
            breakpoints: BTreeSet::new(),
            states: std::array::from_fn(|_| None),
            stacks: std::array::from_fn(|_| None),
            rams: std::array::from_fn(|_| None),
            views: ViewToggles::default(),
            disass_pos: 0,
            disass_next_size: 1,
            disass_lines: DEFAULT_DISASS_LINES,
            memory_pos: 0,
            skips: 0,
            sskips: 0,
            interactive: false,
            halt_latch: false,
            prev_command: String::new(),
            input,
            output,
        }
    }

    /// Open the shell before the next instruction executes.
    pub fn set_interactive(&mut self, on: bool) {
        self.interactive = on;
    }

    pub fn set_view_enabled(&mut self, view: View, on: bool) {
        match view {
            View::History => self.views.history = on,
            View::Stack => self.views.stack = on,
            View::Regs => self.views.regs = on,
            View::Disass => self.views.disass = on,
            View::Memory => self.views.memory = on,
        }
    }

    pub fn set_disass_lines(&mut self, lines: u16) {
        self.disass_lines = lines.max(1);
    }

    pub fn set_breakpoint(&mut self, addr: u16) {
        self.breakpoints.insert(addr);
    }

    pub fn clear_breakpoint(&mut self, addr: u16) {
        self.breakpoints.remove(&addr);
    }

    pub fn breakpoints(&self) -> &BTreeSet<u16> {
        &self.breakpoints
    }

    /// Current disassembly cursor, for front-ends that scroll.
    pub fn disass_cursor(&self) -> u16 {
        self.disass_pos
    }

    /// Move the disassembly cursor up one word.
    pub fn scroll_up(&mut self) {
        self.disass_pos = self.disass_pos.wrapping_sub(1);
    }

    /// Move the disassembly cursor down by the size of the instruction
    /// currently at the top of the view.
    pub fn scroll_down(&mut self) {
        self.disass_pos = self.disass_pos.wrapping_add(self.disass_next_size.max(1));
    }

    // --- Snapshot banks ---
    //
    // Out-of-range slots are ignored; loading a never-saved slot is
    // ignored too (callers report it). Saving overwrites.

    pub fn save_state(&mut self, slot: usize, state: &MachineState) -> bool {
        let Some(entry) = self.states.get_mut(slot) else {
            return false;
        };
        *entry = Some(state.clone());
        true
    }

    pub fn load_state(&mut self, slot: usize, state: &mut MachineState) -> bool {
        match self.states.get(slot) {
            Some(Some(saved)) => {
                *state = saved.clone();
                true
            }
            _ => false,
        }
    }

    pub fn save_stack(&mut self, slot: usize, state: &MachineState) -> bool {
        let Some(entry) = self.stacks.get_mut(slot) else {
            return false;
        };
        *entry = Some(state.stack.clone());
        true
    }

    /// Diff two saved stacks; `None` when either slot is missing.
    pub fn compare_stacks(&self, first: usize, second: usize) -> Option<StackDiff> {
        let left = self.stacks.get(first)?.as_ref()?;
        let right = self.stacks.get(second)?.as_ref()?;
        Some(left.diff(right))
    }

    pub fn save_memory(&mut self, slot: usize, state: &MachineState) -> bool {
        let Some(entry) = self.rams.get_mut(slot) else {
            return false;
        };
        *entry = Some(state.ram.clone());
        true
    }

    pub fn load_memory(&mut self, slot: usize, state: &mut MachineState) -> bool {
        match self.rams.get(slot) {
            Some(Some(saved)) => {
                state.ram = saved.clone();
                true
            }
            _ => false,
        }
    }

    /// Rendered diff of two saved memory images over
    /// `[addr, addr + size)`; `None` when either slot is missing.
    pub fn compare_memory(
        &self,
        first: usize,
        second: usize,
        addr: u16,
        size: u16,
    ) -> Option<String> {
        let left = self.rams.get(first)?.as_ref()?;
        let right = self.rams.get(second)?.as_ref()?;
        Some(views::render_memory_diff(left, right, addr, size))
    }
}

impl Default for Debugger {
    fn default() -> Self {
        Self::new()
    }
}

impl DebugHook for Debugger {
    fn before_op(&mut self, state: &mut MachineState, history: &HistoryRing) -> HookVerdict {
        if self.halt_latch {
            return HookVerdict::Stop;
        }
        self.disass_pos = state.ip;

        if self.interactive {
            if self.sskips > 0 {
                self.sskips -= 1;
            } else if !self.shell(state, history) {
                return HookVerdict::Stop;
            }
        } else if self.breakpoints.contains(&state.ip) {
            if self.skips > 0 {
                self.skips -= 1;
            } else {
                self.interactive = true;
                if !self.shell(state, history) {
                    return HookVerdict::Stop;
                }
            }
        }

        if self.halt_latch {
            return HookVerdict::Stop;
        }
        HookVerdict::Resume
    }

    fn on_blocked(&mut self, state: &mut MachineState, history: &HistoryRing) -> HookVerdict {
        if self.halt_latch {
            return HookVerdict::Stop;
        }
        self.disass_pos = state.ip;
        self.interactive = true;
        self.skips = 0;
        self.sskips = 0;
        if self.shell(state, history) && !self.halt_latch {
            HookVerdict::Resume
        } else {
            HookVerdict::Stop
        }
    }

    fn on_fault(&mut self, state: &mut MachineState, history: &HistoryRing, fault: &Fault) {
        let _ = writeln!(self.output, "FAULT: {fault}");
        self.disass_pos = state.ip;
        self.interactive = true;
        self.skips = 0;
        self.sskips = 0;
        let _ = self.shell(state, history);
    }
}
