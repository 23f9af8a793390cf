//! The line-oriented command shell.
//!
//! Commands are prefix-dispatched, longest prefix first, mirroring the
//! debugger grammar: an input line starting with a known command name
//! runs that command with the whitespace-separated arguments after it.
//! An empty line repeats the previous command; unrecognized input just
//! re-renders the enabled views.

use std::io::Write;

use crate::debug::{Debugger, MEMORY_VIEW_WORDS, View, disasm, views};
use crate::vm::history::HistoryRing;
use crate::vm::state::MachineState;

/// What the shell loop should do after one command.
enum Disposition {
    /// Prompt again.
    Again,
    /// Leave the shell; the machine keeps running.
    Resume,
    /// Leave the shell; the machine stops.
    Stop,
}

impl Debugger {
    /// Run the shell until a command resumes or stops execution.
    /// Returns true to keep running, false to stop. EOF on the command
    /// stream stops.
    pub(crate) fn shell(&mut self, state: &mut MachineState, history: &HistoryRing) -> bool {
        loop {
            self.render_views(state, history);
            let _ = write!(self.output, "(debug) ");
            let _ = self.output.flush();

            let mut line = String::new();
            match self.input.read_line(&mut line) {
                Ok(0) | Err(_) => return false,
                Ok(_) => {}
            }

            let line = line.trim().to_string();
            let command = if line.is_empty() {
                self.prev_command.clone()
            } else {
                self.prev_command = line.clone();
                line
            };

            match self.dispatch(&command, state) {
                Disposition::Again => {}
                Disposition::Resume => return true,
                Disposition::Stop => return false,
            }
        }
    }

    fn dispatch(&mut self, line: &str, state: &mut MachineState) -> Disposition {
        let mut parts = line.split_whitespace();
        let Some(cmd) = parts.next() else {
            return Disposition::Again;
        };
        let args: Vec<&str> = parts.collect();

        // Longest prefixes first, so `stack_save` wins over `s` and
        // `memory_cmp` over `c`.
        if cmd.starts_with("history_on") {
            self.set_view_enabled(View::History, true);
        } else if cmd.starts_with("history_off") {
            self.set_view_enabled(View::History, false);
        } else if cmd.starts_with("stack_on") {
            self.set_view_enabled(View::Stack, true);
        } else if cmd.starts_with("stack_off") {
            self.set_view_enabled(View::Stack, false);
        } else if cmd.starts_with("stack_save") {
            if let Some(slot) = parse_dec(args.first()) {
                self.save_stack(slot, state);
            } else {
                self.complain("stack_save <slot>");
            }
        } else if cmd.starts_with("stack_compare") {
            match (parse_dec(args.first()), parse_dec(args.get(1))) {
                (Some(first), Some(second)) => match self.compare_stacks(first, second) {
                    Some(diff) => {
                        let _ = writeln!(self.output, "STACK COMPARE ({first}, {second})");
                        let _ = write!(self.output, "{diff}");
                    }
                    None => {
                        let _ = writeln!(
                            self.output,
                            "No stack found at position {first} or {second}"
                        );
                    }
                },
                _ => self.complain("stack_compare <slot> <slot>"),
            }
        } else if cmd.starts_with("regs_on") {
            self.set_view_enabled(View::Regs, true);
        } else if cmd.starts_with("regs_off") {
            self.set_view_enabled(View::Regs, false);
        } else if cmd.starts_with("disass_on") {
            self.set_view_enabled(View::Disass, true);
        } else if cmd.starts_with("disass_off") {
            self.set_view_enabled(View::Disass, false);
        } else if cmd.starts_with("memory_on") {
            self.set_view_enabled(View::Memory, true);
        } else if cmd.starts_with("memory_off") {
            self.set_view_enabled(View::Memory, false);
        } else if cmd.starts_with("memory_save") {
            if let Some(slot) = parse_dec(args.first()) {
                self.save_memory(slot, state);
            } else {
                self.complain("memory_save <slot>");
            }
        } else if cmd.starts_with("memory_load") {
            if let Some(slot) = parse_dec(args.first()) {
                if !self.load_memory(slot, state) && slot < super::BANK_SLOTS {
                    let _ = writeln!(self.output, "No memory saved at position {slot}");
                }
            } else {
                self.complain("memory_load <slot>");
            }
        } else if cmd.starts_with("memory_cmp") {
            match (parse_dec(args.first()), parse_dec(args.get(1))) {
                (Some(first), Some(second)) => {
                    match self.compare_memory(first, second, 0, 0x800) {
                        Some(diff) => {
                            let _ = write!(self.output, "{diff}");
                        }
                        None => {
                            let _ = writeln!(
                                self.output,
                                "No memory found at position {first} or {second}"
                            );
                        }
                    }
                }
                _ => self.complain("memory_cmp <slot> <slot>"),
            }
        } else if cmd.starts_with("dump") {
            if let Some(addr) = parse_hex(args.first()) {
                self.disass_pos = addr;
            } else {
                self.complain("dump <hex addr>");
            }
        } else if cmd.starts_with("dops") {
            if let Some(lines) = parse_hex(args.first()) {
                self.set_disass_lines(lines);
            } else {
                self.complain("dops <hex count>");
            }
        } else if cmd.starts_with("save") {
            if let Some(slot) = parse_dec(args.first()) {
                self.save_state(slot, state);
            } else {
                self.complain("save <slot>");
            }
        } else if cmd.starts_with("load") {
            if let Some(slot) = parse_dec(args.first()) {
                if !self.load_state(slot, state) && slot < super::BANK_SLOTS {
                    log::warn!("state load from empty slot {slot}");
                    let _ = writeln!(self.output, "No state saved at position {slot}");
                }
            } else {
                self.complain("load <slot>");
            }
        } else if cmd.starts_with("lb") {
            let _ = writeln!(self.output, "BREAKPOINTS: ");
            if self.breakpoints.is_empty() {
                let _ = writeln!(self.output, "   EMPTY");
            } else {
                for addr in &self.breakpoints {
                    let _ = writeln!(self.output, " + {addr:04x}");
                }
            }
        } else if cmd.starts_with("s") {
            self.sskips = parse_dec(args.first()).unwrap_or(0) as u64;
            return Disposition::Resume;
        } else if cmd.starts_with("ub") {
            if let Some(addr) = parse_hex(args.first()) {
                self.clear_breakpoint(addr);
            } else {
                self.complain("ub <hex addr>");
            }
        } else if cmd.starts_with("b") {
            if let Some(addr) = parse_hex(args.first()) {
                self.set_breakpoint(addr);
            } else {
                self.complain("b <hex addr>");
            }
        } else if cmd.starts_with("c") {
            self.interactive = false;
            self.skips = parse_dec(args.first()).unwrap_or(0) as u64;
            return Disposition::Resume;
        } else if cmd.starts_with("p") {
            if let Some(addr) = parse_hex(args.first()) {
                self.memory_pos = addr;
            } else {
                self.complain("p <hex addr>");
            }
        } else if cmd.starts_with("halt") {
            self.halt_latch = true;
        } else if cmd.starts_with("q") {
            return Disposition::Stop;
        }
        // Anything else falls through and the views re-render.

        Disposition::Again
    }

    fn complain(&mut self, usage: &str) {
        let _ = writeln!(self.output, "usage: {usage}");
    }

    fn render_views(&mut self, state: &MachineState, history: &HistoryRing) {
        const RULE: &str = "-------------------------------------";
        let _ = writeln!(self.output, "=========== DEBUG INFO ==============");

        if self.views.history {
            let _ = write!(self.output, "{}", views::render_history(history));
            let _ = writeln!(self.output, "{RULE}");
        }
        if self.views.memory {
            let _ = write!(
                self.output,
                "{}",
                views::render_memory(&state.ram, self.memory_pos, MEMORY_VIEW_WORDS)
            );
            let _ = writeln!(self.output, "{RULE}");
        }
        if self.views.stack {
            let _ = write!(self.output, "{}", views::render_stack(&state.stack));
            let _ = writeln!(self.output, "{RULE}");
        }
        if self.views.regs {
            let _ = write!(self.output, "{}", views::render_regs(state));
            let _ = writeln!(self.output, "{RULE}");
        }
        if self.views.disass {
            let lines = disasm::disassemble(
                &state.ram,
                self.disass_pos,
                usize::from(self.disass_lines),
            );
            if let Some(first) = lines.first() {
                self.disass_next_size = first.size;
            }
            for line in &lines {
                let marker = if line.addr == state.ip { "=> " } else { "   " };
                let _ = writeln!(self.output, "{marker}{}", line.text);
            }
            let _ = writeln!(self.output, "{RULE}");
        }
        let _ = writeln!(self.output, "=========== DEBUG END ===============");
    }
}

fn parse_hex(arg: Option<&&str>) -> Option<u16> {
    u16::from_str_radix(arg?, 16).ok()
}

fn parse_dec(arg: Option<&&str>) -> Option<usize> {
    arg?.parse().ok()
}
