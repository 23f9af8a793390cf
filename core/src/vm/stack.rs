use std::fmt;

/// Unbounded LIFO of 16-bit words.
///
/// The program stack holds PUSH/POP operands and CALL return addresses.
/// A growable dense buffer is enough for the access pattern (push, pop,
/// top, whole-stack snapshot); popping an empty stack is reported to the
/// caller rather than treated as a programming error, because the guest
/// program controls when it happens.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValueStack {
    words: Vec<u16>,
}

impl ValueStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, word: u16) {
        self.words.push(word);
    }

    pub fn pop(&mut self) -> Option<u16> {
        self.words.pop()
    }

    pub fn top(&self) -> Option<u16> {
        self.words.last().copied()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Iterate from the most recently pushed word down to the base.
    pub fn iter_from_top(&self) -> impl Iterator<Item = u16> + '_ {
        self.words.iter().rev().copied()
    }

    /// Position-aligned comparison against another stack, walking both
    /// from the top. Runs of equal words collapse into a single count
    /// entry; mismatches and the deeper stack's trailing tail are listed
    /// element by element.
    pub fn diff(&self, other: &ValueStack) -> StackDiff {
        let mut entries = Vec::new();
        let mut equal_run = 0usize;
        let mut depth = 0usize;
        let mut left = self.iter_from_top();
        let mut right = other.iter_from_top();

        loop {
            match (left.next(), right.next()) {
                (Some(a), Some(b)) if a == b => equal_run += 1,
                (Some(a), Some(b)) => {
                    flush_equal(&mut entries, &mut equal_run);
                    entries.push(StackDiffEntry::Mismatch {
                        depth,
                        left: a,
                        right: b,
                    });
                }
                (Some(a), None) => {
                    flush_equal(&mut entries, &mut equal_run);
                    entries.push(StackDiffEntry::LeftOnly { depth, value: a });
                }
                (None, Some(b)) => {
                    flush_equal(&mut entries, &mut equal_run);
                    entries.push(StackDiffEntry::RightOnly { depth, value: b });
                }
                (None, None) => {
                    flush_equal(&mut entries, &mut equal_run);
                    break;
                }
            }
            depth += 1;
        }

        StackDiff { entries }
    }
}

fn flush_equal(entries: &mut Vec<StackDiffEntry>, run: &mut usize) {
    if *run > 0 {
        entries.push(StackDiffEntry::Equal { count: *run });
        *run = 0;
    }
}

/// One line of a stack comparison. Depths count down from the top of
/// the stacks (depth 0 is the most recently pushed word).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StackDiffEntry {
    /// A collapsed run of positions where both stacks agree.
    Equal { count: usize },
    /// Both stacks have a word at this depth and they differ.
    Mismatch { depth: usize, left: u16, right: u16 },
    /// Only the left stack is this deep.
    LeftOnly { depth: usize, value: u16 },
    /// Only the right stack is this deep.
    RightOnly { depth: usize, value: u16 },
}

/// Human-renderable result of [`ValueStack::diff`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StackDiff {
    entries: Vec<StackDiffEntry>,
}

impl StackDiff {
    pub fn entries(&self) -> &[StackDiffEntry] {
        &self.entries
    }

    /// True when the stacks are identical (only equal runs, or nothing).
    pub fn is_match(&self) -> bool {
        self.entries
            .iter()
            .all(|e| matches!(e, StackDiffEntry::Equal { .. }))
    }
}

impl fmt::Display for StackDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.entries.is_empty() {
            return writeln!(f, "  (both stacks empty)");
        }
        for entry in &self.entries {
            match *entry {
                StackDiffEntry::Equal { count } => writeln!(f, "  = {count} equal")?,
                StackDiffEntry::Mismatch { depth, left, right } => {
                    writeln!(f, "  [{depth:04}] {left:04x} | {right:04x}")?;
                }
                StackDiffEntry::LeftOnly { depth, value } => {
                    writeln!(f, "  [{depth:04}] {value:04x} |")?;
                }
                StackDiffEntry::RightOnly { depth, value } => {
                    writeln!(f, "  [{depth:04}]      | {value:04x}")?;
                }
            }
        }
        Ok(())
    }
}
