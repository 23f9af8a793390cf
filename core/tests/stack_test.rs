use synvm_core::vm::{StackDiffEntry, ValueStack};

#[test]
fn pops_reverse_pushes() {
    let sequences: &[&[u16]] = &[&[], &[1], &[1, 2, 3], &[7; 40], &[0, 0x7FFF, 42, 42, 9]];
    for seq in sequences {
        let mut stack = ValueStack::new();
        for &w in *seq {
            stack.push(w);
        }
        assert_eq!(stack.len(), seq.len());
        let mut popped = Vec::new();
        while let Some(w) = stack.pop() {
            popped.push(w);
        }
        let mut expected: Vec<u16> = seq.to_vec();
        expected.reverse();
        assert_eq!(popped, expected);
        assert!(stack.is_empty());
        assert_eq!(stack.pop(), None);
    }
}

#[test]
fn top_peeks_without_removing() {
    let mut stack = ValueStack::new();
    assert_eq!(stack.top(), None);
    stack.push(5);
    stack.push(6);
    assert_eq!(stack.top(), Some(6));
    assert_eq!(stack.len(), 2);
}

#[test]
fn clone_is_independent() {
    let mut stack = ValueStack::new();
    stack.push(1);
    let mut copy = stack.clone();
    copy.push(2);
    assert_eq!(stack.len(), 1);
    assert_eq!(copy.len(), 2);
}

fn stack_of(words: &[u16]) -> ValueStack {
    let mut stack = ValueStack::new();
    for &w in words {
        stack.push(w);
    }
    stack
}

#[test]
fn diff_of_identical_stacks_collapses_to_one_run() {
    let a = stack_of(&[1, 2, 3, 4]);
    let diff = a.diff(&a.clone());
    assert!(diff.is_match());
    assert_eq!(diff.entries(), &[StackDiffEntry::Equal { count: 4 }]);
}

#[test]
fn diff_lists_mismatched_positions() {
    // Walk is from the top: tops are 9 vs 9, then 5 vs 6.
    let a = stack_of(&[1, 5, 9]);
    let b = stack_of(&[1, 6, 9]);
    let diff = a.diff(&b);
    assert!(!diff.is_match());
    assert_eq!(
        diff.entries(),
        &[
            StackDiffEntry::Equal { count: 1 },
            StackDiffEntry::Mismatch {
                depth: 1,
                left: 5,
                right: 6
            },
            StackDiffEntry::Equal { count: 1 },
        ]
    );
}

#[test]
fn diff_lists_trailing_tail_of_deeper_stack() {
    let a = stack_of(&[7, 1, 2]);
    let b = stack_of(&[1, 2]);
    let diff = a.diff(&b);
    assert_eq!(
        diff.entries(),
        &[
            StackDiffEntry::Equal { count: 2 },
            StackDiffEntry::LeftOnly { depth: 2, value: 7 },
        ]
    );
}

#[test]
fn diff_is_symmetric_up_to_sides() {
    let a = stack_of(&[1, 2, 3]);
    let b = stack_of(&[9, 2, 4]);
    let ab = a.diff(&b);
    let ba = b.diff(&a);
    assert_eq!(ab.entries().len(), ba.entries().len());
    for (x, y) in ab.entries().iter().zip(ba.entries()) {
        match (x, y) {
            (StackDiffEntry::Equal { count: m }, StackDiffEntry::Equal { count: n }) => {
                assert_eq!(m, n);
            }
            (
                StackDiffEntry::Mismatch { depth: d1, left, right },
                StackDiffEntry::Mismatch { depth: d2, left: l2, right: r2 },
            ) => {
                assert_eq!(d1, d2);
                assert_eq!(left, r2);
                assert_eq!(right, l2);
            }
            (
                StackDiffEntry::LeftOnly { depth: d1, value: v1 },
                StackDiffEntry::RightOnly { depth: d2, value: v2 },
            )
            | (
                StackDiffEntry::RightOnly { depth: d1, value: v1 },
                StackDiffEntry::LeftOnly { depth: d2, value: v2 },
            ) => {
                assert_eq!(d1, d2);
                assert_eq!(v1, v2);
            }
            other => panic!("asymmetric entries: {other:?}"),
        }
    }
}

#[test]
fn diff_display_renders_runs_and_mismatches() {
    let a = stack_of(&[1, 5]);
    let b = stack_of(&[1, 6]);
    let text = a.diff(&b).to_string();
    assert!(text.contains("0005 | 0006"), "got: {text}");
    assert!(text.contains("= 1 equal"), "got: {text}");
}
