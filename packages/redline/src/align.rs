//! # Paragraph Alignment
//!
//! Aligns original paragraphs against revised lines by their normalized
//! keys. Equality is exact on the key; similar-but-different paragraphs show
//! up inside `Replace` blocks and are paired later by the resolver.

use crate::matcher::{OpTag, SequenceMatcher};
use std::ops::Range;

/// One block of the alignment; together the blocks cover every original and
/// every revised index exactly once, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOperation {
    Equal {
        original: Range<usize>,
        revised: Range<usize>,
    },
    /// Original paragraphs with no counterpart; `at` is the revised position
    Delete { original: Range<usize>, at: usize },
    /// Revised lines with no counterpart; `at` is the original position they
    /// precede
    Insert { at: usize, revised: Range<usize> },
    Replace {
        original: Range<usize>,
        revised: Range<usize>,
    },
}

impl EditOperation {
    fn from_ranges(original: Range<usize>, revised: Range<usize>) -> Self {
        match (original.is_empty(), revised.is_empty()) {
            (false, false) => EditOperation::Replace { original, revised },
            (false, true) => EditOperation::Delete {
                at: revised.start,
                original,
            },
            (true, _) => EditOperation::Insert {
                at: original.start,
                revised,
            },
        }
    }

    pub fn original(&self) -> Range<usize> {
        match self {
            EditOperation::Equal { original, .. }
            | EditOperation::Delete { original, .. }
            | EditOperation::Replace { original, .. } => original.clone(),
            EditOperation::Insert { at, .. } => *at..*at,
        }
    }

    pub fn revised(&self) -> Range<usize> {
        match self {
            EditOperation::Equal { revised, .. }
            | EditOperation::Insert { revised, .. }
            | EditOperation::Replace { revised, .. } => revised.clone(),
            EditOperation::Delete { at, .. } => *at..*at,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            EditOperation::Equal { .. } => "equal",
            EditOperation::Delete { .. } => "delete",
            EditOperation::Insert { .. } => "insert",
            EditOperation::Replace { .. } => "replace",
        }
    }
}

/// Align two key sequences.
///
/// Consecutive non-equal opcodes are folded into a single block so that
/// every change region surfaces as one operation.
pub fn align(original_keys: &[String], revised_keys: &[String]) -> Vec<EditOperation> {
    let mut ops = Vec::new();
    let mut pending: Option<(Range<usize>, Range<usize>)> = None;

    for op in SequenceMatcher::new(original_keys, revised_keys).opcodes() {
        if op.tag == OpTag::Equal {
            if let Some((original, revised)) = pending.take() {
                ops.push(EditOperation::from_ranges(original, revised));
            }
            ops.push(EditOperation::Equal {
                original: op.a_start..op.a_end,
                revised: op.b_start..op.b_end,
            });
            continue;
        }

        pending = Some(match pending.take() {
            Some((original, revised)) => (original.start..op.a_end, revised.start..op.b_end),
            None => (op.a_start..op.a_end, op.b_start..op.b_end),
        });
    }

    if let Some((original, revised)) = pending {
        ops.push(EditOperation::from_ranges(original, revised));
    }

    ops
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::keys;

    #[test]
    fn test_equal_then_insert() {
        let original = keys(&["2.\tNotice period is 10 days."]);
        let revised = keys(&["2. Notice period is 10 days.", "2a.\tBorrower may cure within 30 days."]);

        assert_eq!(
            align(&original, &revised),
            vec![
                EditOperation::Equal {
                    original: 0..1,
                    revised: 0..1
                },
                EditOperation::Insert { at: 1, revised: 1..2 },
            ]
        );
    }

    #[test]
    fn test_leading_delete() {
        let original = keys(&["3.\tReserved.", "4.\tMiscellaneous."]);
        let revised = keys(&["4.\tMiscellaneous."]);

        assert_eq!(
            align(&original, &revised),
            vec![
                EditOperation::Delete { original: 0..1, at: 0 },
                EditOperation::Equal {
                    original: 1..2,
                    revised: 0..1
                },
            ]
        );
    }

    #[test]
    fn test_operations_partition_both_sides() {
        let original = keys(&["a", "b", "c", "d", "e"]);
        let revised = keys(&["a", "x", "c", "y", "z", "e", "f"]);
        let ops = align(&original, &revised);

        let mut next_original = 0;
        let mut next_revised = 0;
        for op in &ops {
            assert_eq!(op.original().start, next_original, "gap before {:?}", op);
            assert_eq!(op.revised().start, next_revised, "gap before {:?}", op);
            next_original = op.original().end;
            next_revised = op.revised().end;
        }
        assert_eq!(next_original, original.len());
        assert_eq!(next_revised, revised.len());
        assert!(ops.iter().any(|op| op.name() == "replace"));
    }

    #[test]
    fn test_empty_inputs() {
        assert!(align(&[], &[]).is_empty());
        assert_eq!(
            align(&keys(&["a"]), &[]),
            vec![EditOperation::Delete { original: 0..1, at: 0 }]
        );
    }
}
