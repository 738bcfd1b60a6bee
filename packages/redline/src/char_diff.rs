//! # Character Diff
//!
//! Minimal character-level edit script between two texts, expressed only in
//! unchanged / deleted / inserted spans. A replacement is always emitted as a
//! deletion followed by an insertion.
//!
//! Spans carry the exact text of both inputs, so the original can be rebuilt
//! from unchanged + deleted spans and the revision from unchanged + inserted
//! spans.

use crate::matcher::{OpTag, SequenceMatcher};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum DiffSpan {
    Unchanged(String),
    Deleted(String),
    Inserted(String),
}

impl DiffSpan {
    pub fn text(&self) -> &str {
        match self {
            DiffSpan::Unchanged(t) | DiffSpan::Deleted(t) | DiffSpan::Inserted(t) => t,
        }
    }

    pub fn is_change(&self) -> bool {
        !matches!(self, DiffSpan::Unchanged(_))
    }

    fn same_kind(&self, other: &DiffSpan) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    fn text_mut(&mut self) -> &mut String {
        match self {
            DiffSpan::Unchanged(t) | DiffSpan::Deleted(t) | DiffSpan::Inserted(t) => t,
        }
    }
}

/// Raw edit script, one span per opcode (two for a replacement)
pub fn diff(old: &str, new: &str) -> Vec<DiffSpan> {
    let a: Vec<char> = old.chars().collect();
    let b: Vec<char> = new.chars().collect();
    let slice = |chars: &[char], start: usize, end: usize| -> String { chars[start..end].iter().collect() };

    let mut spans = Vec::new();
    for op in SequenceMatcher::new(&a, &b).opcodes() {
        match op.tag {
            OpTag::Equal => spans.push(DiffSpan::Unchanged(slice(&a, op.a_start, op.a_end))),
            OpTag::Delete => spans.push(DiffSpan::Deleted(slice(&a, op.a_start, op.a_end))),
            OpTag::Insert => spans.push(DiffSpan::Inserted(slice(&b, op.b_start, op.b_end))),
            OpTag::Replace => {
                spans.push(DiffSpan::Deleted(slice(&a, op.a_start, op.a_end)));
                spans.push(DiffSpan::Inserted(slice(&b, op.b_start, op.b_end)));
            }
        }
    }
    spans
}

/// Join adjacent spans of the same kind; empty spans are dropped
pub fn merge(spans: Vec<DiffSpan>) -> Vec<DiffSpan> {
    let mut merged: Vec<DiffSpan> = Vec::with_capacity(spans.len());
    for span in spans {
        if span.text().is_empty() {
            continue;
        }
        match merged.last_mut() {
            Some(last) if last.same_kind(&span) => last.text_mut().push_str(span.text()),
            _ => merged.push(span),
        }
    }
    merged
}

/// `diff` followed by `merge`
pub fn diff_merged(old: &str, new: &str) -> Vec<DiffSpan> {
    merge(diff(old, new))
}

/// Text before the change: unchanged and deleted spans
pub fn original_text(spans: &[DiffSpan]) -> String {
    spans
        .iter()
        .filter(|s| !matches!(s, DiffSpan::Inserted(_)))
        .map(DiffSpan::text)
        .collect()
}

/// Text after the change: unchanged and inserted spans
pub fn revised_text(spans: &[DiffSpan]) -> String {
    spans
        .iter()
        .filter(|s| !matches!(s, DiffSpan::Deleted(_)))
        .map(DiffSpan::text)
        .collect()
}
