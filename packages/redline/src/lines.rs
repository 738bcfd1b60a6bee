//! Plain-text redline of two line sequences.
//!
//! Same alignment and pairing as the document engine, without a host: the
//! result is a list of line changes that renders to text with
//! `[-deleted-]` and `{+inserted+}` markers.

use crate::align::{align, EditOperation};
use crate::char_diff::{diff_merged, DiffSpan};
use crate::config::MatchStrategy;
use crate::normalize::keys;
use crate::resolve::{ReplacementResolver, ResolvedBlock};
use serde::Serialize;
use std::fmt::Write;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum LineChange {
    Same(String),
    Removed(String),
    Added(String),
    Modified(Vec<DiffSpan>),
}

impl LineChange {
    pub fn is_change(&self) -> bool {
        !matches!(self, LineChange::Same(_))
    }
}

/// Redline `original` into `revised`; lines pair up only above `threshold`
pub fn redline_lines<S: AsRef<str>>(original: &[S], revised: &[S], threshold: f64) -> Vec<LineChange> {
    let original: Vec<&str> = original.iter().map(AsRef::as_ref).collect();
    let revised: Vec<&str> = revised.iter().map(AsRef::as_ref).collect();
    let original_keys = keys(&original);
    let revised_keys = keys(&revised);
    let resolver = ReplacementResolver::new(threshold, MatchStrategy::Greedy);

    let mut changes = Vec::new();
    for op in align(&original_keys, &revised_keys) {
        match op {
            EditOperation::Equal { original: range, .. } => {
                changes.extend(range.map(|i| LineChange::Same(original[i].to_string())));
            }
            EditOperation::Delete { original: range, .. } => {
                changes.extend(range.map(|i| LineChange::Removed(original[i].to_string())));
            }
            EditOperation::Insert { revised: range, .. } => {
                changes.extend(range.map(|j| LineChange::Added(revised[j].to_string())));
            }
            EditOperation::Replace {
                original: original_range,
                revised: revised_range,
            } => {
                let block = resolver.resolve(&original_keys, &revised_keys, original_range, revised_range);
                replace_block(&block, &original, &revised, &mut changes);
            }
        }
    }
    changes
}

/// Lines of a replace block in revised order; an unpaired original line is
/// emitted as removed just before the first paired line that follows it
fn replace_block(block: &ResolvedBlock, original: &[&str], revised: &[&str], out: &mut Vec<LineChange>) {
    let mut pending = block.unmatched_original().into_iter().peekable();

    for j in block.revised.clone() {
        match block.match_for_revised(j) {
            Some(m) => {
                while let Some(i) = pending.next_if(|i| *i < m.original) {
                    out.push(LineChange::Removed(original[i].to_string()));
                }
                out.push(LineChange::Modified(diff_merged(original[m.original], revised[j])));
            }
            None => out.push(LineChange::Added(revised[j].to_string())),
        }
    }

    out.extend(pending.map(|i| LineChange::Removed(original[i].to_string())));
}

/// One output line per change
pub fn render(changes: &[LineChange]) -> String {
    let mut out = String::new();
    for change in changes {
        match change {
            LineChange::Same(line) => out.push_str(line),
            LineChange::Removed(line) => {
                let _ = write!(out, "[-{}-]", line);
            }
            LineChange::Added(line) => {
                let _ = write!(out, "{{+{}+}}", line);
            }
            LineChange::Modified(spans) => {
                for span in spans {
                    let _ = match span {
                        DiffSpan::Unchanged(text) => write!(out, "{}", text),
                        DiffSpan::Deleted(text) => write!(out, "[-{}-]", text),
                        DiffSpan::Inserted(text) => write!(out, "{{+{}+}}", text),
                    };
                }
            }
        }
        out.push('\n');
    }
    out
}
