//! Per-unit and per-run accounting of attempted and applied edits.

use serde::Serialize;
use std::fmt;
use std::ops::{Add, AddAssign};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Counter {
    pub attempted: usize,
    pub applied: usize,
}

impl Counter {
    pub fn record(&mut self, applied: bool) {
        self.attempted += 1;
        if applied {
            self.applied += 1;
        }
    }

    pub fn failed(&self) -> usize {
        self.attempted - self.applied
    }
}

impl AddAssign for Counter {
    fn add_assign(&mut self, other: Counter) {
        self.attempted += other.attempted;
        self.applied += other.applied;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EditKind {
    Modification,
    Deletion,
    Insertion,
    /// A paragraph or correction target could not be located
    Lookup,
}

impl fmt::Display for EditKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EditKind::Modification => "modify",
            EditKind::Deletion => "delete",
            EditKind::Insertion => "insert",
            EditKind::Lookup => "lookup",
        };
        f.write_str(name)
    }
}

/// An edit that was skipped, kept for diagnostics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedEdit {
    pub kind: EditKind,
    pub unit: String,
    pub reason: String,
    /// Truncated text of the paragraph or line involved
    pub preview: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RedlineTally {
    pub modifications: Counter,
    pub deletions: Counter,
    pub insertions: Counter,
    /// Paragraphs left untouched because nothing changed after normalization
    pub unchanged: usize,
    pub failures: Vec<FailedEdit>,
}

impl RedlineTally {
    /// Mutations that actually reached the document
    pub fn applied(&self) -> usize {
        self.modifications.applied + self.deletions.applied + self.insertions.applied
    }

    pub fn attempted(&self) -> usize {
        self.modifications.attempted + self.deletions.attempted + self.insertions.attempted
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub(crate) fn counter_mut(&mut self, kind: EditKind) -> Option<&mut Counter> {
        match kind {
            EditKind::Modification => Some(&mut self.modifications),
            EditKind::Deletion => Some(&mut self.deletions),
            EditKind::Insertion => Some(&mut self.insertions),
            EditKind::Lookup => None,
        }
    }

    pub(crate) fn succeeded(&mut self, kind: EditKind) {
        if let Some(counter) = self.counter_mut(kind) {
            counter.record(true);
        }
    }

    pub(crate) fn failed(&mut self, kind: EditKind, failure: FailedEdit) {
        if let Some(counter) = self.counter_mut(kind) {
            counter.record(false);
        }
        self.failures.push(failure);
    }
}

impl AddAssign for RedlineTally {
    fn add_assign(&mut self, other: RedlineTally) {
        self.modifications += other.modifications;
        self.deletions += other.deletions;
        self.insertions += other.insertions;
        self.unchanged += other.unchanged;
        self.failures.extend(other.failures);
    }
}

impl Add for RedlineTally {
    type Output = RedlineTally;

    fn add(mut self, other: RedlineTally) -> RedlineTally {
        self += other;
        self
    }
}

impl fmt::Display for RedlineTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} modifications, {} deletions, {} insertions",
            self.modifications.applied, self.deletions.applied, self.insertions.applied
        )?;
        if self.attempted() > self.applied() {
            write!(f, " ({} failed)", self.attempted() - self.applied())?;
        }
        Ok(())
    }
}

/// First `max_chars` characters of `text`, with an ellipsis when cut
pub fn preview(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}
