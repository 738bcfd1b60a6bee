//! # Paragraph Nodes
//!
//! A paragraph is an ordered list of runs plus two opaque formatting blobs.
//! Formatting is never interpreted here: it is carried from the source
//! document and re-emitted verbatim when markup is rendered.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a paragraph node inside a [`crate::Document`].
///
/// Replacing a paragraph allocates a fresh id; the previous id is detached
/// and every later mutation targeting it fails with
/// [`crate::MutationError::StaleNode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.0)
    }
}

/// Opaque formatting blob (e.g. a `<w:pPr>` or `<w:rPr>` fragment)
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Formatting(String);

impl Formatting {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn empty() -> Self {
        Self(String::new())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Tracked-change state of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Revision {
    #[default]
    Unchanged,
    Inserted,
    Deleted,
}

/// Tracked-change state of the paragraph itself
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParagraphMark {
    #[default]
    Original,
    Inserted,
    Deleted,
}

/// A span of text sharing one character format and one revision state.
///
/// Tab characters inside `text` are structural separators; the markup
/// renderer emits them as tab elements rather than literal text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Run {
    pub text: String,
    #[serde(default)]
    pub format: Formatting,
    #[serde(default)]
    pub revision: Revision,
}

impl Run {
    pub fn new(text: impl Into<String>, format: Formatting, revision: Revision) -> Self {
        Self {
            text: text.into(),
            format,
            revision,
        }
    }

    pub fn plain(text: impl Into<String>, format: Formatting) -> Self {
        Self::new(text, format, Revision::Unchanged)
    }
}

/// Paragraph content that has not been placed in a document yet.
///
/// Drafts are the payload of replace and insert mutations, and the on-disk
/// representation of every paragraph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphDraft {
    #[serde(default)]
    pub paragraph_format: Formatting,
    #[serde(default)]
    pub mark: ParagraphMark,
    #[serde(default)]
    pub runs: Vec<Run>,
}

impl ParagraphDraft {
    /// Untracked paragraph with a single run
    pub fn plain(text: impl Into<String>, paragraph_format: Formatting, run_format: Formatting) -> Self {
        let text = text.into();
        let runs = if text.is_empty() {
            vec![]
        } else {
            vec![Run::plain(text, run_format)]
        };
        Self {
            paragraph_format,
            mark: ParagraphMark::Original,
            runs,
        }
    }

    pub fn with_mark(mut self, mark: ParagraphMark) -> Self {
        self.mark = mark;
        self
    }

    /// Append a run, coalescing with the previous one when format and
    /// revision match. Empty text is ignored.
    pub fn push_run(&mut self, text: &str, format: &Formatting, revision: Revision) {
        if text.is_empty() {
            return;
        }
        if let Some(last) = self.runs.last_mut() {
            if last.revision == revision && &last.format == format {
                last.text.push_str(text);
                return;
            }
        }
        self.runs.push(Run::new(text, format.clone(), revision));
    }

    pub fn text(&self) -> String {
        current_view(&self.runs)
    }
}

/// A paragraph node owned by a [`crate::Document`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    pub id: NodeId,
    pub paragraph_format: Formatting,
    pub mark: ParagraphMark,
    pub runs: Vec<Run>,
}

impl Paragraph {
    pub(crate) fn from_draft(id: NodeId, draft: ParagraphDraft) -> Self {
        Self {
            id,
            paragraph_format: draft.paragraph_format,
            mark: draft.mark,
            runs: draft.runs,
        }
    }

    pub fn to_draft(&self) -> ParagraphDraft {
        ParagraphDraft {
            paragraph_format: self.paragraph_format.clone(),
            mark: self.mark,
            runs: self.runs.clone(),
        }
    }

    /// Current text: unchanged and inserted runs, tabs included
    pub fn text(&self) -> String {
        current_view(&self.runs)
    }

    /// Text as it read before any tracked change: unchanged and deleted runs
    pub fn original_text(&self) -> String {
        self.runs
            .iter()
            .filter(|r| r.revision != Revision::Inserted)
            .map(|r| r.text.as_str())
            .collect()
    }

    /// Numbering prefix: the text before the first tab, if there is a tab
    pub fn prefix(&self) -> Option<String> {
        let text = self.text();
        text.split_once('\t').map(|(prefix, _)| prefix.to_string())
    }

    /// Character formatting of the first run, empty when there are no runs
    pub fn run_format(&self) -> Formatting {
        self.runs
            .first()
            .map(|r| r.format.clone())
            .unwrap_or_default()
    }

    pub fn has_revisions(&self) -> bool {
        self.mark != ParagraphMark::Original
            || self.runs.iter().any(|r| r.revision != Revision::Unchanged)
    }
}

fn current_view(runs: &[Run]) -> String {
    runs.iter()
        .filter(|r| r.revision != Revision::Deleted)
        .map(|r| r.text.as_str())
        .collect()
}
