//! # Document Handle
//!
//! A Document is an ordered arena of paragraph nodes.
//!
//! Documents can be:
//! - **Memory-backed**: built in code, for tests or one-off processing
//! - **File-backed**: loaded from a JSON document file and saved back to it
//!
//! ## Lifecycle
//!
//! ```text
//! Load → Mutate → Validate → Save
//!   ↓       ↓         ↓        ↓
//! File   NodeIds   Issues    File
//! ```

use crate::paragraph::{NodeId, Paragraph, ParagraphDraft, ParagraphMark};
use crate::validate::{self, ValidationIssue};
use crate::{DocumentError, Mutation, MutationError, MutationResult};
use markup_common::FileSystem;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_AUTHOR: &str = "HK";

/// On-disk representation of a document
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DocumentFile {
    /// Author attributed to tracked changes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    pub paragraphs: Vec<ParagraphDraft>,
}

/// Storage backend for document
#[derive(Debug)]
pub enum DocumentStorage {
    /// In-memory only (for testing, temp docs)
    Memory,

    /// File-backed
    File { dirty: bool },
}

/// Outcome of [`Document::commit`]
#[derive(Debug, PartialEq)]
pub enum CommitOutcome {
    /// Validation passed and the document was persisted
    Validated,

    /// Validation failed; the document was persisted anyway
    SavedWithoutValidation(Vec<ValidationIssue>),
}

/// Editable paragraph document
#[derive(Debug)]
pub struct Document {
    /// Path to the document file (if any)
    pub path: PathBuf,

    /// Current version number (increments on each mutation)
    pub version: u64,

    author: String,

    /// Arena slot per id; `None` once the node has been replaced
    nodes: Vec<Option<Paragraph>>,

    /// Live document order
    order: Vec<NodeId>,

    storage: DocumentStorage,
}

impl Document {
    /// Create document from paragraph drafts (memory-backed)
    pub fn from_paragraphs(
        path: impl Into<PathBuf>,
        author: impl Into<String>,
        paragraphs: Vec<ParagraphDraft>,
    ) -> Self {
        let mut doc = Self {
            path: path.into(),
            version: 0,
            author: author.into(),
            nodes: Vec::with_capacity(paragraphs.len()),
            order: Vec::with_capacity(paragraphs.len()),
            storage: DocumentStorage::Memory,
        };
        for draft in paragraphs {
            let id = doc.allocate(draft);
            doc.order.push(id);
        }
        doc
    }

    /// Memory-backed document of unformatted paragraphs
    pub fn from_texts(path: impl Into<PathBuf>, texts: &[&str]) -> Self {
        let drafts = texts
            .iter()
            .map(|t| ParagraphDraft::plain(*t, Default::default(), Default::default()))
            .collect();
        Self::from_paragraphs(path, DEFAULT_AUTHOR, drafts)
    }

    /// Load document from a JSON document file (file-backed)
    pub fn load(fs: &dyn FileSystem, path: impl Into<PathBuf>) -> Result<Self, DocumentError> {
        let path = path.into();
        let source = fs.read_to_string(&path)?;
        let file: DocumentFile = serde_json::from_str(&source)?;

        let author = file.author.unwrap_or_else(|| DEFAULT_AUTHOR.to_string());
        let mut doc = Self::from_paragraphs(path, author, file.paragraphs);
        doc.storage = DocumentStorage::File { dirty: false };

        tracing::debug!("Loaded {} paragraphs from {}", doc.len(), doc.path.display());
        Ok(doc)
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn set_author(&mut self, author: impl Into<String>) {
        self.author = author.into();
    }

    /// Number of paragraphs in document order
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Live paragraph ids in document order
    pub fn paragraph_ids(&self) -> Vec<NodeId> {
        self.order.clone()
    }

    /// Live paragraphs in document order
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> + '_ {
        self.order.iter().filter_map(move |id| self.paragraph(*id))
    }

    /// Paragraph by id, `None` if unknown or stale
    pub fn paragraph(&self, id: NodeId) -> Option<&Paragraph> {
        self.nodes.get(id.0).and_then(|slot| slot.as_ref())
    }

    /// Paragraph by id, distinguishing unknown ids from stale ones
    pub fn live(&self, id: NodeId) -> Result<&Paragraph, MutationError> {
        match self.nodes.get(id.0) {
            None => Err(MutationError::NodeNotFound(id)),
            Some(None) => Err(MutationError::StaleNode(id)),
            Some(Some(para)) => Ok(para),
        }
    }

    pub(crate) fn live_mut(&mut self, id: NodeId) -> Result<&mut Paragraph, MutationError> {
        match self.nodes.get_mut(id.0) {
            None => Err(MutationError::NodeNotFound(id)),
            Some(None) => Err(MutationError::StaleNode(id)),
            Some(Some(para)) => Ok(para),
        }
    }

    /// Node immediately before `id` in document order
    pub fn preceding(&self, id: NodeId) -> Option<NodeId> {
        let position = self.position_of(id)?;
        position.checked_sub(1).map(|p| self.order[p])
    }

    pub(crate) fn position_of(&self, id: NodeId) -> Option<usize> {
        self.order.iter().position(|n| *n == id)
    }

    pub(crate) fn allocate(&mut self, draft: ParagraphDraft) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Some(Paragraph::from_draft(id, draft)));
        id
    }

    pub(crate) fn detach(&mut self, id: NodeId) {
        if let Some(slot) = self.nodes.get_mut(id.0) {
            *slot = None;
        }
    }

    pub(crate) fn set_order_at(&mut self, position: usize, id: NodeId) {
        self.order[position] = id;
    }

    pub(crate) fn insert_order_at(&mut self, position: usize, id: NodeId) {
        self.order.insert(position, id);
    }

    /// Apply a mutation
    pub fn apply(&mut self, mutation: Mutation) -> Result<MutationResult, MutationError> {
        self.version += 1;

        let change = mutation.apply(self)?;

        if let DocumentStorage::File { dirty } = &mut self.storage {
            *dirty = true;
        }

        Ok(MutationResult {
            version: self.version,
            change,
        })
    }

    /// Check if document has unsaved changes
    pub fn is_dirty(&self) -> bool {
        match &self.storage {
            DocumentStorage::File { dirty } => *dirty,
            DocumentStorage::Memory => false,
        }
    }

    /// Check structural invariants of the whole document
    pub fn validate(&self) -> Result<(), DocumentError> {
        let issues = validate::check(&self.nodes, &self.order);
        if issues.is_empty() {
            Ok(())
        } else {
            Err(DocumentError::Validation(issues))
        }
    }

    /// Snapshot of the document in its on-disk form
    pub fn to_file(&self) -> DocumentFile {
        DocumentFile {
            author: Some(self.author.clone()),
            paragraphs: self.paragraphs().map(Paragraph::to_draft).collect(),
        }
    }

    /// Save to an explicit path, optionally validating first
    pub fn save_to(
        &mut self,
        fs: &dyn FileSystem,
        path: &Path,
        validate: bool,
    ) -> Result<(), DocumentError> {
        if validate {
            self.validate()?;
        }

        let json = serde_json::to_string_pretty(&self.to_file())?;
        fs.write(path, &json)?;

        if let DocumentStorage::File { dirty } = &mut self.storage {
            if path == self.path {
                *dirty = false;
            }
        }
        Ok(())
    }

    /// Save document back to its file (if file-backed)
    pub fn save(&mut self, fs: &dyn FileSystem, validate: bool) -> Result<(), DocumentError> {
        match self.storage {
            DocumentStorage::File { .. } => {
                let path = self.path.clone();
                self.save_to(fs, &path, validate)
            }
            DocumentStorage::Memory => Err(DocumentError::NotFileBacked),
        }
    }

    /// Validate-then-persist to `path`.
    ///
    /// A validation failure never drops the output: the document is saved
    /// without validation and the issues are handed back to the caller.
    pub fn commit_to(&mut self, fs: &dyn FileSystem, path: &Path) -> Result<CommitOutcome, DocumentError> {
        match self.save_to(fs, path, true) {
            Ok(()) => Ok(CommitOutcome::Validated),
            Err(DocumentError::Validation(issues)) => {
                tracing::warn!(
                    "Validation failed with {} issue(s); saving {} without validation",
                    issues.len(),
                    path.display()
                );
                for issue in &issues {
                    tracing::warn!("  {}", issue);
                }
                self.save_to(fs, path, false)?;
                Ok(CommitOutcome::SavedWithoutValidation(issues))
            }
            Err(e) => Err(e),
        }
    }

    /// Validate-then-persist to the document's own path
    pub fn commit(&mut self, fs: &dyn FileSystem) -> Result<CommitOutcome, DocumentError> {
        let path = self.path.clone();
        self.commit_to(fs, &path)
    }

    /// Texts with every tracked change accepted (deleted paragraphs dropped)
    pub fn accept_all(&self) -> Vec<String> {
        self.paragraphs()
            .filter(|p| p.mark != ParagraphMark::Deleted)
            .map(Paragraph::text)
            .collect()
    }

    /// Texts with every tracked change rejected (inserted paragraphs dropped)
    pub fn reject_all(&self) -> Vec<String> {
        self.paragraphs()
            .filter(|p| p.mark != ParagraphMark::Inserted)
            .map(Paragraph::original_text)
            .collect()
    }
}
