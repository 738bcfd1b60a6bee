//! # Paragraph Mutations
//!
//! The three structural primitives the redlining engine needs from a host
//! document.
//!
//! ## Mutation Semantics
//!
//! ### ReplaceParagraph
//! - Swaps a live paragraph for new content at the same position
//! - The replacement gets a new [`NodeId`]; the old id becomes stale
//! - Fails on stale ids and on paragraphs already marked deleted
//!
//! ### InsertAfter
//! - Places a new paragraph immediately after a live anchor
//! - The anchor may itself be marked deleted
//!
//! ### MarkDeleted
//! - Flags a paragraph as a suggested deletion; the node stays in place
//! - Pending inserted runs are dropped and unchanged runs become deleted runs,
//!   so rejecting every change still restores the original text
//! - Fails on tracked insertions (there is nothing original to delete)
//!
//! Every successful mutation returns a [`NodeChange`] describing which node is
//! now live at the affected position, so callers can refresh any index they
//! keep over the document.

use crate::paragraph::{NodeId, Paragraph, ParagraphDraft, ParagraphMark, Revision};
use crate::Document;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structural mutations on a paragraph document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Mutation {
    /// Replace a paragraph with new content
    ReplaceParagraph {
        node_id: NodeId,
        paragraph: ParagraphDraft,
    },

    /// Insert a new paragraph after an anchor
    InsertAfter {
        anchor_id: NodeId,
        paragraph: ParagraphDraft,
    },

    /// Mark a paragraph as a suggested deletion
    MarkDeleted { node_id: NodeId },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Node {0} was replaced earlier and is no longer live")]
    StaleNode(NodeId),

    #[error("Node {0} is already marked deleted")]
    AlreadyDeleted(NodeId),

    #[error("Invalid structure: {0}")]
    InvalidStructure(String),
}

/// The live node produced by a mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeChange {
    /// Node that occupied the position before the mutation, if any
    pub previous: Option<NodeId>,
    /// Node that is live at the position now
    pub current: NodeId,
    /// Current text of the live node
    pub text: String,
}

/// Result of applying a mutation
#[derive(Debug, Clone)]
pub struct MutationResult {
    /// New version number
    pub version: u64,

    pub change: NodeChange,
}

impl Mutation {
    /// Apply mutation to the document with validation
    pub fn apply(&self, doc: &mut Document) -> Result<NodeChange, MutationError> {
        self.validate(doc)?;

        match self {
            Mutation::ReplaceParagraph { node_id, paragraph } => {
                Self::apply_replace(doc, *node_id, paragraph)
            }
            Mutation::InsertAfter {
                anchor_id,
                paragraph,
            } => Self::apply_insert(doc, *anchor_id, paragraph),
            Mutation::MarkDeleted { node_id } => Self::apply_mark_deleted(doc, *node_id),
        }
    }

    fn apply_replace(
        doc: &mut Document,
        node_id: NodeId,
        draft: &ParagraphDraft,
    ) -> Result<NodeChange, MutationError> {
        let position = doc
            .position_of(node_id)
            .ok_or(MutationError::NodeNotFound(node_id))?;

        let current = doc.allocate(draft.clone());
        doc.detach(node_id);
        doc.set_order_at(position, current);

        Ok(NodeChange {
            previous: Some(node_id),
            current,
            text: draft.text(),
        })
    }

    fn apply_insert(
        doc: &mut Document,
        anchor_id: NodeId,
        draft: &ParagraphDraft,
    ) -> Result<NodeChange, MutationError> {
        let position = doc
            .position_of(anchor_id)
            .ok_or(MutationError::NodeNotFound(anchor_id))?;

        let current = doc.allocate(draft.clone());
        doc.insert_order_at(position + 1, current);

        Ok(NodeChange {
            previous: None,
            current,
            text: draft.text(),
        })
    }

    fn apply_mark_deleted(doc: &mut Document, node_id: NodeId) -> Result<NodeChange, MutationError> {
        let para = doc.live_mut(node_id)?;

        para.runs.retain(|run| run.revision != Revision::Inserted);
        for run in &mut para.runs {
            run.revision = Revision::Deleted;
        }
        para.mark = ParagraphMark::Deleted;

        Ok(NodeChange {
            previous: Some(node_id),
            current: node_id,
            text: para.text(),
        })
    }

    /// Validate without applying
    pub fn validate(&self, doc: &Document) -> Result<(), MutationError> {
        match self {
            Mutation::ReplaceParagraph { node_id, paragraph } => {
                let para = doc.live(*node_id)?;
                if para.mark == ParagraphMark::Deleted {
                    return Err(MutationError::AlreadyDeleted(*node_id));
                }
                Self::validate_draft(paragraph)
            }

            Mutation::InsertAfter {
                anchor_id,
                paragraph,
            } => {
                doc.live(*anchor_id)?;
                Self::validate_draft(paragraph)
            }

            Mutation::MarkDeleted { node_id } => {
                let para = doc.live(*node_id)?;
                Self::validate_deletable(para)
            }
        }
    }

    fn validate_draft(draft: &ParagraphDraft) -> Result<(), MutationError> {
        if draft.runs.iter().any(|r| r.text.is_empty()) {
            return Err(MutationError::InvalidStructure(
                "Paragraph contains an empty run".to_string(),
            ));
        }
        if draft.mark == ParagraphMark::Inserted
            && draft.runs.iter().any(|r| r.revision != Revision::Inserted)
        {
            return Err(MutationError::InvalidStructure(
                "Inserted paragraph may only carry inserted runs".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_deletable(para: &Paragraph) -> Result<(), MutationError> {
        match para.mark {
            ParagraphMark::Deleted => Err(MutationError::AlreadyDeleted(para.id)),
            ParagraphMark::Inserted => Err(MutationError::InvalidStructure(format!(
                "Cannot suggest deletion of tracked insertion {}",
                para.id
            ))),
            ParagraphMark::Original => Ok(()),
        }
    }

    /// Short name for logging
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::ReplaceParagraph { .. } => "replace",
            Mutation::InsertAfter { .. } => "insert",
            Mutation::MarkDeleted { .. } => "delete",
        }
    }
}
