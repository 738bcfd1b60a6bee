use crate::mutations::{Mutation, MutationError, NodeChange};
use crate::paragraph::{NodeId, Paragraph, ParagraphDraft};
use crate::Document;

/// The mutation surface a redlining pass needs from a host document.
///
/// Every mutation returns the node that is live afterwards so callers can
/// keep their own references and indexes current.
pub trait DocumentHost {
    /// Live paragraph by id
    fn paragraph(&self, id: NodeId) -> Option<&Paragraph>;

    /// Node immediately before `id` in document order
    fn preceding(&self, id: NodeId) -> Option<NodeId>;

    /// Replace a paragraph node with new structured content
    fn replace_node(&mut self, id: NodeId, draft: ParagraphDraft) -> Result<NodeChange, MutationError>;

    /// Insert structured content after an anchor node
    fn insert_after(&mut self, anchor: NodeId, draft: ParagraphDraft) -> Result<NodeChange, MutationError>;

    /// Mark a node as a suggested deletion
    fn mark_deleted(&mut self, id: NodeId) -> Result<NodeChange, MutationError>;
}

impl DocumentHost for Document {
    fn paragraph(&self, id: NodeId) -> Option<&Paragraph> {
        Document::paragraph(self, id)
    }

    fn preceding(&self, id: NodeId) -> Option<NodeId> {
        Document::preceding(self, id)
    }

    fn replace_node(&mut self, id: NodeId, draft: ParagraphDraft) -> Result<NodeChange, MutationError> {
        self.apply(Mutation::ReplaceParagraph {
            node_id: id,
            paragraph: draft,
        })
        .map(|r| r.change)
    }

    fn insert_after(&mut self, anchor: NodeId, draft: ParagraphDraft) -> Result<NodeChange, MutationError> {
        self.apply(Mutation::InsertAfter {
            anchor_id: anchor,
            paragraph: draft,
        })
        .map(|r| r.change)
    }

    fn mark_deleted(&mut self, id: NodeId) -> Result<NodeChange, MutationError> {
        self.apply(Mutation::MarkDeleted { node_id: id }).map(|r| r.change)
    }
}
