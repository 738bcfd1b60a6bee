//! Error types for the redline crate

use markup_document::{MutationError, NodeId};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RedlineError {
    #[error("No live node for {0}")]
    AnchorNotFound(String),

    #[error("Paragraph {0} is not in the document")]
    MissingParagraph(NodeId),

    #[error("{label}: {source}")]
    Mutation {
        label: String,
        #[source]
        source: MutationError,
    },
}

impl RedlineError {
    pub fn mutation(label: impl Into<String>, source: MutationError) -> Self {
        RedlineError::Mutation {
            label: label.into(),
            source,
        }
    }
}

pub type RedlineResult<T> = Result<T, RedlineError>;
