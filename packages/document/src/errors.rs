//! Error types for the document crate

use crate::validate::ValidationIssue;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Storage error: {0}")]
    Storage(#[from] markup_common::CommonError),

    #[error("Document format error: {0}")]
    Format(#[from] serde_json::Error),

    #[error("Mutation error: {0}")]
    Mutation(#[from] crate::mutations::MutationError),

    #[error("Validation failed with {} issue(s)", .0.len())]
    Validation(Vec<ValidationIssue>),

    #[error("Document is not file-backed")]
    NotFileBacked,
}
