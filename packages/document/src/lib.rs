//! # Markup Document
//!
//! Host document for the redlining engine.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ document.json → Document (paragraph arena)  │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ DocumentHost: replace / insert-after /      │
//! │               mark-deleted → NodeChange     │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ validate → persist, render tracked markup   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Formatting is opaque**: paragraph and run formatting are blobs that
//!    are preserved and reattached, never interpreted
//! 2. **Replacement changes identity**: a replaced paragraph gets a new
//!    [`NodeId`] and the old id turns stale
//! 3. **Changes are revertible**: every run records whether it is
//!    unchanged, inserted or deleted, so both the original and the revised
//!    text can be recovered
//!
//! ## Usage
//!
//! ```rust,ignore
//! use markup_document::{Document, DocumentHost, ParagraphDraft};
//! use markup_common::RealFileSystem;
//!
//! let fs = RealFileSystem;
//! let mut doc = Document::load(&fs, "deal/document.json")?;
//!
//! let first = doc.paragraph_ids()[0];
//! let change = doc.mark_deleted(first)?;
//!
//! doc.commit(&fs)?;
//! ```

mod document;
mod errors;
mod host;
mod markup;
mod mutations;
mod paragraph;
mod validate;

pub use document::{CommitOutcome, Document, DocumentFile, DocumentStorage, DEFAULT_AUTHOR};
pub use errors::DocumentError;
pub use host::DocumentHost;
pub use markup::{render_markup, render_paragraph, RenderOptions};
pub use mutations::{Mutation, MutationError, MutationResult, NodeChange};
pub use paragraph::{Formatting, NodeId, Paragraph, ParagraphDraft, ParagraphMark, Revision, Run};
pub use validate::ValidationIssue;
