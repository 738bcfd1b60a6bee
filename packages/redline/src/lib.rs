//! # Markup Redline
//!
//! Reconciles an original paragraph sequence with an independently revised
//! text and records the difference as tracked changes in a host document.
//!
//! ## Components
//!
//! ```text
//! normalize ──► align ──► resolve ──► project ──► DocumentHost
//!                 │          │           │
//!                 └──────────┴─ matcher ─┴─ char_diff
//!                                            anchors ◄── NodeChange
//! ```
//!
//! - **normalize**: whitespace-collapsed comparison keys
//! - **matcher**: deterministic sequence matcher shared by everything below
//! - **char_diff**: character spans (unchanged / deleted / inserted)
//! - **align**: paragraph-level alignment on normalized keys
//! - **resolve**: pairs paragraphs with lines inside replace blocks
//! - **project**: builds the tracked-change drafts
//! - **anchors**: live node references, positional and by name
//! - **engine**: drives a unit through all of the above
//!
//! ## Usage
//!
//! ```rust,ignore
//! use markup_document::Document;
//! use markup_redline::{RedlineEngine, Unit};
//!
//! let mut doc = Document::from_texts("deal.json", &["1.\tRate is 5%."]);
//! let unit = Unit::new("Section 1", doc.paragraph_ids(), vec!["1.\tRate is 7%.".into()]);
//!
//! let report = RedlineEngine::default().redline_unit(&mut doc, &unit);
//! assert_eq!(report.tally.modifications.applied, 1);
//! ```

pub mod align;
pub mod anchors;
pub mod char_diff;
pub mod config;
pub mod corrections;
pub mod engine;
pub mod error;
pub mod lines;
pub mod matcher;
pub mod normalize;
pub mod numbering;
pub mod project;
pub mod resolve;
pub mod tally;

pub use align::{align, EditOperation};
pub use anchors::{AnchorMap, Located, LookupKind, NameIndex};
pub use char_diff::{diff, diff_merged, merge, DiffSpan};
pub use config::{MatchStrategy, RedlineConfig};
pub use corrections::{Correction, CorrectionOutcome, CorrectionReport, CorrectionStatus, RequirementId};
pub use engine::{RedlineEngine, Unit, UnitReport};
pub use error::{RedlineError, RedlineResult};
pub use lines::{redline_lines, render, LineChange};
pub use matcher::{similarity, SequenceMatcher};
pub use normalize::normalize;
pub use resolve::{Match, ReplacementResolver, ResolvedBlock};
pub use tally::{Counter, EditKind, FailedEdit, RedlineTally};
