//! # Corrections
//!
//! Applies targeted corrections to a document. Each correction names the
//! text it expects to find and the text that should replace it; the target
//! paragraph is located through a [`NameIndex`] rather than by position.

use crate::anchors::{LookupKind, NameIndex};
use crate::normalize::{normalize, same_content};
use crate::project;
use crate::tally::preview;
use crate::RedlineEngine;
use markup_document::{DocumentHost, NodeId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status value of corrections that should be applied
pub const DEVIATES: &str = "deviates";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequirementId {
    Number(u64),
    Text(String),
}

impl fmt::Display for RequirementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequirementId::Number(n) => write!(f, "{}", n),
            RequirementId::Text(s) => f.write_str(s),
        }
    }
}

/// One entry of a corrections file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Correction {
    #[serde(default)]
    pub requirement_id: Option<RequirementId>,
    #[serde(default)]
    pub draft_section: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub original_text: Option<String>,
    #[serde(default)]
    pub revised_text: Option<String>,
}

impl Correction {
    /// The texts to swap, when this correction should be applied at all
    pub fn texts(&self) -> Option<(&str, &str)> {
        if self.status != DEVIATES {
            return None;
        }
        match (self.original_text.as_deref(), self.revised_text.as_deref()) {
            (Some(original), Some(revised)) if !original.is_empty() && !revised.is_empty() => {
                Some((original, revised))
            }
            _ => None,
        }
    }

    pub fn label(&self) -> String {
        let id = self
            .requirement_id
            .as_ref()
            .map_or_else(|| "?".to_string(), |id| id.to_string());
        let section = self.draft_section.as_deref().unwrap_or("unknown section");
        format!("Req #{} ({})", id, section)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CorrectionStatus {
    Applied { node: NodeId, lookup: LookupKind },
    /// Target found but the paragraph already reads as revised
    NoChange(NodeId),
    NotFound,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CorrectionOutcome {
    pub label: String,
    pub status: CorrectionStatus,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CorrectionReport {
    pub applied: usize,
    /// Not found, unchanged or rejected by the document
    pub failed: usize,
    pub outcomes: Vec<CorrectionOutcome>,
}

impl fmt::Display for CorrectionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} applied, {} failed/skipped", self.applied, self.failed)
    }
}

/// Full revised text of a paragraph currently reading `full`.
///
/// A target that covers the whole paragraph is replaced outright. A target
/// found inside the paragraph has its first occurrence swapped; when that
/// changes nothing (the raw text differs from the target only in spacing)
/// the revised text replaces the paragraph instead. Anything else is a best
/// effort whole-paragraph replacement.
pub fn corrected_text(full: &str, original: &str, revised: &str) -> String {
    let target = normalize(original);
    let current = normalize(full);

    if target == current || !current.contains(target.as_str()) {
        return revised.to_string();
    }

    let replaced = full.replacen(original, revised, 1);
    if same_content(full, &replaced) {
        revised.to_string()
    } else {
        replaced
    }
}

impl RedlineEngine {
    /// Apply every applicable correction to the paragraphs in `nodes`
    pub fn apply_corrections<H: DocumentHost + ?Sized>(
        &self,
        host: &mut H,
        nodes: &[NodeId],
        corrections: &[Correction],
    ) -> CorrectionReport {
        let config = self.config();
        let mut index = NameIndex::build(
            &*host,
            nodes,
            config.substring_min_len,
            config.anchor_fuzzy_threshold,
        );
        let mut report = CorrectionReport::default();

        for correction in corrections {
            let Some((original, revised)) = correction.texts() else {
                continue;
            };
            let label = correction.label();
            let status = apply_one(host, &mut index, original, revised);

            match &status {
                CorrectionStatus::Applied { node, .. } => {
                    tracing::info!("{}: applied tracked change at {}", label, node);
                    report.applied += 1;
                }
                CorrectionStatus::NoChange(node) => {
                    tracing::info!("{}: {} needs no change", label, node);
                    report.failed += 1;
                }
                CorrectionStatus::NotFound => {
                    tracing::warn!(
                        "{}: no paragraph matches \"{}\"",
                        label,
                        preview(original, config.preview_len)
                    );
                    report.failed += 1;
                }
                CorrectionStatus::Failed(reason) => {
                    tracing::warn!("{}: {}", label, reason);
                    report.failed += 1;
                }
            }
            report.outcomes.push(CorrectionOutcome { label, status });
        }

        tracing::info!("Corrections: {}", report);
        report
    }
}

fn apply_one<H: DocumentHost + ?Sized>(
    host: &mut H,
    index: &mut NameIndex,
    original: &str,
    revised: &str,
) -> CorrectionStatus {
    let Some(located) = index.lookup(original) else {
        return CorrectionStatus::NotFound;
    };
    tracing::debug!("Located {} by {:?}", located.node, located.kind);

    let draft = match host.paragraph(located.node) {
        Some(para) => project::rewrite(para, &corrected_text(&para.text(), original, revised)),
        None => return CorrectionStatus::Failed(format!("paragraph {} is no longer live", located.node)),
    };
    let Some(draft) = draft else {
        return CorrectionStatus::NoChange(located.node);
    };

    match host.replace_node(located.node, draft) {
        Ok(change) => {
            index.apply(&change);
            CorrectionStatus::Applied {
                node: change.current,
                lookup: located.kind,
            }
        }
        Err(err) => CorrectionStatus::Failed(format!("modify {}: {}", located.node, err)),
    }
}
