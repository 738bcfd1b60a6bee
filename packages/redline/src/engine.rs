//! # Redline Engine
//!
//! Applies the revised text of one unit to its paragraphs as tracked
//! changes.
//!
//! ## Pipeline
//!
//! ```text
//! paragraphs + revised lines
//!          ↓ normalize
//!     align (equal / delete / insert / replace)
//!          ↓ replace blocks
//!     resolve (paragraph ↔ line pairs)
//!          ↓
//!     project → host mutations → anchors refreshed
//! ```
//!
//! Units are processed one after another and operations inside a unit in
//! alignment order: every mutation may change the node a later operation
//! has to target. A failed operation is recorded and skipped; it never stops
//! the rest of the unit or any later unit.

use crate::align::{align, EditOperation};
use crate::anchors::AnchorMap;
use crate::config::RedlineConfig;
use crate::error::{RedlineError, RedlineResult};
use crate::normalize::keys;
use crate::project;
use crate::resolve::{ReplacementResolver, ResolvedBlock};
use crate::tally::{preview, EditKind, FailedEdit, RedlineTally};
use markup_document::{DocumentHost, Formatting, NodeId};
use std::ops::Range;

/// One logical unit: its paragraphs in document order and the revised lines
/// that should replace them
#[derive(Debug, Clone, Default)]
pub struct Unit {
    pub label: String,
    pub nodes: Vec<NodeId>,
    pub revised: Vec<String>,
}

impl Unit {
    pub fn new(label: impl Into<String>, nodes: Vec<NodeId>, revised: Vec<String>) -> Self {
        Self {
            label: label.into(),
            nodes,
            revised,
        }
    }
}

#[derive(Debug, Clone)]
pub struct UnitReport {
    pub label: String,
    pub tally: RedlineTally,
    /// Live node per original paragraph after the pass
    pub live: Vec<NodeId>,
}

#[derive(Debug, Clone, Default)]
pub struct RedlineEngine {
    config: RedlineConfig,
}

impl RedlineEngine {
    pub fn new(config: RedlineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RedlineConfig {
        &self.config
    }

    /// Redline every unit in order; the returned tally is the sum of all
    /// unit tallies
    pub fn redline_units<H: DocumentHost + ?Sized>(
        &self,
        host: &mut H,
        units: &[Unit],
    ) -> (Vec<UnitReport>, RedlineTally) {
        let mut total = RedlineTally::default();
        let mut reports = Vec::with_capacity(units.len());
        for unit in units {
            let report = self.redline_unit(host, unit);
            total += report.tally.clone();
            reports.push(report);
        }
        (reports, total)
    }

    pub fn redline_unit<H: DocumentHost + ?Sized>(&self, host: &mut H, unit: &Unit) -> UnitReport {
        let mut pass = UnitPass::new(&self.config, host, unit);
        pass.run();

        tracing::info!("{}: {}", unit.label, pass.tally);
        UnitReport {
            label: unit.label.clone(),
            live: pass.anchors.live().to_vec(),
            tally: pass.tally,
        }
    }
}

/// Mutable state of one unit while it is being redlined
struct UnitPass<'a, H: ?Sized> {
    config: &'a RedlineConfig,
    host: &'a mut H,
    label: &'a str,
    revised: &'a [String],
    /// Text of each original paragraph when the pass started
    texts: Vec<String>,
    anchors: AnchorMap,
    tally: RedlineTally,
}

impl<'a, H: DocumentHost + ?Sized> UnitPass<'a, H> {
    fn new(config: &'a RedlineConfig, host: &'a mut H, unit: &'a Unit) -> Self {
        let mut tally = RedlineTally::default();
        let mut nodes = Vec::with_capacity(unit.nodes.len());
        let mut texts = Vec::with_capacity(unit.nodes.len());

        for id in &unit.nodes {
            match host.paragraph(*id) {
                Some(para) => {
                    nodes.push(*id);
                    texts.push(para.text());
                }
                None => {
                    let err = RedlineError::MissingParagraph(*id);
                    tracing::warn!("{}: {}", unit.label, err);
                    tally.failed(
                        EditKind::Lookup,
                        FailedEdit {
                            kind: EditKind::Lookup,
                            unit: unit.label.clone(),
                            reason: err.to_string(),
                            preview: String::new(),
                        },
                    );
                }
            }
        }

        let anchors = AnchorMap::for_unit(&*host, nodes);
        Self {
            config,
            host,
            label: &unit.label,
            revised: &unit.revised,
            texts,
            anchors,
            tally,
        }
    }

    fn run(&mut self) {
        let original_keys = keys(&self.texts);
        let revised_keys = keys(self.revised);
        let resolver = ReplacementResolver::new(
            self.config.paragraph_match_threshold,
            self.config.match_strategy,
        );

        let ops = align(&original_keys, &revised_keys);
        tracing::debug!(
            "{}: {} paragraphs vs {} revised lines in {} blocks",
            self.label,
            self.texts.len(),
            self.revised.len(),
            ops.len()
        );

        for op in ops {
            match op {
                EditOperation::Equal { original, .. } => {
                    self.tally.unchanged += original.len();
                }
                EditOperation::Delete { original, .. } => {
                    for index in original {
                        self.delete(index);
                    }
                }
                EditOperation::Insert { at, revised } => {
                    let anchor = self.anchors.anchor_before(at);
                    self.insert_run(anchor, revised);
                }
                EditOperation::Replace { original, revised } => {
                    let block = resolver.resolve(&original_keys, &revised_keys, original, revised);
                    self.replace(&block);
                }
            }
        }
    }

    /// Matched pairs first, then deletions, then insertions placed after
    /// whatever precedes them in revised order
    fn replace(&mut self, block: &ResolvedBlock) {
        for m in &block.matches {
            self.modify(m.original, m.revised);
        }

        for index in block.unmatched_original() {
            self.delete(index);
        }

        let mut anchor = self.anchors.anchor_before(block.original.start);
        for line in block.revised.clone() {
            match block.match_for_revised(line) {
                Some(m) => anchor = self.anchors.target(m.original),
                None => {
                    if let Some(node) = self.insert(anchor.clone(), line) {
                        anchor = Ok(node);
                    }
                }
            }
        }
    }

    fn modify(&mut self, index: usize, line: usize) {
        let lines = self.revised;
        let revised = &lines[line];
        let target = match self.anchors.target(index) {
            Ok(target) => target,
            Err(err) => return self.fail(EditKind::Modification, index_preview(&self.texts, index), err),
        };

        let draft = match self.host.paragraph(target) {
            Some(para) => project::modification(para, revised),
            None => {
                let err = RedlineError::MissingParagraph(target);
                return self.fail(EditKind::Modification, self.texts[index].clone(), err);
            }
        };

        let Some(draft) = draft else {
            tracing::debug!("{}: paragraph {} unchanged after normalization", self.label, index);
            self.tally.unchanged += 1;
            return;
        };

        match self.host.replace_node(target, draft) {
            Ok(change) => {
                tracing::debug!("{}: modified {} -> {}", self.label, target, change.current);
                self.anchors.record(index, &change);
                self.tally.succeeded(EditKind::Modification);
            }
            Err(source) => {
                let err = RedlineError::mutation(format!("modify {}", target), source);
                self.fail(EditKind::Modification, self.texts[index].clone(), err);
            }
        }
    }

    fn delete(&mut self, index: usize) {
        let target = match self.anchors.target(index) {
            Ok(target) => target,
            Err(err) => return self.fail(EditKind::Deletion, index_preview(&self.texts, index), err),
        };

        match self.host.mark_deleted(target) {
            Ok(change) => {
                tracing::debug!("{}: marked {} deleted", self.label, target);
                self.anchors.record(index, &change);
                self.tally.succeeded(EditKind::Deletion);
            }
            Err(source) => {
                let err = RedlineError::mutation(format!("delete {}", target), source);
                self.fail(EditKind::Deletion, self.texts[index].clone(), err);
            }
        }
    }

    /// Insert consecutive lines, each after the one before it
    fn insert_run(&mut self, mut anchor: RedlineResult<NodeId>, lines: Range<usize>) {
        for line in lines {
            if let Some(node) = self.insert(anchor.clone(), line) {
                anchor = Ok(node);
            }
        }
    }

    /// Insert one revised line after `anchor`; the new node on success
    fn insert(&mut self, anchor: RedlineResult<NodeId>, line: usize) -> Option<NodeId> {
        let lines = self.revised;
        let revised = &lines[line];
        let anchor = match anchor {
            Ok(anchor) => anchor,
            Err(err) => {
                self.fail(EditKind::Insertion, revised.clone(), err);
                return None;
            }
        };

        let run_format = self
            .host
            .paragraph(anchor)
            .map(|p| p.run_format())
            .unwrap_or_else(Formatting::empty);
        let draft = project::insertion(&run_format, revised);

        match self.host.insert_after(anchor, draft) {
            Ok(change) => {
                tracing::debug!("{}: inserted {} after {}", self.label, change.current, anchor);
                self.tally.succeeded(EditKind::Insertion);
                Some(change.current)
            }
            Err(source) => {
                let err = RedlineError::mutation(format!("insert after {}", anchor), source);
                self.fail(EditKind::Insertion, revised.clone(), err);
                None
            }
        }
    }

    fn fail(&mut self, kind: EditKind, text: String, err: RedlineError) {
        tracing::warn!("{}: {} failed: {}", self.label, kind, err);
        self.tally.failed(
            kind,
            FailedEdit {
                kind,
                unit: self.label.to_string(),
                reason: err.to_string(),
                preview: preview(&text, self.config.preview_len),
            },
        );
    }
}

fn index_preview(texts: &[String], index: usize) -> String {
    texts.get(index).cloned().unwrap_or_default()
}
