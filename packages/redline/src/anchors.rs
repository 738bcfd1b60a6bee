//! # Anchoring
//!
//! Mutations change which node lives at a logical position: a replaced
//! paragraph gets a new id and a freshly inserted paragraph becomes the
//! anchor for the next insertion. Two lookup structures track this:
//!
//! - [`AnchorMap`]: positional, one live node per original index of a unit
//! - [`NameIndex`]: normalized text to node, for edits that locate their
//!   target by content
//!
//! Both are refreshed from the [`NodeChange`] every mutation returns, never
//! by re-reading the document.

use crate::error::{RedlineError, RedlineResult};
use crate::matcher::SequenceMatcher;
use crate::normalize::normalize;
use markup_document::{DocumentHost, NodeChange, NodeId};

/// Live node per logical position of one unit
#[derive(Debug, Clone)]
pub struct AnchorMap {
    live: Vec<NodeId>,
    /// Node just before the unit in the document, if any
    leading: Option<NodeId>,
}

impl AnchorMap {
    pub fn new(nodes: Vec<NodeId>, leading: Option<NodeId>) -> Self {
        Self {
            live: nodes,
            leading,
        }
    }

    /// Positional map for `nodes`, anchored after whatever precedes the
    /// first of them in `host`
    pub fn for_unit<H: DocumentHost + ?Sized>(host: &H, nodes: Vec<NodeId>) -> Self {
        let leading = nodes.first().and_then(|first| host.preceding(*first));
        Self::new(nodes, leading)
    }

    /// Current node at `index`
    pub fn target(&self, index: usize) -> RedlineResult<NodeId> {
        self.live
            .get(index)
            .copied()
            .ok_or_else(|| RedlineError::AnchorNotFound(format!("position {}", index)))
    }

    /// Node new content at logical position `index` goes after.
    ///
    /// Position 0 goes after the node preceding the unit; a unit at the very
    /// start of the document falls back to its own first paragraph.
    pub fn anchor_before(&self, index: usize) -> RedlineResult<NodeId> {
        let anchor = match index.checked_sub(1) {
            Some(previous) => self.live.get(previous).copied(),
            None => self.leading.or_else(|| self.live.first().copied()),
        };
        anchor.ok_or_else(|| RedlineError::AnchorNotFound(format!("insertion point {}", index)))
    }

    /// Record the node now live at `index`
    pub fn record(&mut self, index: usize, change: &NodeChange) {
        if let Some(slot) = self.live.get_mut(index) {
            *slot = change.current;
        }
    }

    pub fn live(&self) -> &[NodeId] {
        &self.live
    }
}

/// How a [`NameIndex`] lookup found its node
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LookupKind {
    Exact,
    Substring,
    Fuzzy(f64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Located {
    pub node: NodeId,
    pub kind: LookupKind,
}

/// Normalized paragraph text to node, in document order
#[derive(Debug, Clone, Default)]
pub struct NameIndex {
    entries: Vec<(String, NodeId)>,
    substring_min_len: usize,
    fuzzy_threshold: f64,
}

impl NameIndex {
    pub fn new(substring_min_len: usize, fuzzy_threshold: f64) -> Self {
        Self {
            entries: Vec::new(),
            substring_min_len,
            fuzzy_threshold,
        }
    }

    /// Index every listed node the host still has
    pub fn build<H: DocumentHost + ?Sized>(
        host: &H,
        nodes: &[NodeId],
        substring_min_len: usize,
        fuzzy_threshold: f64,
    ) -> Self {
        let mut index = Self::new(substring_min_len, fuzzy_threshold);
        for id in nodes {
            if let Some(para) = host.paragraph(*id) {
                index.entries.push((normalize(&para.text()), *id));
            }
        }
        index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Key currently stored for `node`
    pub fn key_of(&self, node: NodeId) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, id)| *id == node)
            .map(|(key, _)| key.as_str())
    }

    /// Locate the paragraph for `text`: exact key first, then containment in
    /// either direction, then the most similar key
    pub fn lookup(&self, text: &str) -> Option<Located> {
        let target = normalize(text);
        if target.is_empty() {
            return None;
        }

        if let Some((_, node)) = self.entries.iter().find(|(key, _)| *key == target) {
            return Some(Located {
                node: *node,
                kind: LookupKind::Exact,
            });
        }

        let contained = self.entries.iter().find(|(key, _)| {
            key.chars().count() > self.substring_min_len
                && (key.contains(target.as_str()) || target.contains(key.as_str()))
        });
        if let Some((_, node)) = contained {
            return Some(Located {
                node: *node,
                kind: LookupKind::Substring,
            });
        }

        let target_chars: Vec<char> = target.chars().collect();
        let mut best: Option<(NodeId, f64)> = None;
        for (key, node) in &self.entries {
            if key.is_empty() {
                continue;
            }
            let key_chars: Vec<char> = key.chars().collect();
            let score = SequenceMatcher::new(&target_chars, &key_chars).ratio();
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((*node, score));
            }
        }

        best.filter(|(_, score)| *score > self.fuzzy_threshold)
            .map(|(node, score)| Located {
                node,
                kind: LookupKind::Fuzzy(score),
            })
    }

    /// Refresh the index after a mutation.
    ///
    /// A replacement takes over the entry of the node it replaced; a new
    /// node is appended.
    pub fn apply(&mut self, change: &NodeChange) {
        let key = normalize(&change.text);
        let slot = change
            .previous
            .and_then(|previous| self.entries.iter().position(|(_, id)| *id == previous));

        match slot {
            Some(position) => self.entries[position] = (key, change.current),
            None => self.entries.push((key, change.current)),
        }
    }
}
