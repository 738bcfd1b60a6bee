//! Structural checks run before a document is persisted.

use crate::paragraph::{NodeId, Paragraph, ParagraphMark, Revision};
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationIssue {
    pub node: Option<NodeId>,
    pub message: String,
}

impl ValidationIssue {
    fn at(node: NodeId, message: impl Into<String>) -> Self {
        Self {
            node: Some(node),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.node {
            Some(node) => write!(f, "{}: {}", node, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

pub(crate) fn check(nodes: &[Option<Paragraph>], order: &[NodeId]) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let mut seen = HashSet::new();

    for id in order {
        if !seen.insert(*id) {
            issues.push(ValidationIssue::at(*id, "appears more than once in document order"));
            continue;
        }

        match nodes.get(id.0) {
            Some(Some(para)) => check_paragraph(para, &mut issues),
            Some(None) => issues.push(ValidationIssue::at(*id, "document order references a replaced node")),
            None => issues.push(ValidationIssue::at(*id, "document order references an unknown node")),
        }
    }

    issues
}

fn check_paragraph(para: &Paragraph, issues: &mut Vec<ValidationIssue>) {
    if para.runs.iter().any(|r| r.text.is_empty()) {
        issues.push(ValidationIssue::at(para.id, "contains an empty run"));
    }

    match para.mark {
        ParagraphMark::Inserted => {
            if para.runs.iter().any(|r| r.revision != Revision::Inserted) {
                issues.push(ValidationIssue::at(
                    para.id,
                    "inserted paragraph carries runs that are not insertions",
                ));
            }
        }
        ParagraphMark::Deleted => {
            if para.runs.iter().any(|r| r.revision == Revision::Inserted) {
                issues.push(ValidationIssue::at(para.id, "deleted paragraph carries inserted runs"));
            }
        }
        ParagraphMark::Original => {}
    }
}
