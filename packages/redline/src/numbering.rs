//! Numbering prefixes.
//!
//! Paragraph numbering ("1.", "4.2", "2a.") is structural: it sits before the
//! first tab and is never diffed. Revised lines sometimes spell the number
//! out with a space instead of a tab; those synthetic prefixes are detected
//! with a pattern.

use regex::Regex;
use std::sync::OnceLock;

fn number_prefix() -> &'static Regex {
    static NUMBER_PREFIX: OnceLock<Regex> = OnceLock::new();
    NUMBER_PREFIX.get_or_init(|| Regex::new(r"^[\d.]+\.?\s+").expect("valid numbering pattern"))
}

/// Split at the first tab into `(prefix, body)`; no tab means no prefix
pub fn split_numbering(text: &str) -> (Option<&str>, &str) {
    match text.split_once('\t') {
        Some((prefix, body)) => (Some(prefix), body),
        None => (None, text),
    }
}

/// Body with a leading number-like prefix ("4. ", "4.2 ") removed
pub fn strip_synthetic_prefix(body: &str) -> &str {
    match number_prefix().find(body) {
        Some(m) => &body[m.end()..],
        None => body,
    }
}

/// Structural split of a line that is about to become a new paragraph.
///
/// A tab always separates prefix and body. Without a tab, a leading
/// number-like prefix is promoted to the structural prefix (trailing
/// whitespace dropped).
pub fn split_for_insertion(text: &str) -> (Option<&str>, &str) {
    if let (Some(prefix), body) = split_numbering(text) {
        return (Some(prefix), body);
    }
    match number_prefix().find(text) {
        Some(m) => (Some(text[..m.end()].trim_end()), &text[m.end()..]),
        None => (None, text),
    }
}
