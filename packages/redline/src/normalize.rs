//! Whitespace normalization for comparison keys.
//!
//! Normalized text is only ever used to decide whether two texts are the
//! same or how similar they are. It never ends up in a rendered paragraph.

/// Collapse every whitespace run (tabs and newlines included) to one space
/// and trim both ends.
pub fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// True when two texts differ only in whitespace
pub fn same_content(a: &str, b: &str) -> bool {
    a.split_whitespace().eq(b.split_whitespace())
}

/// Normalize a sequence of texts into comparison keys
pub fn keys<S: AsRef<str>>(texts: &[S]) -> Vec<String> {
    texts.iter().map(|t| normalize(t.as_ref())).collect()
}
