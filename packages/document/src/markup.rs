//! # Tracked-Change Markup
//!
//! Renders a document as a WordprocessingML-style body. Consecutive runs with
//! the same revision are grouped into one `<w:ins>` or `<w:del>` element so
//! each contiguous change shows up as a single tracked change. Formatting
//! blobs are emitted as stored; inserted and deleted paragraphs additionally
//! get their paragraph mark revision inside the paragraph properties.

use crate::paragraph::{Formatting, Paragraph, ParagraphMark, Revision, Run};
use crate::Document;
use chrono::{DateTime, SecondsFormat, Utc};

#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Author attributed to every tracked change
    pub author: String,
    /// Timestamp attributed to every tracked change
    pub date: DateTime<Utc>,
}

impl RenderOptions {
    pub fn new(author: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            date: Utc::now(),
        }
    }

    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = date;
        self
    }
}

/// Render the whole document body
pub fn render_markup(doc: &Document, options: &RenderOptions) -> String {
    let mut renderer = MarkupRenderer::new(options);
    let mut out = String::from("<w:body>");
    for para in doc.paragraphs() {
        renderer.paragraph(para, &mut out);
    }
    out.push_str("</w:body>");
    out
}

/// Render a single paragraph; revision ids start at 1
pub fn render_paragraph(para: &Paragraph, options: &RenderOptions) -> String {
    let mut out = String::new();
    MarkupRenderer::new(options).paragraph(para, &mut out);
    out
}

struct MarkupRenderer<'a> {
    options: &'a RenderOptions,
    next_id: u32,
}

impl<'a> MarkupRenderer<'a> {
    fn new(options: &'a RenderOptions) -> Self {
        Self { options, next_id: 1 }
    }

    fn paragraph(&mut self, para: &Paragraph, out: &mut String) {
        out.push_str("<w:p>");

        let mark = match para.mark {
            ParagraphMark::Original => None,
            ParagraphMark::Inserted => Some(format!("<w:ins{}/>", self.revision_attrs())),
            ParagraphMark::Deleted => Some(format!("<w:del{}/>", self.revision_attrs())),
        };
        match mark {
            Some(mark) => out.push_str(&marked_properties(&para.paragraph_format, &mark)),
            None => out.push_str(para.paragraph_format.as_str()),
        }

        for group in group_by_revision(&para.runs) {
            match group[0].revision {
                Revision::Unchanged => {
                    for run in group {
                        runs_xml(&run.format, &run.text, false, out);
                    }
                }
                Revision::Inserted => {
                    out.push_str(&format!("<w:ins{}>", self.revision_attrs()));
                    for run in group {
                        runs_xml(&run.format, &run.text, false, out);
                    }
                    out.push_str("</w:ins>");
                }
                Revision::Deleted => {
                    out.push_str(&format!("<w:del{}>", self.revision_attrs()));
                    for run in group {
                        runs_xml(&run.format, &run.text, true, out);
                    }
                    out.push_str("</w:del>");
                }
            }
        }

        out.push_str("</w:p>");
    }

    fn revision_attrs(&mut self) -> String {
        let id = self.next_id;
        self.next_id += 1;
        format!(
            r#" w:id="{}" w:author="{}" w:date="{}""#,
            id,
            escape_attr(&self.options.author),
            self.options.date.to_rfc3339_opts(SecondsFormat::Secs, true)
        )
    }
}

/// Paragraph properties carrying a paragraph mark revision.
///
/// The mark goes first inside the paragraph mark's `<w:rPr>`, which is
/// created when the stored properties have none.
fn marked_properties(format: &Formatting, mark: &str) -> String {
    let ppr = format.as_str();
    if ppr.is_empty() {
        return format!("<w:pPr><w:rPr>{}</w:rPr></w:pPr>", mark);
    }
    if let Some(at) = ppr.find("<w:rPr>") {
        let at = at + "<w:rPr>".len();
        return format!("{}{}{}", &ppr[..at], mark, &ppr[at..]);
    }
    if let Some(at) = ppr.find("<w:rPr/>") {
        return format!("{}<w:rPr>{}</w:rPr>{}", &ppr[..at], mark, &ppr[at + "<w:rPr/>".len()..]);
    }
    if let Some(at) = ppr.rfind("</w:pPr>") {
        return format!("{}<w:rPr>{}</w:rPr>{}", &ppr[..at], mark, &ppr[at..]);
    }
    if ppr.starts_with("<w:pPr") && ppr.ends_with("/>") {
        let open = &ppr[..ppr.len() - 2];
        return format!("{}><w:rPr>{}</w:rPr></w:pPr>", open.trim_end(), mark);
    }

    tracing::warn!("Paragraph properties without a <w:pPr> element, mark dropped");
    ppr.to_string()
}

fn group_by_revision(runs: &[Run]) -> Vec<&[Run]> {
    let mut groups = Vec::new();
    let mut start = 0;
    for i in 1..=runs.len() {
        if i == runs.len() || runs[i].revision != runs[start].revision {
            if start < i {
                groups.push(&runs[start..i]);
            }
            start = i;
        }
    }
    groups
}

/// Text to runs, splitting at tab characters
fn runs_xml(format: &Formatting, text: &str, deleted: bool, out: &mut String) {
    let tag = if deleted { "w:delText" } else { "w:t" };
    let rpr = format.as_str();
    let mut segments = text.split('\t').peekable();

    while let Some(segment) = segments.next() {
        if !segment.is_empty() {
            out.push_str(&format!(
                r#"<w:r>{}<{} xml:space="preserve">{}</{}></w:r>"#,
                rpr,
                tag,
                escape_text(segment),
                tag
            ));
        }
        if segments.peek().is_some() {
            out.push_str(&format!("<w:r>{}<w:tab/></w:r>", rpr));
        }
    }
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(text: &str) -> String {
    escape_text(text).replace('"', "&quot;")
}
