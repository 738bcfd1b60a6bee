//! # Edit Projection
//!
//! Turns diff results into paragraph drafts the host can apply.
//!
//! Every synthesized run takes the character formatting of the source
//! paragraph's first run; a modified paragraph keeps its paragraph
//! formatting. Numbering prefixes are carried through unchanged.

use crate::char_diff::{diff_merged, DiffSpan};
use crate::normalize::same_content;
use crate::numbering::{split_for_insertion, split_numbering, strip_synthetic_prefix};
use markup_document::{Formatting, Paragraph, ParagraphDraft, ParagraphMark, Revision, Run};

/// Tracked rewrite of `para` into `revised`, or `None` when the bodies only
/// differ in whitespace.
///
/// The numbering prefix of the paragraph is kept as is. A revised line
/// without a tab that spells out its own number has that number dropped
/// when the paragraph already has a prefix.
pub fn modification(para: &Paragraph, revised: &str) -> Option<ParagraphDraft> {
    let current = para.text();
    let (prefix, original_body) = split_numbering(&current);

    let revised_body = match split_numbering(revised) {
        (Some(_), body) => body,
        (None, body) if prefix.is_some() => strip_synthetic_prefix(body),
        (None, body) => body,
    };

    if same_content(original_body, revised_body) {
        return None;
    }

    let spans = diff_merged(original_body, revised_body);
    Some(tracked_draft(para, prefix, &spans))
}

/// Tracked rewrite of the whole paragraph text, no prefix handling.
///
/// `None` when the result would only differ in whitespace.
pub fn rewrite(para: &Paragraph, revised: &str) -> Option<ParagraphDraft> {
    let current = para.text();
    if same_content(&current, revised) {
        return None;
    }
    let spans = diff_merged(&current, revised);
    Some(tracked_draft(para, None, &spans))
}

/// A new paragraph whose content is entirely a tracked insertion
pub fn insertion(run_format: &Formatting, revised: &str) -> ParagraphDraft {
    let (prefix, body) = split_for_insertion(revised);
    let mut draft = ParagraphDraft::default().with_mark(ParagraphMark::Inserted);

    if let Some(prefix) = prefix {
        draft.push_run(prefix, run_format, Revision::Inserted);
        draft.push_run("\t", run_format, Revision::Inserted);
    }
    draft.push_run(body, run_format, Revision::Inserted);
    draft
}

/// Current-view characters of a paragraph, with deleted runs kept in place
enum Piece<'a> {
    Char(Revision, char),
    Removed(&'a str),
}

fn pieces(runs: &[Run]) -> Vec<Piece<'_>> {
    let mut pieces = Vec::new();
    for run in runs {
        match run.revision {
            Revision::Deleted => pieces.push(Piece::Removed(&run.text)),
            revision => pieces.extend(run.text.chars().map(|c| Piece::Char(revision, c))),
        }
    }
    pieces
}

/// Lay `spans` (a diff of the paragraph's current text) over its existing
/// runs. Earlier deletions stay deleted, earlier insertions that the new
/// diff removes disappear instead of turning into deletions, so the
/// original text is always recoverable.
fn tracked_draft(para: &Paragraph, prefix: Option<&str>, spans: &[DiffSpan]) -> ParagraphDraft {
    let format = para.run_format();
    let mut draft = ParagraphDraft {
        paragraph_format: para.paragraph_format.clone(),
        mark: para.mark,
        runs: Vec::new(),
    };

    let mut leading = Vec::new();
    if let Some(prefix) = prefix {
        leading.push(DiffSpan::Unchanged(format!("{}\t", prefix)));
    }

    let mut pieces = pieces(&para.runs).into_iter();
    let mut buf = [0u8; 4];

    for span in leading.iter().chain(spans) {
        let keep = match span {
            DiffSpan::Inserted(text) => {
                draft.push_run(text, &format, Revision::Inserted);
                continue;
            }
            DiffSpan::Unchanged(_) => true,
            DiffSpan::Deleted(_) => false,
        };

        let mut remaining = span.text().chars().count();
        while remaining > 0 {
            match pieces.next() {
                Some(Piece::Removed(text)) => draft.push_run(text, &format, Revision::Deleted),
                Some(Piece::Char(revision, c)) => {
                    remaining -= 1;
                    let revision = match (keep, revision) {
                        (true, revision) => revision,
                        (false, Revision::Unchanged) => Revision::Deleted,
                        (false, _) => continue,
                    };
                    draft.push_run(c.encode_utf8(&mut buf), &format, revision);
                }
                None => break,
            }
        }
    }

    for piece in pieces {
        if let Piece::Removed(text) = piece {
            draft.push_run(text, &format, Revision::Deleted);
        }
    }

    draft
}

#[cfg(test)]
mod tests {
    use super::*;
    use markup_document::{Document, DocumentHost};

    fn rpr() -> Formatting {
        Formatting::new("<w:rPr><w:sz w:val=\"22\"/></w:rPr>")
    }

    fn ppr() -> Formatting {
        Formatting::new("<w:pPr><w:ind w:left=\"720\"/></w:pPr>")
    }

    /// Host a single paragraph and hand it back
    fn hosted(text: &str) -> Document {
        Document::from_paragraphs("t.json", "HK", vec![ParagraphDraft::plain(text, ppr(), rpr())])
    }

    fn first(doc: &Document) -> &Paragraph {
        doc.paragraphs().next().unwrap()
    }

    #[test]
    fn test_modification_keeps_prefix_and_formats() {
        let doc = hosted("1.\tThe Borrower shall pay interest at 5%.");
        let draft = modification(first(&doc), "1.\tThe Borrower shall pay interest at 7%.").unwrap();

        assert_eq!(draft.paragraph_format, ppr());
        assert!(draft.runs.iter().all(|r| r.format == rpr()));
        assert_eq!(
            draft.runs,
            vec![
                Run::new("1.\tThe Borrower shall pay interest at ", rpr(), Revision::Unchanged),
                Run::new("5", rpr(), Revision::Deleted),
                Run::new("7", rpr(), Revision::Inserted),
                Run::new("%.", rpr(), Revision::Unchanged),
            ]
        );
    }

    #[test]
    fn test_synthetic_number_is_not_duplicated() {
        let doc = hosted("4.\tThe Lender may assign.");
        let draft = modification(first(&doc), "4. The Lender may assign freely.").unwrap();

        assert_eq!(draft.text(), "4.\tThe Lender may assign freely.");
        assert!(draft
            .runs
            .iter()
            .filter(|r| r.revision == Revision::Inserted)
            .all(|r| !r.text.contains('4')));
    }

    #[test]
    fn test_prefix_change_alone_is_no_change() {
        let doc = hosted("4.\tMiscellaneous.");
        assert!(modification(first(&doc), "5.\tMiscellaneous.").is_none());
        assert!(modification(first(&doc), "4.\t Miscellaneous. ").is_none());
    }

    #[test]
    fn test_unnumbered_paragraph_keeps_leading_number() {
        let doc = hosted("Within 10 days.");
        let draft = modification(first(&doc), "10 days at most.").unwrap();
        assert_eq!(draft.text(), "10 days at most.");
    }

    #[test]
    fn test_insertion_marks_everything_inserted() {
        let draft = insertion(&rpr(), "2a.\tBorrower may cure within 30 days.");

        assert_eq!(draft.mark, ParagraphMark::Inserted);
        assert!(draft.paragraph_format.is_empty());
        assert!(draft.runs.iter().all(|r| r.revision == Revision::Inserted));
        assert_eq!(draft.text(), "2a.\tBorrower may cure within 30 days.");

        let numbered = insertion(&rpr(), "5. New covenant.");
        assert_eq!(numbered.text(), "5.\tNew covenant.");
    }

    #[test]
    fn test_rewrite_and_revert() {
        let mut doc = hosted("Interest accrues at the Default Rate of 2% per annum.");
        let para = first(&doc).clone();

        let draft = rewrite(&para, "Interest accrues at the Default Rate of 3% per annum.").unwrap();
        let change = doc.replace_node(para.id, draft).unwrap();

        assert_eq!(change.text, "Interest accrues at the Default Rate of 3% per annum.");
        assert_eq!(doc.reject_all(), vec!["Interest accrues at the Default Rate of 2% per annum."]);
        assert!(rewrite(&para, "Interest  accrues at the Default Rate of 2% per annum.").is_none());
    }

    #[test]
    fn test_second_edit_keeps_first_deletion() {
        let fmt = rpr();
        let mut layered = ParagraphDraft::default();
        layered.push_run("Rate is ", &fmt, Revision::Unchanged);
        layered.push_run("5", &fmt, Revision::Deleted);
        layered.push_run("7", &fmt, Revision::Inserted);
        layered.push_run("%.", &fmt, Revision::Unchanged);
        let doc = Document::from_paragraphs("t.json", "HK", vec![layered]);

        let draft = rewrite(first(&doc), "Rate is 8%.").unwrap();

        assert_eq!(
            draft.runs,
            vec![
                Run::new("Rate is ", rpr(), Revision::Unchanged),
                Run::new("5", rpr(), Revision::Deleted),
                Run::new("8", rpr(), Revision::Inserted),
                Run::new("%.", rpr(), Revision::Unchanged),
            ]
        );
    }
}
