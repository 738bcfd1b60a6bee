//! Mutation sequences, persistence and revert behaviour of the host document

use markup_common::{FileSystem, MockFileSystem};
use markup_document::{
    CommitOutcome, Document, DocumentHost, Formatting, MutationError, ParagraphDraft,
    ParagraphMark, Revision,
};
use std::path::Path;

fn tracked_draft(unchanged: &str, deleted: &str, inserted: &str) -> ParagraphDraft {
    let fmt = Formatting::new("<w:rPr><w:sz w:val=\"24\"/></w:rPr>");
    let mut draft = ParagraphDraft::default();
    draft.push_run(unchanged, &fmt, Revision::Unchanged);
    draft.push_run(deleted, &fmt, Revision::Deleted);
    draft.push_run(inserted, &fmt, Revision::Inserted);
    draft
}

#[test]
fn test_replace_gives_new_identity_and_stales_old() {
    let mut doc = Document::from_texts("test.json", &["1.\tRate is 5%.", "2.\tTerm."]);
    let ids = doc.paragraph_ids();

    let change = doc
        .replace_node(ids[0], tracked_draft("1.\tRate is ", "5", "7"))
        .unwrap();

    assert_eq!(change.previous, Some(ids[0]));
    assert_ne!(change.current, ids[0]);
    assert_eq!(change.text, "1.\tRate is 7");
    assert_eq!(doc.paragraph_ids(), vec![change.current, ids[1]]);

    // The old node can no longer be targeted
    let err = doc.mark_deleted(ids[0]).unwrap_err();
    assert_eq!(err, MutationError::StaleNode(ids[0]));
}

#[test]
fn test_chained_inserts_keep_order() {
    let mut doc = Document::from_texts("test.json", &["A", "D"]);
    let ids = doc.paragraph_ids();

    let mut anchor = ids[0];
    for text in ["B", "C"] {
        let mut draft = ParagraphDraft::default().with_mark(ParagraphMark::Inserted);
        draft.push_run(text, &Formatting::empty(), Revision::Inserted);
        anchor = doc.insert_after(anchor, draft).unwrap().current;
    }

    let texts: Vec<String> = doc.paragraphs().map(|p| p.text()).collect();
    assert_eq!(texts, vec!["A", "B", "C", "D"]);
    assert_eq!(doc.version, 2);
}

#[test]
fn test_mark_deleted_keeps_node_and_reverts() {
    let mut doc = Document::from_texts("test.json", &["3.\tReserved.", "4.\tMisc."]);
    let ids = doc.paragraph_ids();

    let change = doc.mark_deleted(ids[0]).unwrap();
    assert_eq!(change.current, ids[0]);
    assert_eq!(change.text, "");
    assert_eq!(doc.len(), 2);

    assert_eq!(doc.accept_all(), vec!["4.\tMisc."]);
    assert_eq!(doc.reject_all(), vec!["3.\tReserved.", "4.\tMisc."]);

    // Deleting twice is rejected
    assert_eq!(
        doc.mark_deleted(ids[0]).unwrap_err(),
        MutationError::AlreadyDeleted(ids[0])
    );
}

#[test]
fn test_cannot_delete_tracked_insertion() {
    let mut doc = Document::from_texts("test.json", &["A"]);
    let ids = doc.paragraph_ids();

    let mut draft = ParagraphDraft::default().with_mark(ParagraphMark::Inserted);
    draft.push_run("B", &Formatting::empty(), Revision::Inserted);
    let inserted = doc.insert_after(ids[0], draft).unwrap().current;

    assert!(matches!(
        doc.mark_deleted(inserted),
        Err(MutationError::InvalidStructure(_))
    ));
}

#[test]
fn test_load_mutate_commit_roundtrip() {
    let fs = MockFileSystem::new();
    fs.add_file(
        "deal/document.json",
        r#"{
            "author": "Reviewer",
            "paragraphs": [
                { "paragraphFormat": "<w:pPr><w:jc w:val=\"both\"/></w:pPr>",
                  "runs": [ { "text": "1.\tThe Borrower shall pay.", "format": "<w:rPr><w:b/></w:rPr>" } ] }
            ]
        }"#,
    );

    let mut doc = Document::load(&fs, "deal/document.json").unwrap();
    assert_eq!(doc.author(), "Reviewer");
    assert!(!doc.is_dirty());

    let id = doc.paragraph_ids()[0];
    doc.mark_deleted(id).unwrap();
    assert!(doc.is_dirty());

    let outcome = doc.commit(&fs).unwrap();
    assert_eq!(outcome, CommitOutcome::Validated);
    assert!(!doc.is_dirty());

    let reloaded = Document::load(&fs, "deal/document.json").unwrap();
    let para = reloaded.paragraphs().next().unwrap();
    assert_eq!(para.mark, ParagraphMark::Deleted);
    assert_eq!(para.paragraph_format.as_str(), "<w:pPr><w:jc w:val=\"both\"/></w:pPr>");
    assert_eq!(para.original_text(), "1.\tThe Borrower shall pay.");
}

#[test]
fn test_commit_falls_back_when_validation_fails() {
    let fs = MockFileSystem::new();
    let mut broken = ParagraphDraft::default();
    broken.runs.push(markup_document::Run::plain("", Formatting::empty()));
    let mut doc = Document::from_paragraphs("out.json", "HK", vec![broken]);

    let outcome = doc.commit_to(&fs, Path::new("out.json")).unwrap();

    match outcome {
        CommitOutcome::SavedWithoutValidation(issues) => assert_eq!(issues.len(), 1),
        other => panic!("expected fallback save, got {:?}", other),
    }
    assert!(fs.exists(Path::new("out.json")));
    assert_eq!(fs.write_count(), 1);
}
