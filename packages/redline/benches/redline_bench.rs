use criterion::{black_box, criterion_group, criterion_main, Criterion};
use markup_document::Document;
use markup_redline::{diff_merged, similarity, MatchStrategy, RedlineConfig, RedlineEngine, Unit};

const CLAUSE: &str = "The Borrower shall deliver to the Lender, within 90 days after the end of each fiscal year, \
audited consolidated financial statements together with a certificate of compliance signed by an officer.";

const REVISED_CLAUSE: &str = "The Borrower shall deliver to the Lender, within 120 days after the end of each fiscal year, \
audited financial statements of the Borrower and its Subsidiaries together with a compliance certificate.";

fn character_diff(c: &mut Criterion) {
    c.bench_function("diff_long_clause", |b| {
        b.iter(|| diff_merged(black_box(CLAUSE), black_box(REVISED_CLAUSE)))
    });
}

fn paragraph_similarity(c: &mut Criterion) {
    c.bench_function("similarity_long_clause", |b| {
        b.iter(|| similarity(black_box(CLAUSE), black_box(REVISED_CLAUSE)))
    });
}

fn section_texts(count: usize) -> (Vec<String>, Vec<String>) {
    let original: Vec<String> = (0..count)
        .map(|i| format!("{}.{}\tThe Borrower shall comply with covenant {} at all times.", 5, i, i))
        .collect();
    let revised: Vec<String> = (0..count)
        .map(|i| match i % 4 {
            0 => format!("{}.{}\tThe Borrower shall comply with covenant {} at all times.", 5, i, i),
            1 => format!("{}.{}\tThe Borrower shall use reasonable efforts on covenant {}.", 5, i, i),
            2 => format!("{}.{}a\tThe Lender may waive covenant {} in writing.", 5, i, i),
            _ => format!("{}.{}\tThe Borrower shall comply with covenant {} when requested.", 5, i, i),
        })
        .collect();
    (original, revised)
}

fn redline_section(c: &mut Criterion, name: &str, strategy: MatchStrategy) {
    let (original, revised) = section_texts(40);
    let texts: Vec<&str> = original.iter().map(String::as_str).collect();
    let engine = RedlineEngine::new(RedlineConfig {
        match_strategy: strategy,
        ..RedlineConfig::default()
    });

    c.bench_function(name, |b| {
        b.iter(|| {
            let mut doc = Document::from_texts("bench.json", &texts);
            let unit = Unit::new("Section 5", doc.paragraph_ids(), revised.clone());
            engine.redline_unit(&mut doc, black_box(&unit))
        })
    });
}

fn redline_section_greedy(c: &mut Criterion) {
    redline_section(c, "redline_40_paragraphs_greedy", MatchStrategy::Greedy);
}

fn redline_section_optimal(c: &mut Criterion) {
    redline_section(c, "redline_40_paragraphs_optimal", MatchStrategy::Optimal);
}

fn redline_identical_section(c: &mut Criterion) {
    let (original, _) = section_texts(40);
    let texts: Vec<&str> = original.iter().map(String::as_str).collect();
    let engine = RedlineEngine::default();

    c.bench_function("redline_identical_40_paragraphs", |b| {
        b.iter(|| {
            // Alignment only, nothing to mutate
            let mut doc = Document::from_texts("bench.json", &texts);
            let unit = Unit::new("Section 5", doc.paragraph_ids(), original.clone());
            engine.redline_unit(&mut doc, black_box(&unit))
        })
    });
}

criterion_group!(
    benches,
    character_diff,
    paragraph_similarity,
    redline_section_greedy,
    redline_section_optimal,
    redline_identical_section
);
criterion_main!(benches);
