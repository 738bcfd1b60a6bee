use crate::config::Config;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use markup_common::{FileSystem, RealFileSystem};
use markup_document::{CommitOutcome, Document};
use markup_redline::{Correction, CorrectionStatus, RedlineEngine};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ReviewArgs {
    /// Document file to correct in place
    pub document: String,

    /// JSON file with the list of corrections
    pub corrections: String,

    /// Author of the tracked changes (overrides config)
    #[arg(short, long)]
    pub author: Option<String>,
}

pub fn review(args: ReviewArgs, cwd: &str) -> Result<()> {
    let fs = RealFileSystem;
    let config = Config::load(&fs, cwd)?;
    let document_path = PathBuf::from(cwd).join(&args.document);
    let corrections_path = PathBuf::from(cwd).join(&args.corrections);

    let corrections: Vec<Correction> = serde_json::from_str(&fs.read_to_string(&corrections_path)?)
        .with_context(|| format!("Invalid corrections file {}", corrections_path.display()))?;

    let mut doc = Document::load(&fs, &document_path)?;
    doc.set_author(args.author.unwrap_or(config.author));

    println!(
        "{}",
        format!("🔍 Applying {} corrections...", corrections.len())
            .bright_blue()
            .bold()
    );

    let nodes = doc.paragraph_ids();
    let engine = RedlineEngine::new(config.redline);
    let report = engine.apply_corrections(&mut doc, &nodes, &corrections);

    for outcome in &report.outcomes {
        match &outcome.status {
            CorrectionStatus::Applied { node, lookup } => {
                println!("  {} {} at {} ({:?})", "✓".green(), outcome.label, node, lookup);
            }
            CorrectionStatus::NoChange(node) => {
                println!("  {} {} already reads as revised at {}", "-".dimmed(), outcome.label, node);
            }
            CorrectionStatus::NotFound => {
                eprintln!("  {} {} - {}", "✗".red(), outcome.label, "target not found".red());
            }
            CorrectionStatus::Failed(reason) => {
                eprintln!("  {} {} - {}", "✗".red(), outcome.label, reason.red());
            }
        }
    }

    if let CommitOutcome::SavedWithoutValidation(issues) = doc.commit(&fs)? {
        println!(
            "  {} saved without validation, {} issues",
            "⚠️".yellow(),
            issues.len()
        );
    }

    println!();
    println!("{} {}", "Corrections:".bold(), report);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_review_corrects_document_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let doc = Document::from_texts(
            dir.path().join("draft.json"),
            &[
                "The Borrower shall deliver financial statements within 90 days.",
                "Governing law is New York.",
            ],
        );
        fs::write(
            dir.path().join("draft.json"),
            serde_json::to_string(&doc.to_file()).unwrap(),
        )
        .unwrap();
        fs::write(
            dir.path().join("corrections.json"),
            r#"[
                { "requirement_id": 1, "draft_section": "6.1", "status": "deviates",
                  "original_text": "within 90 days", "revised_text": "within 120 days" },
                { "requirement_id": 2, "status": "complies",
                  "original_text": "Governing law", "revised_text": "Delaware" }
            ]"#,
        )
        .unwrap();

        let args = ReviewArgs {
            document: "draft.json".to_string(),
            corrections: "corrections.json".to_string(),
            author: None,
        };
        review(args, &dir.path().display().to_string()).unwrap();

        let corrected = Document::load(&RealFileSystem, dir.path().join("draft.json")).unwrap();
        assert_eq!(
            corrected.accept_all(),
            vec![
                "The Borrower shall deliver financial statements within 120 days.",
                "Governing law is New York.",
            ]
        );
        assert_eq!(
            corrected.reject_all()[0],
            "The Borrower shall deliver financial statements within 90 days."
        );
    }
}
