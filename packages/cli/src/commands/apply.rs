use crate::config::Config;
use crate::deal::{self, Provision};
use anyhow::{anyhow, Context, Result};
use clap::Args;
use colored::Colorize;
use markup_common::{FileSystem, RealFileSystem};
use markup_document::{render_markup, CommitOutcome, Document, NodeId, RenderOptions};
use markup_redline::{RedlineEngine, RedlineTally, Unit};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ApplyArgs {
    /// Deal directory holding document.json and provisions/
    #[arg(default_value = ".")]
    pub deal: String,

    /// Base name of the output files (overrides config)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Author of the tracked changes (overrides config)
    #[arg(short, long)]
    pub author: Option<String>,
}

pub fn apply(args: ApplyArgs, cwd: &str) -> Result<()> {
    let fs = RealFileSystem;
    let config = Config::load(&fs, cwd)?;
    let deal_dir = PathBuf::from(cwd).join(&args.deal);

    let document_path = deal::document_path(&deal_dir);
    if !fs.exists(&document_path) {
        return Err(anyhow!("No {} found in {}", deal::DOCUMENT_FILE, deal_dir.display()));
    }

    println!("{}", "📝 Applying reviewed provisions...".bright_blue().bold());

    let mut doc = Document::load(&fs, &document_path)?;
    doc.set_author(args.author.unwrap_or(config.author));
    println!("  {} paragraphs", doc.len());

    let provisions = deal::load_provisions(&fs, &deal_dir)?;
    println!("  {} reviewed provisions to apply", provisions.len());

    let units = build_units(&doc, &provisions);
    let engine = RedlineEngine::new(config.redline);
    let (reports, total) = engine.redline_units(&mut doc, &units);

    for report in &reports {
        print_tally(&report.label, &report.tally);
    }

    println!();
    println!("{} {}", "Total:".bold(), total);

    let name = args.output.unwrap_or(config.output);
    let json_path = deal_dir.join(format!("{}.json", name));
    let xml_path = deal_dir.join(format!("{}.xml", name));

    match doc.commit_to(&fs, &json_path)? {
        CommitOutcome::Validated => {
            println!("  {} {}", "✓".green(), json_path.display());
        }
        CommitOutcome::SavedWithoutValidation(issues) => {
            println!(
                "  {} {} (saved without validation, {} issues)",
                "⚠️".yellow(),
                json_path.display(),
                issues.len()
            );
        }
    }

    let markup = render_markup(&doc, &RenderOptions::new(doc.author()));
    fs.write(&xml_path, &markup)
        .with_context(|| format!("Cannot write {}", xml_path.display()))?;
    println!("  {} {}", "✓".green(), xml_path.display());

    if total.is_clean() {
        println!("{} Redline complete", "✅".green());
    } else {
        println!(
            "{} Redline complete, {} edits failed",
            "⚠️".yellow(),
            total.failures.len()
        );
    }

    Ok(())
}

/// One unit per provision whose section is present in the document.
///
/// Ranges are computed once on the loaded document; empty paragraphs are
/// left out of the unit.
pub fn build_units(doc: &Document, provisions: &[Provision]) -> Vec<Unit> {
    let ids = doc.paragraph_ids();
    let texts: Vec<String> = doc.paragraphs().map(|p| p.text()).collect();
    let boundaries = deal::section_boundaries(&texts);

    let mut units = Vec::new();
    for provision in provisions {
        let Some(range) = deal::section_range(&provision.section_number, &boundaries, texts.len()) else {
            println!(
                "  {} Section {} not found in document",
                "SKIP".yellow(),
                provision.section_number
            );
            continue;
        };

        let nodes: Vec<NodeId> = range
            .filter(|i| !texts[*i].trim().is_empty())
            .map(|i| ids[i])
            .collect();
        tracing::debug!(
            "{} from {}: {} paragraphs, {} revised lines",
            provision.label(),
            provision.folder,
            nodes.len(),
            provision.revised.len()
        );
        units.push(Unit::new(provision.label(), nodes, provision.revised.clone()));
    }
    units
}

fn print_tally(label: &str, tally: &RedlineTally) {
    let marker = if tally.is_clean() { "✓".green() } else { "✗".red() };
    println!("  {} {} - {}", marker, label, tally);
    for failure in &tally.failures {
        eprintln!(
            "      {} {}: {} [{}]",
            failure.kind.to_string().red(),
            failure.reason,
            failure.preview.dimmed(),
            failure.unit
        );
    }
}
