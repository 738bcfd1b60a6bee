//! Deal workspace layout.
//!
//! ```text
//! DEAL_DIR/
//!   document.json
//!   provisions/
//!     <folder>/manifest.json
//!     <folder>/revised.txt
//! ```

use anyhow::{Context, Result};
use markup_common::FileSystem;
use markup_redline::normalize;
use regex::Regex;
use serde::Deserialize;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use walkdir::WalkDir;

pub const DOCUMENT_FILE: &str = "document.json";
pub const PROVISIONS_DIR: &str = "provisions";

const REVIEWED: &str = "reviewed";
const FULL_AGREEMENT: &str = "full_agreement";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub section_number: String,
    #[serde(default)]
    pub title: String,
}

/// A reviewed provision ready to be redlined into the document
#[derive(Debug, Clone)]
pub struct Provision {
    pub folder: String,
    pub section_number: String,
    pub title: String,
    pub revised: Vec<String>,
}

impl Provision {
    pub fn label(&self) -> String {
        format!("{} (Section {})", self.title, self.section_number)
    }
}

/// Reviewed provisions of a deal, in folder name order
pub fn load_provisions(fs: &dyn FileSystem, deal_dir: &Path) -> Result<Vec<Provision>> {
    let dir = deal_dir.join(PROVISIONS_DIR);
    if !dir.is_dir() {
        anyhow::bail!("No {}/ directory found in {}", PROVISIONS_DIR, deal_dir.display());
    }

    let mut provisions = Vec::new();
    for entry in WalkDir::new(&dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_dir())
    {
        let folder = entry.file_name().to_string_lossy().to_string();
        if let Some(provision) = load_provision(fs, entry.path(), &folder)? {
            provisions.push(provision);
        }
    }
    Ok(provisions)
}

/// The provision stored in `path`, if it has been reviewed
pub fn load_provision(fs: &dyn FileSystem, path: &Path, folder: &str) -> Result<Option<Provision>> {
    let manifest_path = path.join("manifest.json");
    let revised_path = path.join("revised.txt");
    if !fs.exists(&manifest_path) || !fs.exists(&revised_path) {
        return Ok(None);
    }

    let manifest: Manifest = serde_json::from_str(&fs.read_to_string(&manifest_path)?)
        .with_context(|| format!("Invalid manifest {}", manifest_path.display()))?;
    if manifest.status != REVIEWED || folder.contains(FULL_AGREEMENT) {
        tracing::debug!("Skipping provision {} ({})", folder, manifest.status);
        return Ok(None);
    }

    let revised = revised_lines(&fs.read_to_string(&revised_path)?);
    Ok(Some(Provision {
        folder: folder.to_string(),
        section_number: manifest.section_number,
        title: manifest.title,
        revised,
    }))
}

fn marker_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\s*\[(REVISED|NOTE|COMMENT|RECOMMENDATION):.*\]").expect("valid marker pattern")
    })
}

fn header_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(\d+)\.\s+[A-Z]").expect("valid header pattern"))
}

/// Remove reviewer commentary markers from a revised line
pub fn strip_markers(line: &str) -> String {
    marker_pattern().replace_all(line, "").into_owned()
}

/// Non-blank lines of a revised provision with commentary stripped
pub fn revised_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(strip_markers)
        .filter(|line| !line.trim().is_empty())
        .collect()
}

/// Top-level section headers as (section number, paragraph index), in
/// document order; only the first header of each number counts
pub fn section_boundaries<S: AsRef<str>>(texts: &[S]) -> Vec<(String, usize)> {
    let mut boundaries: Vec<(String, usize)> = Vec::new();
    for (index, text) in texts.iter().enumerate() {
        let key = normalize(text.as_ref());
        let Some(caps) = header_pattern().captures(&key) else {
            continue;
        };
        let number = &caps[1];
        if boundaries.iter().all(|(n, _)| n != number) {
            boundaries.push((number.to_string(), index));
        }
    }
    boundaries
}

/// Paragraph range of `section`: from its header up to the next header
pub fn section_range(section: &str, boundaries: &[(String, usize)], total: usize) -> Option<Range<usize>> {
    let start = boundaries.iter().find(|(n, _)| n == section)?.1;
    let end = boundaries
        .iter()
        .map(|(_, index)| *index)
        .filter(|index| *index > start)
        .min()
        .unwrap_or(total);
    Some(start..end)
}

pub fn document_path(deal_dir: &Path) -> PathBuf {
    deal_dir.join(DOCUMENT_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use markup_common::{MockFileSystem, RealFileSystem};
    use std::fs;

    fn write_provision(root: &Path, folder: &str, status: &str, section: &str, revised: &str) {
        let dir = root.join(PROVISIONS_DIR).join(folder);
        fs::create_dir_all(&dir).unwrap();
        let manifest = format!(
            r#"{{ "status": "{}", "section_number": "{}", "title": "Title {}" }}"#,
            status, section, section
        );
        fs::write(dir.join("manifest.json"), manifest).unwrap();
        fs::write(dir.join("revised.txt"), revised).unwrap();
    }

    #[test]
    fn test_strip_markers() {
        assert_eq!(
            strip_markers("Fees are 6%. [REVISED: lowered from $[X] to 6%]"),
            "Fees are 6%."
        );
        assert_eq!(strip_markers("No markers [here]."), "No markers [here].");
        assert_eq!(
            revised_lines("1.\tFEES\n\n   \nFees are 6%. [NOTE: check]\n"),
            vec!["1.\tFEES", "Fees are 6%."]
        );
    }

    #[test]
    fn test_section_boundaries_and_ranges() {
        let texts = [
            "Preamble",
            "1.\tDEFINITIONS",
            "\"Agreement\" means this agreement.",
            "2. LOANS",
            "2.1\tThe Lender shall lend.",
            "1. Duplicate header is ignored",
            "3.\tmiscellaneous in lower case is not a header",
        ];

        let boundaries = section_boundaries(&texts);
        assert_eq!(boundaries, vec![("1".to_string(), 1), ("2".to_string(), 3)]);
        assert_eq!(section_range("1", &boundaries, texts.len()), Some(1..3));
        assert_eq!(section_range("2", &boundaries, texts.len()), Some(3..7));
        assert_eq!(section_range("9", &boundaries, texts.len()), None);
    }

    #[test]
    fn test_load_only_reviewed_provisions() {
        let dir = tempfile::tempdir().unwrap();
        write_provision(dir.path(), "02_loans", "reviewed", "2", "2.\tLOANS\nThe Lender shall lend.\n");
        write_provision(dir.path(), "01_definitions", "reviewed", "1", "1.\tDEFINITIONS\n");
        write_provision(dir.path(), "03_pending", "draft", "3", "3.\tTERM\n");
        write_provision(dir.path(), "99_full_agreement", "reviewed", "0", "Everything\n");

        let provisions = load_provisions(&RealFileSystem, dir.path()).unwrap();

        let folders: Vec<&str> = provisions.iter().map(|p| p.folder.as_str()).collect();
        assert_eq!(folders, vec!["01_definitions", "02_loans"]);
        assert_eq!(provisions[1].revised, vec!["2.\tLOANS", "The Lender shall lend."]);
        assert_eq!(provisions[1].label(), "Title 2 (Section 2)");
    }

    #[test]
    fn test_missing_provisions_dir_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_provisions(&RealFileSystem, dir.path()).is_err());
    }

    #[test]
    fn test_load_provision_from_mock_file_system() {
        let fs = MockFileSystem::new();
        let reviewed = Path::new("/deal/provisions/04_fees");
        fs.add_file(
            reviewed.join("manifest.json"),
            r#"{ "status": "reviewed", "section_number": "4", "title": "Fees" }"#,
        );
        fs.add_file(reviewed.join("revised.txt"), "4.\tFEES\nFees are 6%. [REVISED: lowered]\n");

        let provision = load_provision(&fs, reviewed, "04_fees").unwrap().unwrap();
        assert_eq!(provision.label(), "Fees (Section 4)");
        assert_eq!(provision.revised, vec!["4.\tFEES", "Fees are 6%."]);

        let manifest_only = Path::new("/deal/provisions/05_term");
        fs.add_file(manifest_only.join("manifest.json"), r#"{ "status": "reviewed" }"#);
        assert!(load_provision(&fs, manifest_only, "05_term").unwrap().is_none());

        let broken = Path::new("/deal/provisions/06_broken");
        fs.add_file(broken.join("manifest.json"), "not json");
        fs.add_file(broken.join("revised.txt"), "6.\tBROKEN\n");
        assert!(load_provision(&fs, broken, "06_broken").is_err());
    }
}
