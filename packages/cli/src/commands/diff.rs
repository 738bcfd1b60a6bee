use crate::config::Config;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use markup_common::{FileSystem, RealFileSystem};
use markup_redline::{redline_lines, DiffSpan, LineChange};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct DiffArgs {
    /// Original text file
    pub old: String,

    /// Revised text file
    pub new: String,

    /// Print with [-deleted-] and {+inserted+} markers instead of colors
    #[arg(long)]
    pub plain: bool,
}

pub fn diff(args: DiffArgs, cwd: &str) -> Result<()> {
    let fs = RealFileSystem;
    let config = Config::load(&fs, cwd)?;
    let old = read_lines(&fs, cwd, &args.old)?;
    let new = read_lines(&fs, cwd, &args.new)?;

    let changes = redline_lines(&old, &new, config.redline.line_match_threshold);
    tracing::debug!(
        "{} of {} lines changed",
        changes.iter().filter(|c| c.is_change()).count(),
        changes.len()
    );

    if args.plain {
        print!("{}", markup_redline::render(&changes));
    } else {
        for change in &changes {
            println!("{}", colorize(change));
        }
    }
    Ok(())
}

fn read_lines(fs: &dyn FileSystem, cwd: &str, path: &str) -> Result<Vec<String>> {
    let path = PathBuf::from(cwd).join(path);
    let text = fs
        .read_to_string(&path)
        .with_context(|| format!("Cannot read {}", path.display()))?;
    Ok(text.lines().map(str::to_string).collect())
}

fn colorize(change: &LineChange) -> String {
    match change {
        LineChange::Same(line) => line.clone(),
        LineChange::Removed(line) => line.red().strikethrough().to_string(),
        LineChange::Added(line) => line.green().underline().to_string(),
        LineChange::Modified(spans) => spans
            .iter()
            .map(|span| match span {
                DiffSpan::Unchanged(text) => text.clone(),
                DiffSpan::Deleted(text) => text.red().strikethrough().to_string(),
                DiffSpan::Inserted(text) => text.green().underline().to_string(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colorize_without_terminal_colors() {
        colored::control::set_override(false);
        let change = LineChange::Modified(vec![
            DiffSpan::Unchanged("Fee is ".to_string()),
            DiffSpan::Deleted("5".to_string()),
            DiffSpan::Inserted("6".to_string()),
        ]);
        assert_eq!(colorize(&change), "Fee is 56");
        assert_eq!(colorize(&LineChange::Same("Title".to_string())), "Title");
    }

    #[test]
    fn test_diff_reads_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("old.txt"), "Title\nFee is 5%.\n").unwrap();
        std::fs::write(dir.path().join("new.txt"), "Title\nFee is 6%.\n").unwrap();
        let cwd = dir.path().display().to_string();

        assert_eq!(
            read_lines(&RealFileSystem, &cwd, "old.txt").unwrap(),
            vec!["Title", "Fee is 5%."]
        );

        let args = DiffArgs {
            old: "old.txt".to_string(),
            new: "new.txt".to_string(),
            plain: true,
        };
        assert!(diff(args, &cwd).is_ok());

        let missing = DiffArgs {
            old: "absent.txt".to_string(),
            new: "new.txt".to_string(),
            plain: false,
        };
        assert!(diff(missing, &cwd).is_err());
    }
}
