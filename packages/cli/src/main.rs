mod commands;
mod config;
mod deal;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{apply, diff, review, ApplyArgs, DiffArgs, ReviewArgs};
use tracing_subscriber::EnvFilter;

/// Markup CLI - tracked-change redlines for legal documents
#[derive(Parser, Debug)]
#[command(name = "markup")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Show debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Redline reviewed provisions of a deal into its document
    Apply(ApplyArgs),

    /// Apply a corrections file to a document
    Review(ReviewArgs),

    /// Redline two plain text files
    Diff(DiffArgs),
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let cwd = match std::env::current_dir() {
        Ok(dir) => dir.display().to_string(),
        Err(err) => {
            eprintln!("{} Cannot get current directory: {}", "Error:".red().bold(), err);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Command::Apply(args) => apply(args, &cwd),
        Command::Review(args) => review(args, &cwd),
        Command::Diff(args) => diff(args, &cwd),
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
