//! imgdir - Inventory the GIF and JPEG images in directory trees.
//!
//! Usage:
//!   imgdir <DIR>...                    Print per-entry metadata for each tree
//!   imgdir --ignore 'thumbs*' <DIR>    Skip entries by name
//!   imgdir --progress <DIR>            Report finished directories on stderr
//!   imgdir --help                      Show help
//!
//! Scan notes go to stderr; set `RUST_LOG=debug` to see skipped files.

mod report;

use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::thread;

use clap::Parser;
use color_eyre::eyre::{Context, Result};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing_subscriber::EnvFilter;

use imgdir_scan::{ImageScanner, ScanConfig, ScanProgress};

#[derive(Parser)]
#[command(
    name = "imgdir",
    version,
    about = "Inventory image files in directory trees",
    long_about = "imgdir walks each given directory, recognizes GIF and JPEG files by \
                  their content, and prints size, dimensions and estimated compression \
                  for every image and every directory that contains images."
)]
struct Cli {
    /// Directories to inventory
    #[arg(value_name = "DIR")]
    paths: Vec<PathBuf>,

    /// Skip hidden entries (names starting with '.')
    #[arg(long)]
    no_hidden: bool,

    /// Skip entries by name: exact, 'prefix*' or '*suffix' (repeatable)
    #[arg(short, long = "ignore", value_name = "PATTERN")]
    ignore: Vec<String>,

    /// Skip symbolic links instead of resolving them
    #[arg(long)]
    no_follow: bool,

    /// Print a line on stderr as each directory finishes
    #[arg(short, long)]
    progress: bool,
}

impl Cli {
    fn scan_config(&self, root: &Path) -> Result<ScanConfig> {
        ScanConfig::builder()
            .root(root)
            .include_hidden(!self.no_hidden)
            .ignore_patterns(self.ignore.clone())
            .follow_symlinks(!self.no_follow)
            .build()
            .wrap_err_with(|| format!("Invalid scan options for {}", root.display()))
    }
}

fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    init_tracing();

    let cli = Cli::parse();

    if cli.paths.is_empty() {
        eprintln!("No source directory specified.");
        return Ok(ExitCode::FAILURE);
    }

    let scanner = ImageScanner::new();
    let progress = cli.progress.then(|| spawn_progress(scanner.subscribe()));

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut failed = false;

    for path in &cli.paths {
        let config = cli.scan_config(path)?;
        match scanner.scan(&config) {
            Ok(tree) => {
                report::write_tree(&mut out, &tree.root)
                    .wrap_err_with(|| format!("Failed to write report for {}", path.display()))?;
                if tree.has_warnings() {
                    tracing::warn!(
                        root = %path.display(),
                        count = tree.warnings.len(),
                        "entries skipped during scan"
                    );
                }
            }
            Err(err) => {
                // Report and continue with the remaining paths.
                out.flush().wrap_err("Failed to flush report")?;
                eprintln!("Error: {err}");
                failed = true;
            }
        }
    }

    out.flush().wrap_err("Failed to flush report")?;

    // Dropping the scanner closes the channel and ends the progress thread.
    drop(scanner);
    if let Some(handle) = progress {
        let _ = handle.join();
    }

    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// Print each progress update on stderr until the scanner is dropped.
fn spawn_progress(mut rx: broadcast::Receiver<ScanProgress>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        loop {
            match rx.blocking_recv() {
                Ok(update) => eprintln!("{update}"),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "progress updates dropped");
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}

/// Send tracing output to stderr, filtered by `RUST_LOG` (default `warn`).
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let cli = Cli::try_parse_from(["imgdir", "/photos"]).unwrap();
        let config = cli.scan_config(&cli.paths[0]).unwrap();

        assert_eq!(config.root, PathBuf::from("/photos"));
        assert!(config.follow_symlinks);
        assert!(config.include_hidden);
        assert!(config.ignore_patterns.is_empty());
        assert!(!cli.progress);
    }

    #[test]
    fn test_filter_options_reach_config() {
        let cli = Cli::try_parse_from([
            "imgdir",
            "--no-hidden",
            "--no-follow",
            "-i",
            "thumbs*",
            "--ignore",
            "*.part",
            "--progress",
            "/a",
            "/b",
        ])
        .unwrap();
        let config = cli.scan_config(&cli.paths[1]).unwrap();

        assert_eq!(config.root, PathBuf::from("/b"));
        assert!(!config.follow_symlinks);
        assert!(config.should_skip(".cache"));
        assert!(config.should_skip("thumbs-small"));
        assert!(config.should_skip("upload.part"));
        assert!(!config.should_skip("holiday"));
        assert!(cli.progress);
    }

    #[test]
    fn test_no_paths_parses() {
        let cli = Cli::try_parse_from(["imgdir"]).unwrap();
        assert!(cli.paths.is_empty());
    }
}
