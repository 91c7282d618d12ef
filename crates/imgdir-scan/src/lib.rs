//! Image probing and tree building for imgdir.
//!
//! This crate walks a directory tree depth-first, classifies every regular
//! file with an [`ImageProbe`], and assembles the
//! [`ImageDirectory`]/[`ImageFile`] tree defined in `imgdir-core`.
//!
//! # Overview
//!
//! - **Decoder-backed probing** via the `image` crate, reading headers only
//! - **Pruning** of sub-directories with no images below them
//! - **Injected diagnostics**: every skipped file or unreadable directory is
//!   reported to a [`DiagnosticSink`]
//! - **Progress updates** via a broadcast channel
//!
//! # Example
//!
//! ```rust,no_run
//! use imgdir_scan::{DirectoryEntry, ImageScanner, ScanConfig};
//!
//! let config = ScanConfig::new("/path/to/photos");
//! let scanner = ImageScanner::new();
//! let tree = scanner.scan(&config).unwrap();
//!
//! println!("{} images, {} bytes", tree.total_images(), tree.total_size());
//! println!("average width: {}", tree.root.width());
//! ```
//!
//! # Collecting notes
//!
//! ```rust,no_run
//! use imgdir_scan::{CollectingSink, ImageScanner, ScanConfig, Severity};
//!
//! let mut sink = CollectingSink::new();
//! let tree = ImageScanner::new()
//!     .scan_with_sink(&ScanConfig::new("/path/to/photos"), &mut sink)
//!     .unwrap();
//!
//! for note in sink.at_least(Severity::Error) {
//!     eprintln!("{}", note.message);
//! }
//! # let _ = tree;
//! ```

mod probe;
mod progress;
mod scanner;

pub use probe::DecoderProbe;
pub use progress::ScanProgress;
pub use scanner::ImageScanner;

// Re-export core types for convenience
pub use imgdir_core::{
    CollectingSink, DiagnosticSink, DirectoryEntry, EntryError, EntryRef, ImageDirectory,
    ImageFile, ImageFormat, ImageProbe, ImageTree, ProbeResult, ScanConfig, ScanError,
    ScanWarning, Severity, TracingSink, TreeStats, WarningKind,
};
