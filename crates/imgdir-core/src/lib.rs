//! Core types and traits for imgdir.
//!
//! This crate provides the directory-entry model used throughout imgdir:
//! image file leaves, image directory nodes that aggregate over their
//! subtree, the probe seam used to classify files, and the diagnostics
//! sink the scanner reports through.

mod config;
mod diagnostics;
mod directory;
mod entry;
mod error;
mod file;
mod probe;
mod tree;

pub use config::{ScanConfig, ScanConfigBuilder};
pub use diagnostics::{CollectingSink, DiagnosticSink, TracingSink};
pub use directory::{ImageDirectory, Images};
pub use entry::{DIRECTORY_TYPE, DirectoryEntry, EntryRef, ImageFormat};
pub use error::{EntryError, ScanError, ScanWarning, Severity, WarningKind};
pub use file::ImageFile;
pub use probe::{ImageProbe, ProbeResult};
pub use tree::{ImageTree, TreeStats};
