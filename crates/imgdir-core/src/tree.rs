//! Scanned image tree container and statistics.

use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

use crate::config::ScanConfig;
use crate::directory::ImageDirectory;
use crate::entry::DirectoryEntry;
use crate::error::ScanWarning;

/// Counters collected while building a tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeStats {
    /// Directories enumerated, including pruned and unreadable ones.
    pub dirs_scanned: u64,
    /// Regular files handed to the probe.
    pub files_probed: u64,
    /// Files recognized as handled images.
    pub images_found: u64,
    /// Files the probe did not recognize.
    pub unhandled_files: u64,
    /// Files or directories that could not be read.
    pub read_errors: u64,
    /// Deepest directory level entered (root is 0).
    pub max_depth: u32,
}

impl TreeStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an enumerated directory.
    pub fn record_dir(&mut self, depth: u32) {
        self.dirs_scanned += 1;
        self.max_depth = self.max_depth.max(depth);
    }

    /// Record a recognized image.
    pub fn record_image(&mut self) {
        self.files_probed += 1;
        self.images_found += 1;
    }

    /// Record a probed file that is not a handled image.
    pub fn record_unhandled(&mut self) {
        self.files_probed += 1;
        self.unhandled_files += 1;
    }

    /// Record a read failure. Files count as probed.
    pub fn record_read_error(&mut self, is_file: bool) {
        if is_file {
            self.files_probed += 1;
        }
        self.read_errors += 1;
    }
}

/// Complete scanned image tree with metadata.
#[derive(Debug, Clone, Serialize)]
pub struct ImageTree {
    /// Root directory; present even when it holds no images.
    pub root: ImageDirectory,

    /// Root path that was scanned.
    pub root_path: PathBuf,

    /// When this scan was performed.
    pub scanned_at: SystemTime,

    /// Duration of the scan.
    pub scan_duration: Duration,

    /// Scan configuration used.
    pub config: ScanConfig,

    /// Summary statistics.
    pub stats: TreeStats,

    /// Warn and error notes encountered during scan.
    pub warnings: Vec<ScanWarning>,
}

impl ImageTree {
    /// Create a new image tree.
    pub fn new(
        root: ImageDirectory,
        root_path: PathBuf,
        config: ScanConfig,
        stats: TreeStats,
        scan_duration: Duration,
        warnings: Vec<ScanWarning>,
    ) -> Self {
        Self {
            root,
            root_path,
            scanned_at: SystemTime::now(),
            scan_duration,
            config,
            stats,
            warnings,
        }
    }

    /// Get the total size of all images in the tree.
    pub fn total_size(&self) -> u64 {
        self.root.file_size()
    }

    /// Get the number of images in the tree.
    pub fn total_images(&self) -> u64 {
        self.root.image_count()
    }

    /// Check if there were any warnings during scanning.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
