//! Per-directory scan progress.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use imgdir_core::TreeStats;

/// Running totals sent each time a directory has been fully built.
///
/// Directories finish in post-order, so the root is always the last one.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanProgress {
    /// Directory that was just finished.
    pub directory: PathBuf,
    /// Depth of that directory below the root.
    pub depth: u32,
    /// Directories enumerated so far.
    pub dirs_scanned: u64,
    /// Handled images found so far.
    pub images_found: u64,
    /// Bytes of the images found so far.
    pub image_bytes: u64,
    /// Files that turned out not to be handled images.
    pub unhandled_files: u64,
    /// Files and directories that could not be read.
    pub read_errors: u64,
    /// Time since the scan started.
    pub elapsed: Duration,
}

impl ScanProgress {
    /// Check if this update is for the scan root, i.e. the last one.
    pub fn is_root(&self) -> bool {
        self.depth == 0
    }
}

impl fmt::Display for ScanProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} dirs, {} images ({} bytes), {} unreadable: {}",
            self.dirs_scanned,
            self.images_found,
            self.image_bytes,
            self.read_errors,
            self.directory.display()
        )
    }
}

/// Tracks what `TreeStats` does not: timing and image bytes.
#[derive(Debug)]
pub(crate) struct ProgressTracker {
    started: Instant,
    image_bytes: u64,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            image_bytes: 0,
        }
    }

    pub fn record_image(&mut self, size: u64) {
        self.image_bytes += size;
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn finished(&self, stats: &TreeStats, directory: &Path, depth: u32) -> ScanProgress {
        ScanProgress {
            directory: directory.to_path_buf(),
            depth,
            dirs_scanned: stats.dirs_scanned,
            images_found: stats.images_found,
            image_bytes: self.image_bytes,
            unhandled_files: stats.unhandled_files,
            read_errors: stats.read_errors,
            elapsed: self.elapsed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finished_copies_stats() {
        let mut stats = TreeStats::new();
        stats.record_dir(0);
        stats.record_dir(1);
        stats.record_image();
        stats.record_unhandled();

        let mut tracker = ProgressTracker::new();
        tracker.record_image(630);
        let progress = tracker.finished(&stats, Path::new("/photos/2024"), 1);

        assert_eq!(progress.dirs_scanned, 2);
        assert_eq!(progress.images_found, 1);
        assert_eq!(progress.image_bytes, 630);
        assert_eq!(progress.unhandled_files, 1);
        assert!(!progress.is_root());
    }

    #[test]
    fn test_display_line() {
        let progress = ScanProgress {
            directory: PathBuf::from("/photos"),
            depth: 0,
            dirs_scanned: 3,
            images_found: 12,
            image_bytes: 40960,
            unhandled_files: 2,
            read_errors: 1,
            elapsed: Duration::ZERO,
        };

        assert!(progress.is_root());
        assert_eq!(
            progress.to_string(),
            "3 dirs, 12 images (40960 bytes), 1 unreadable: /photos"
        );
    }
}
