//! Depth-first image directory scanner.

use std::fs;
use std::path::{Path, PathBuf};

use tokio::sync::broadcast;

use imgdir_core::{
    DiagnosticSink, DirectoryEntry, EntryError, ImageDirectory, ImageFile, ImageProbe, ImageTree,
    ScanConfig, ScanError, ScanWarning, Severity, TracingSink, TreeStats, WarningKind,
};

use crate::probe::DecoderProbe;
use crate::progress::{ProgressTracker, ScanProgress};

/// Builds image trees by walking directories one at a time.
///
/// Each directory is fully enumerated and every file in it probed before
/// the directory node is created. Nothing runs concurrently.
pub struct ImageScanner<P = DecoderProbe> {
    probe: P,
    progress_tx: broadcast::Sender<ScanProgress>,
}

impl ImageScanner<DecoderProbe> {
    /// Create a scanner using the `image` crate decoders.
    pub fn new() -> Self {
        Self::with_probe(DecoderProbe::new())
    }
}

impl<P: ImageProbe> ImageScanner<P> {
    /// Create a scanner with a custom probe.
    pub fn with_probe(probe: P) -> Self {
        let (progress_tx, _) = broadcast::channel(100);
        Self { probe, progress_tx }
    }

    /// Subscribe to scan progress updates, sent once per finished directory.
    pub fn subscribe(&self) -> broadcast::Receiver<ScanProgress> {
        self.progress_tx.subscribe()
    }

    /// Scan `config.root`, reporting notes through `tracing`.
    pub fn scan(&self, config: &ScanConfig) -> Result<ImageTree, ScanError> {
        self.scan_with_sink(config, &mut TracingSink)
    }

    /// Scan `config.root`, reporting notes to `sink`.
    ///
    /// Fails only if the root itself is missing or not a directory. Every
    /// failure below the root is recorded and the entry skipped.
    pub fn scan_with_sink<S: DiagnosticSink + ?Sized>(
        &self,
        config: &ScanConfig,
        sink: &mut S,
    ) -> Result<ImageTree, ScanError> {
        let root_path = config.root.clone();
        let metadata = fs::metadata(&root_path).map_err(|e| ScanError::io(&root_path, e))?;
        if !metadata.is_dir() {
            return Err(ScanError::NotADirectory { path: root_path });
        }

        let mut walk = Walk {
            config,
            probe: &self.probe,
            sink,
            progress_tx: &self.progress_tx,
            tracker: ProgressTracker::new(),
            stats: TreeStats::new(),
            warnings: Vec::new(),
            ancestors: Vec::new(),
        };

        let root = walk.build_directory(&root_path, 0);
        let scan_duration = walk.tracker.elapsed();

        tracing::debug!(
            root = %root_path.display(),
            images = walk.stats.images_found,
            dirs = walk.stats.dirs_scanned,
            "scan finished"
        );

        Ok(ImageTree::new(
            root,
            root_path,
            config.clone(),
            walk.stats,
            scan_duration,
            walk.warnings,
        ))
    }
}

impl Default for ImageScanner<DecoderProbe> {
    fn default() -> Self {
        Self::new()
    }
}

/// State of one scan call.
struct Walk<'a, P, S: ?Sized> {
    config: &'a ScanConfig,
    probe: &'a P,
    sink: &'a mut S,
    progress_tx: &'a broadcast::Sender<ScanProgress>,
    tracker: ProgressTracker,
    stats: TreeStats,
    warnings: Vec<ScanWarning>,
    /// Canonical paths of the directories currently being built, root first.
    /// Only maintained when following symlinks.
    ancestors: Vec<PathBuf>,
}

/// What a directory child turned out to be.
enum ChildKind {
    Directory,
    File,
    Skip,
}

impl<P: ImageProbe, S: DiagnosticSink + ?Sized> Walk<'_, P, S> {
    fn note(&mut self, warning: ScanWarning) {
        if warning.severity >= Severity::Warn {
            self.warnings.push(warning.clone());
        }
        self.sink.record(warning);
    }

    /// Build a directory node; never fails, an unreadable directory is childless.
    fn build_directory(&mut self, path: &Path, depth: u32) -> ImageDirectory {
        self.stats.record_dir(depth);

        let tracked = self.config.follow_symlinks && self.enter(path);
        let node = self.read_children(path, depth);
        if tracked {
            self.ancestors.pop();
        }

        // No subscribers is not an error.
        let _ = self
            .progress_tx
            .send(self.tracker.finished(&self.stats, path, depth));

        node
    }

    /// Push `path` onto the ancestor chain. Returns false if it could not be
    /// resolved.
    fn enter(&mut self, path: &Path) -> bool {
        match fs::canonicalize(path) {
            Ok(canonical) => {
                self.ancestors.push(canonical);
                true
            }
            Err(_) => false,
        }
    }

    /// Check if `path` resolves to a directory already being built.
    fn is_cycle(&self, path: &Path) -> bool {
        fs::canonicalize(path)
            .map(|canonical| self.ancestors.contains(&canonical))
            .unwrap_or(false)
    }

    fn read_children(&mut self, path: &Path, depth: u32) -> ImageDirectory {
        let entries = match fs::read_dir(path) {
            Ok(entries) => entries,
            Err(err) => {
                self.stats.record_read_error(false);
                self.note(ScanWarning::unreadable_directory(path, &err));
                return ImageDirectory::empty(path);
            }
        };

        let mut dirs = Vec::new();
        let mut files = Vec::new();

        for entry_result in entries {
            let entry = match entry_result {
                Ok(e) => e,
                Err(err) => {
                    self.stats.record_read_error(false);
                    self.note(ScanWarning::read_error(path, &err));
                    continue;
                }
            };

            let child_path = entry.path();
            tracing::trace!(path = %child_path.display(), "processing entry");

            if self.config.should_skip(&entry.file_name().to_string_lossy()) {
                continue;
            }

            match self.classify(&entry) {
                ChildKind::Directory => {
                    if self.config.follow_symlinks && self.is_cycle(&child_path) {
                        self.note(ScanWarning::symlink_cycle(&child_path));
                        continue;
                    }
                    let child = self.build_directory(&child_path, depth + 1);
                    // Only directories with images somewhere below are linked in.
                    if !child.is_empty() {
                        dirs.push(child);
                    }
                }
                ChildKind::File => {
                    if let Some(file) = self.probe_file(&child_path) {
                        files.push(file);
                    }
                }
                ChildKind::Skip => {}
            }
        }

        ImageDirectory::new(path, dirs, files)
    }

    fn classify(&mut self, entry: &fs::DirEntry) -> ChildKind {
        let file_type = match entry.file_type() {
            Ok(t) => t,
            Err(err) => {
                self.note(ScanWarning::new(
                    entry.path(),
                    err.to_string(),
                    WarningKind::MetadataError,
                    Severity::Error,
                ));
                return ChildKind::Skip;
            }
        };

        let file_type = if file_type.is_symlink() {
            if !self.config.follow_symlinks {
                return ChildKind::Skip;
            }
            // Dangling links resolve to nothing and are skipped silently.
            match fs::metadata(entry.path()) {
                Ok(target) => target.file_type(),
                Err(_) => return ChildKind::Skip,
            }
        } else {
            file_type
        };

        if file_type.is_dir() {
            ChildKind::Directory
        } else if file_type.is_file() {
            ChildKind::File
        } else {
            ChildKind::Skip
        }
    }

    fn probe_file(&mut self, path: &Path) -> Option<ImageFile> {
        match ImageFile::probe(path, self.probe) {
            Ok(file) => {
                self.stats.record_image();
                self.tracker.record_image(file.file_size());
                if file.has_zero_area() {
                    self.note(ScanWarning::zero_area(path, file.width(), file.height()));
                }
                tracing::trace!(path = %path.display(), "registered image");
                Some(file)
            }
            Err(err) => {
                match err {
                    EntryError::UnhandledFormat { .. } => self.stats.record_unhandled(),
                    EntryError::Io { .. } => self.stats.record_read_error(true),
                }
                self.note(ScanWarning::from_entry_error(&err));
                None
            }
        }
    }
}
