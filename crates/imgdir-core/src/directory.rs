//! Image directory nodes and their subtree aggregates.

use std::path::{Path, PathBuf};

use compact_str::CompactString;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::entry::{DIRECTORY_TYPE, DirectoryEntry, EntryRef};
use crate::file::{ImageFile, file_name};

/// Running sums over every image file in a subtree.
///
/// Computed once when the directory is built; the tree never changes
/// afterwards, so the cached values stay valid.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Totals {
    images: u64,
    size: u64,
    width: u64,
    height: u64,
    compression: f64,
}

impl Totals {
    fn add_file(&mut self, file: &ImageFile) {
        self.images += 1;
        self.size += file.file_size();
        self.width += u64::from(file.width());
        self.height += u64::from(file.height());
        self.compression += file.compression_factor();
    }

    fn add_subtree(&mut self, other: &Totals) {
        self.images += other.images;
        self.size += other.size;
        self.width += other.width;
        self.height += other.height;
        self.compression += other.compression;
    }

    fn mean(&self, sum: u64) -> u32 {
        if self.images == 0 {
            0
        } else {
            u32::try_from(sum / self.images).unwrap_or(u32::MAX)
        }
    }
}

/// A directory holding image files and sub-directories that contain images.
///
/// Children keep filesystem enumeration order. Sub-directories without any
/// image below them are never linked in; only a scan root may be empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageDirectory {
    path: PathBuf,
    name: CompactString,
    dirs: Vec<ImageDirectory>,
    files: Vec<ImageFile>,
    totals: Totals,
}

impl ImageDirectory {
    /// Create a directory node from its already built children.
    pub fn new(path: impl Into<PathBuf>, dirs: Vec<ImageDirectory>, files: Vec<ImageFile>) -> Self {
        let path = path.into();
        let name = file_name(&path);

        let mut totals = Totals::default();
        for dir in &dirs {
            totals.add_subtree(&dir.totals);
        }
        for file in &files {
            totals.add_file(file);
        }

        Self {
            path,
            name,
            dirs,
            files,
            totals,
        }
    }

    /// Create a directory node with no children.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self::new(path, Vec::new(), Vec::new())
    }

    /// Directory name (not full path).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Child directories in enumeration order.
    pub fn directories(&self) -> &[ImageDirectory] {
        &self.dirs
    }

    /// Image files directly inside this directory, in enumeration order.
    pub fn files(&self) -> &[ImageFile] {
        &self.files
    }

    /// All child directories followed by all child files.
    pub fn child_entries(&self) -> Vec<EntryRef<'_>> {
        self.dirs
            .iter()
            .map(EntryRef::Directory)
            .chain(self.files.iter().map(EntryRef::File))
            .collect()
    }

    /// Get the number of direct children.
    pub fn child_count(&self) -> usize {
        self.dirs.len() + self.files.len()
    }

    /// Check if this directory has no children at all.
    pub fn is_empty(&self) -> bool {
        self.child_count() == 0
    }

    /// Number of image files anywhere in this subtree.
    pub fn image_count(&self) -> u64 {
        self.totals.images
    }

    /// Every image file in this subtree, own files before sub-directories.
    pub fn images(&self) -> Images<'_> {
        Images {
            files: self.files.iter(),
            pending: self.dirs.iter().rev().collect(),
        }
    }
}

impl DirectoryEntry for ImageDirectory {
    fn path(&self) -> &Path {
        &self.path
    }

    fn entry_type(&self) -> &'static str {
        DIRECTORY_TYPE
    }

    fn file_size(&self) -> u64 {
        self.totals.size
    }

    fn width(&self) -> u32 {
        self.totals.mean(self.totals.width)
    }

    fn height(&self) -> u32 {
        self.totals.mean(self.totals.height)
    }

    fn compression_factor(&self) -> f64 {
        if self.totals.images == 0 {
            0.0
        } else {
            self.totals.compression / self.totals.images as f64
        }
    }
}

impl Serialize for ImageDirectory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ImageDirectory", 8)?;
        state.serialize_field("path", &self.path)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("type", self.entry_type())?;
        state.serialize_field("file_size", &self.file_size())?;
        state.serialize_field("width", &self.width())?;
        state.serialize_field("height", &self.height())?;
        state.serialize_field("compression_factor", &self.compression_factor())?;
        state.serialize_field("children", &self.child_entries())?;
        state.end()
    }
}

/// Depth-first iterator over the image files of a subtree.
#[derive(Debug)]
pub struct Images<'a> {
    files: std::slice::Iter<'a, ImageFile>,
    pending: Vec<&'a ImageDirectory>,
}

impl<'a> Iterator for Images<'a> {
    type Item = &'a ImageFile;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(file) = self.files.next() {
                return Some(file);
            }
            let dir = self.pending.pop()?;
            self.files = dir.files.iter();
            self.pending.extend(dir.dirs.iter().rev());
        }
    }
}
