//! The directory-entry contract shared by files and directories.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize, Serializer};

use crate::directory::ImageDirectory;
use crate::file::ImageFile;

/// Type label reported by every directory node.
pub const DIRECTORY_TYPE: &str = "directory";

/// Image formats this crate knows how to estimate compression for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ImageFormat {
    /// Graphics Interchange Format.
    Gif,
    /// JPEG/JFIF.
    Jpeg,
}

impl ImageFormat {
    /// Every handled format.
    pub const ALL: [ImageFormat; 2] = [ImageFormat::Gif, ImageFormat::Jpeg];

    /// Upper-case format name.
    pub fn name(self) -> &'static str {
        match self {
            ImageFormat::Gif => "GIF",
            ImageFormat::Jpeg => "JPEG",
        }
    }

    /// Look up a format by decoder-reported name, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|format| format.name().eq_ignore_ascii_case(name.trim()))
    }

    /// Type label of an entry holding this format, e.g. `JPEG-image`.
    pub fn type_label(self) -> &'static str {
        match self {
            ImageFormat::Gif => "GIF-image",
            ImageFormat::Jpeg => "JPEG-image",
        }
    }

    /// Assumed raw bytes per pixel when estimating compression.
    pub fn bytes_per_pixel(self) -> u64 {
        match self {
            ImageFormat::Gif => 1,
            ImageFormat::Jpeg => 3,
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Metadata every node of an image tree exposes.
///
/// Files report their own values. Directories aggregate over every image
/// file in their subtree: sizes are summed, dimensions and compression
/// factors are averaged.
pub trait DirectoryEntry {
    /// Filesystem path of this entry.
    fn path(&self) -> &Path;

    /// `"directory"` or `"<FORMAT>-image"`.
    fn entry_type(&self) -> &'static str;

    /// Size in bytes (aggregate for directories).
    fn file_size(&self) -> u64;

    /// Width in pixels (truncated mean for directories).
    fn width(&self) -> u32;

    /// Height in pixels (truncated mean for directories).
    fn height(&self) -> u32;

    /// Estimated ratio of stored bytes to raw pixel bytes.
    fn compression_factor(&self) -> f64;
}

/// Borrowed view of a child entry, in the order a directory lists them.
#[derive(Debug, Clone, Copy)]
pub enum EntryRef<'a> {
    /// A sub-directory containing at least one image somewhere below it.
    Directory(&'a ImageDirectory),
    /// A recognized image file.
    File(&'a ImageFile),
}

impl<'a> EntryRef<'a> {
    /// Check if this entry is a directory.
    pub fn is_dir(&self) -> bool {
        matches!(self, EntryRef::Directory(_))
    }

    /// Check if this entry is an image file.
    pub fn is_file(&self) -> bool {
        matches!(self, EntryRef::File(_))
    }

    /// Get the directory, if this entry is one.
    pub fn as_directory(&self) -> Option<&'a ImageDirectory> {
        match *self {
            EntryRef::Directory(dir) => Some(dir),
            EntryRef::File(_) => None,
        }
    }

    /// Get the image file, if this entry is one.
    pub fn as_file(&self) -> Option<&'a ImageFile> {
        match *self {
            EntryRef::File(file) => Some(file),
            EntryRef::Directory(_) => None,
        }
    }
}

impl DirectoryEntry for EntryRef<'_> {
    fn path(&self) -> &Path {
        match self {
            EntryRef::Directory(dir) => dir.path(),
            EntryRef::File(file) => file.path(),
        }
    }

    fn entry_type(&self) -> &'static str {
        match self {
            EntryRef::Directory(dir) => dir.entry_type(),
            EntryRef::File(file) => file.entry_type(),
        }
    }

    fn file_size(&self) -> u64 {
        match self {
            EntryRef::Directory(dir) => dir.file_size(),
            EntryRef::File(file) => file.file_size(),
        }
    }

    fn width(&self) -> u32 {
        match self {
            EntryRef::Directory(dir) => dir.width(),
            EntryRef::File(file) => file.width(),
        }
    }

    fn height(&self) -> u32 {
        match self {
            EntryRef::Directory(dir) => dir.height(),
            EntryRef::File(file) => file.height(),
        }
    }

    fn compression_factor(&self) -> f64 {
        match self {
            EntryRef::Directory(dir) => dir.compression_factor(),
            EntryRef::File(file) => file.compression_factor(),
        }
    }
}

impl Serialize for EntryRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            EntryRef::Directory(dir) => dir.serialize(serializer),
            EntryRef::File(file) => file.serialize(serializer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_name_ignores_case() {
        assert_eq!(ImageFormat::from_name("jpeg"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_name("Gif"), Some(ImageFormat::Gif));
        assert_eq!(ImageFormat::from_name("png"), None);
        assert_eq!(ImageFormat::from_name(""), None);
    }

    #[test]
    fn test_format_labels() {
        assert_eq!(ImageFormat::Jpeg.type_label(), "JPEG-image");
        assert_eq!(ImageFormat::Gif.type_label(), "GIF-image");
        assert_eq!(ImageFormat::Jpeg.to_string(), "JPEG");
    }

    #[test]
    fn test_bytes_per_pixel() {
        assert_eq!(ImageFormat::Gif.bytes_per_pixel(), 1);
        assert_eq!(ImageFormat::Jpeg.bytes_per_pixel(), 3);
    }
}
