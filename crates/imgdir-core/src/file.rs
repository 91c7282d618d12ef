//! Image file leaf entries.

use std::path::{Path, PathBuf};

use compact_str::CompactString;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::entry::{DirectoryEntry, ImageFormat};
use crate::error::EntryError;
use crate::probe::{ImageProbe, ProbeResult};

/// A single recognized image file.
///
/// Immutable once built; the dimensions are those of the first frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageFile {
    path: PathBuf,
    name: CompactString,
    format: ImageFormat,
    width: u32,
    height: u32,
    size: u64,
}

impl ImageFile {
    /// Create an entry from already known metadata.
    pub fn new(
        path: impl Into<PathBuf>,
        format: ImageFormat,
        width: u32,
        height: u32,
        size: u64,
    ) -> Self {
        let path = path.into();
        let name = file_name(&path);
        Self {
            path,
            name,
            format,
            width,
            height,
            size,
        }
    }

    /// Probe `path` and build an entry if it is a handled image.
    ///
    /// The byte length is read only after the probe succeeds.
    pub fn probe<P: ImageProbe + ?Sized>(path: &Path, probe: &P) -> Result<Self, EntryError> {
        match probe.probe(path) {
            Ok(ProbeResult::Recognized {
                format,
                width,
                height,
            }) => {
                let size = std::fs::metadata(path)
                    .map_err(|e| EntryError::io(path, e))?
                    .len();
                Ok(Self::new(path, format, width, height, size))
            }
            Ok(ProbeResult::Unrecognized) => Err(EntryError::UnhandledFormat {
                path: path.to_path_buf(),
            }),
            Err(e) => Err(EntryError::io(path, e)),
        }
    }

    /// File name (not full path).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Recognized image format.
    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// Check if the image has no pixels, so compression cannot be estimated.
    pub fn has_zero_area(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl DirectoryEntry for ImageFile {
    fn path(&self) -> &Path {
        &self.path
    }

    fn entry_type(&self) -> &'static str {
        self.format.type_label()
    }

    fn file_size(&self) -> u64 {
        self.size
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    /// File size divided by the estimated raw pixel data size.
    ///
    /// GIF assumes one byte per pixel, JPEG three. Animated GIFs can exceed
    /// 1 since only the first frame is counted. A zero-area image yields 0.
    fn compression_factor(&self) -> f64 {
        let area = u64::from(self.width) * u64::from(self.height);
        if area == 0 {
            return 0.0;
        }
        self.size as f64 / (area * self.format.bytes_per_pixel()) as f64
    }
}

impl Serialize for ImageFile {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ImageFile", 7)?;
        state.serialize_field("path", &self.path)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("type", self.entry_type())?;
        state.serialize_field("file_size", &self.size)?;
        state.serialize_field("width", &self.width)?;
        state.serialize_field("height", &self.height)?;
        state.serialize_field("compression_factor", &self.compression_factor())?;
        state.end()
    }
}

/// Last path component, or the whole path for roots like `/`.
pub(crate) fn file_name(path: &Path) -> CompactString {
    path.file_name()
        .map(|n| CompactString::new(n.to_string_lossy()))
        .unwrap_or_else(|| CompactString::new(path.to_string_lossy()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    struct FixedProbe(io::Result<ProbeResult>);

    impl ImageProbe for FixedProbe {
        fn probe(&self, _path: &Path) -> io::Result<ProbeResult> {
            match &self.0 {
                Ok(result) => Ok(*result),
                Err(e) => Err(io::Error::new(e.kind(), e.to_string())),
            }
        }
    }

    #[test]
    fn test_jpeg_compression_factor() {
        let file = ImageFile::new("/img/test.jpg", ImageFormat::Jpeg, 100, 100, 630);
        assert_eq!(file.compression_factor(), 630.0 / (100.0 * 100.0 * 3.0));
        assert_eq!(file.entry_type(), "JPEG-image");
        assert_eq!(file.name(), "test.jpg");
    }

    #[test]
    fn test_gif_compression_factor() {
        let file = ImageFile::new("/img/a.gif", ImageFormat::Gif, 10, 20, 50);
        assert_eq!(file.compression_factor(), 50.0 / 200.0);
        assert_eq!(file.entry_type(), "GIF-image");
    }

    #[test]
    fn test_animated_gif_can_exceed_one() {
        let file = ImageFile::new("/img/anim.gif", ImageFormat::Gif, 4, 4, 400);
        assert!(file.compression_factor() > 1.0);
    }

    #[test]
    fn test_zero_area_compression_is_zero() {
        let file = ImageFile::new("/img/empty.gif", ImageFormat::Gif, 0, 16, 35);
        assert!(file.has_zero_area());
        assert_eq!(file.compression_factor(), 0.0);
        assert!(!ImageFile::new("/img/a.gif", ImageFormat::Gif, 1, 1, 3).has_zero_area());
    }

    #[test]
    fn test_probe_recognized_reads_size() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("pic.jpg");
        std::fs::write(&path, vec![0u8; 630]).unwrap();

        let probe = FixedProbe(Ok(ProbeResult::Recognized {
            format: ImageFormat::Jpeg,
            width: 100,
            height: 100,
        }));
        let file = ImageFile::probe(&path, &probe).unwrap();

        assert_eq!(file.file_size(), 630);
        assert_eq!(file.width(), 100);
        assert_eq!(file.height(), 100);
        assert_eq!(file.format(), ImageFormat::Jpeg);
        assert_eq!(file.path(), path.as_path());
    }

    #[test]
    fn test_probe_unrecognized() {
        let probe = FixedProbe(Ok(ProbeResult::Unrecognized));
        let err = ImageFile::probe(Path::new("/img/readme.txt"), &probe).unwrap_err();
        assert!(matches!(err, EntryError::UnhandledFormat { .. }));
    }

    #[test]
    fn test_probe_io_failure() {
        let probe = FixedProbe(Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied")));
        let err = ImageFile::probe(Path::new("/img/locked.jpg"), &probe).unwrap_err();
        assert!(matches!(err, EntryError::Io { .. }));
    }

    #[test]
    fn test_serialize_includes_computed_fields() {
        let file = ImageFile::new("/img/test.jpg", ImageFormat::Jpeg, 100, 100, 630);
        let json = serde_json::to_value(&file).unwrap();
        assert_eq!(json["type"], "JPEG-image");
        assert_eq!(json["file_size"], 630);
        assert_eq!(json["width"], 100);
    }
}
