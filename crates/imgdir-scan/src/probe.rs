//! Image probe backed by the `image` crate decoders.

use std::io;
use std::path::Path;

use image::{ImageError, ImageFormat as DecoderFormat, ImageReader, ImageResult};
use imgdir_core::{ImageFormat, ImageProbe, ProbeResult};

/// Probes files by sniffing their magic bytes and reading only the header.
///
/// Content wins over the file extension; the extension is only consulted
/// when the content matches no known signature. Pixel data is never
/// decoded.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecoderProbe;

impl DecoderProbe {
    /// Create a new probe.
    pub fn new() -> Self {
        Self
    }
}

impl ImageProbe for DecoderProbe {
    fn probe(&self, path: &Path) -> io::Result<ProbeResult> {
        // The reader owns the file handle and drops it on every return path.
        let reader = ImageReader::open(path)?.with_guessed_format()?;

        let Some(format) = reader.format().and_then(handled_format) else {
            return Ok(ProbeResult::Unrecognized);
        };

        header_result(format, reader.into_dimensions())
    }
}

/// Classify the outcome of reading an image header.
///
/// A header the decoder rejects (truncated, empty, or foreign content behind
/// an image extension) is not an image. Running out of bytes counts as a
/// rejected header; any other I/O error is a read failure.
fn header_result(
    format: ImageFormat,
    dimensions: ImageResult<(u32, u32)>,
) -> io::Result<ProbeResult> {
    match dimensions {
        Ok((width, height)) => Ok(ProbeResult::Recognized {
            format,
            width,
            height,
        }),
        Err(ImageError::IoError(err)) if err.kind() != io::ErrorKind::UnexpectedEof => Err(err),
        Err(_) => Ok(ProbeResult::Unrecognized),
    }
}

/// Map a decoder format onto the handled set.
fn handled_format(format: DecoderFormat) -> Option<ImageFormat> {
    match format {
        DecoderFormat::Gif => Some(ImageFormat::Gif),
        DecoderFormat::Jpeg => Some(ImageFormat::Jpeg),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::error::{DecodingError, ImageFormatHint};
    use std::fs;
    use tempfile::TempDir;

    fn write_jpeg(path: &Path, width: u32, height: u32) {
        image::RgbImage::from_pixel(width, height, image::Rgb([200, 40, 40]))
            .save_with_format(path, DecoderFormat::Jpeg)
            .unwrap();
    }

    fn write_gif(path: &Path, width: u32, height: u32) {
        image::RgbaImage::from_pixel(width, height, image::Rgba([0, 0, 255, 255]))
            .save_with_format(path, DecoderFormat::Gif)
            .unwrap();
    }

    #[test]
    fn test_probe_jpeg() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("photo.jpg");
        write_jpeg(&path, 100, 100);

        let result = DecoderProbe::new().probe(&path).unwrap();
        assert_eq!(
            result,
            ProbeResult::Recognized {
                format: ImageFormat::Jpeg,
                width: 100,
                height: 100
            }
        );
    }

    #[test]
    fn test_probe_gif() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("anim.gif");
        write_gif(&path, 32, 16);

        let result = DecoderProbe::new().probe(&path).unwrap();
        assert_eq!(
            result,
            ProbeResult::Recognized {
                format: ImageFormat::Gif,
                width: 32,
                height: 16
            }
        );
    }

    #[test]
    fn test_content_wins_over_extension() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("actually_a_gif.jpg");
        write_gif(&path, 8, 8);

        let result = DecoderProbe::new().probe(&path).unwrap();
        assert!(matches!(
            result,
            ProbeResult::Recognized {
                format: ImageFormat::Gif,
                ..
            }
        ));
    }

    #[test]
    fn test_renamed_text_file_is_unrecognized() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("notes.jpg");
        fs::write(&path, "this is not a picture\n").unwrap();

        let result = DecoderProbe::new().probe(&path).unwrap();
        assert_eq!(result, ProbeResult::Unrecognized);
    }

    #[test]
    fn test_empty_file_is_unrecognized() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("empty.gif");
        fs::write(&path, b"").unwrap();

        let result = DecoderProbe::new().probe(&path).unwrap();
        assert_eq!(result, ProbeResult::Unrecognized);
    }

    #[test]
    fn test_unhandled_format_is_unrecognized() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("image.png");
        // PNG signature followed by garbage; not a handled format either way.
        fs::write(&path, b"\x89PNG\r\n\x1a\n0000000000000000").unwrap();

        let result = DecoderProbe::new().probe(&path).unwrap();
        assert_eq!(result, ProbeResult::Unrecognized);
    }

    #[test]
    fn test_header_read_failure_is_io_error() {
        let err = header_result(
            ImageFormat::Jpeg,
            Err(ImageError::IoError(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "denied",
            ))),
        )
        .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
    }

    #[test]
    fn test_header_rejections_are_unrecognized() {
        let truncated = header_result(
            ImageFormat::Gif,
            Err(ImageError::IoError(io::ErrorKind::UnexpectedEof.into())),
        );
        assert_eq!(truncated.unwrap(), ProbeResult::Unrecognized);

        let garbage = header_result(
            ImageFormat::Jpeg,
            Err(ImageError::Decoding(DecodingError::new(
                ImageFormatHint::Exact(DecoderFormat::Jpeg),
                "no SOI marker",
            ))),
        );
        assert_eq!(garbage.unwrap(), ProbeResult::Unrecognized);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let temp = TempDir::new().unwrap();
        let err = DecoderProbe::new()
            .probe(&temp.path().join("gone.jpg"))
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
