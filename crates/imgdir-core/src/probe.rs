//! The probe seam used to classify files.

use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::entry::ImageFormat;

/// Outcome of probing a file that could be opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProbeResult {
    /// File is a handled image; dimensions are those of the first frame.
    Recognized {
        format: ImageFormat,
        width: u32,
        height: u32,
    },
    /// File is not an image, is truncated, or is in a format outside
    /// [`ImageFormat`].
    Unrecognized,
}

impl ProbeResult {
    /// Check if the probe recognized a handled image.
    pub fn is_recognized(&self) -> bool {
        matches!(self, ProbeResult::Recognized { .. })
    }
}

/// Inspects a file header to classify it.
///
/// "Not an image" is a normal outcome reported as
/// [`ProbeResult::Unrecognized`]; only a failure to open or read the path
/// is returned as `Err`. Implementations must release any handle they open
/// before returning.
pub trait ImageProbe {
    /// Probe the file at `path`.
    fn probe(&self, path: &Path) -> io::Result<ProbeResult>;
}

impl<P: ImageProbe + ?Sized> ImageProbe for &P {
    fn probe(&self, path: &Path) -> io::Result<ProbeResult> {
        (**self).probe(path)
    }
}
