//! Error and warning types for probing and scanning.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while building a single image file entry.
///
/// Neither variant aborts a scan: the directory builder skips the file and
/// records a note.
#[derive(Debug, Error)]
pub enum EntryError {
    /// File is not one of the handled image formats.
    #[error("Unhandled format: {path}")]
    UnhandledFormat { path: PathBuf },

    /// File could not be opened or read.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl EntryError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Path of the file that failed.
    pub fn path(&self) -> &Path {
        match self {
            Self::UnhandledFormat { path } | Self::Io { path, .. } => path,
        }
    }
}

/// Errors that abort a scan call.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Permission denied for a path.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Path not found.
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Root path is not a directory.
    #[error("Root path is not a directory: {path}")]
    NotADirectory { path: PathBuf },
}

impl ScanError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }
}

/// Severity of a scan note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Expected outcome, only interesting when tracing a scan.
    Debug,
    /// Something was approximated or skipped on purpose.
    Warn,
    /// Something could not be read.
    Error,
}

/// Kind of scan note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningKind {
    /// File is not a handled image.
    UnhandledFormat,
    /// Error reading file/directory.
    ReadError,
    /// Error reading metadata.
    MetadataError,
    /// Followed symlink leads back into one of its own ancestors.
    SymlinkCycle,
    /// Image with zero width or height; its compression factor is 0.
    ZeroArea,
}

/// Non-fatal note recorded during a scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanWarning {
    /// Path where the note occurred.
    pub path: PathBuf,
    /// Human-readable message.
    pub message: String,
    /// Kind of note.
    pub kind: WarningKind,
    /// How loudly the note should be reported.
    pub severity: Severity,
}

impl ScanWarning {
    /// Create a new scan note.
    pub fn new(
        path: impl Into<PathBuf>,
        message: impl Into<String>,
        kind: WarningKind,
        severity: Severity,
    ) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            kind,
            severity,
        }
    }

    /// Create a debug note for a file that is not a handled image.
    pub fn unhandled_format(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            message: format!("Not a handled image: {}", path.display()),
            path,
            kind: WarningKind::UnhandledFormat,
            severity: Severity::Debug,
        }
    }

    /// Create an error note for a file that could not be read.
    pub fn read_error(path: impl Into<PathBuf>, error: &std::io::Error) -> Self {
        Self {
            path: path.into(),
            message: format!("Read error: {error}"),
            kind: WarningKind::ReadError,
            severity: Severity::Error,
        }
    }

    /// Create an error note for a directory that could not be enumerated.
    pub fn unreadable_directory(path: impl Into<PathBuf>, error: &std::io::Error) -> Self {
        let path = path.into();
        Self {
            message: format!("Could not open {} as directory: {error}", path.display()),
            path,
            kind: WarningKind::ReadError,
            severity: Severity::Error,
        }
    }

    /// Create a warning for a symlinked directory that loops back.
    pub fn symlink_cycle(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            message: format!("Symlink cycle: {}", path.display()),
            path,
            kind: WarningKind::SymlinkCycle,
            severity: Severity::Warn,
        }
    }

    /// Create a warning for an image whose compression cannot be estimated.
    pub fn zero_area(path: impl Into<PathBuf>, width: u32, height: u32) -> Self {
        let path = path.into();
        Self {
            message: format!(
                "Could not approximate compression of {width}x{height} image {}",
                path.display()
            ),
            path,
            kind: WarningKind::ZeroArea,
            severity: Severity::Warn,
        }
    }

    /// Convert a failed entry construction into the matching note.
    pub fn from_entry_error(error: &EntryError) -> Self {
        match error {
            EntryError::UnhandledFormat { path } => Self::unhandled_format(path),
            EntryError::Io { path, source } => Self::read_error(path, source),
        }
    }
}
