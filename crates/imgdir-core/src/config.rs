//! Scan configuration types.

use std::path::PathBuf;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Configuration for an image directory scan.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct ScanConfig {
    /// Root directory to scan.
    pub root: PathBuf,

    /// Resolve symbolic links. When false they are skipped like special files.
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub follow_symlinks: bool,

    /// Include hidden entries (starting with .).
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub include_hidden: bool,

    /// Names to skip: exact, `prefix*` or `*suffix`.
    #[builder(default)]
    #[serde(default)]
    pub ignore_patterns: Vec<String>,
}

fn default_true() -> bool {
    true
}

impl ScanConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        match self.root {
            Some(ref root) if root.as_os_str().is_empty() => {
                Err("Root path cannot be empty".to_string())
            }
            Some(_) => Ok(()),
            None => Err("Root path is required".to_string()),
        }
    }
}

impl ScanConfig {
    /// Create a new scan config builder.
    pub fn builder() -> ScanConfigBuilder {
        ScanConfigBuilder::default()
    }

    /// Create a simple config for scanning a path.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            follow_symlinks: true,
            include_hidden: true,
            ignore_patterns: Vec::new(),
        }
    }

    /// Check if an entry name matches one of the ignore patterns.
    pub fn should_ignore(&self, name: &str) -> bool {
        self.ignore_patterns.iter().any(|pattern| {
            if let Some(prefix) = pattern.strip_suffix('*') {
                name.starts_with(prefix)
            } else if let Some(suffix) = pattern.strip_prefix('*') {
                name.ends_with(suffix)
            } else {
                name == pattern
            }
        })
    }

    /// Check if hidden entries should be skipped.
    pub fn should_skip_hidden(&self, name: &str) -> bool {
        !self.include_hidden && name.starts_with('.')
    }

    /// Check if an entry is filtered out before probing.
    pub fn should_skip(&self, name: &str) -> bool {
        self.should_skip_hidden(name) || self.should_ignore(name)
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::new(".")
    }
}
