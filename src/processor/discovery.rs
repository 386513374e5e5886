//! File discovery module for GPCP 1DD datasets
//!
//! Finds the monthly files in an input directory by glob pattern.

use crate::error::{GpcpError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File discovery component for 1DD datasets
#[derive(Debug)]
pub struct FileDiscovery {
    input_dir: PathBuf,
    pattern: String,
}

impl FileDiscovery {
    /// Create a new file discovery instance
    pub fn new(input_dir: PathBuf, pattern: impl Into<String>) -> Self {
        Self {
            input_dir,
            pattern: pattern.into(),
        }
    }

    /// Discover matching regular files, sorted by path
    ///
    /// The pattern is matched against names directly inside `input_dir`;
    /// glob metacharacters in the directory path itself are escaped.
    pub fn discover_files(&self) -> Result<Vec<PathBuf>> {
        if !self.input_dir.is_dir() {
            return Err(GpcpError::InputNotFound {
                path: self.input_dir.clone(),
            });
        }

        let full_pattern = format!(
            "{}/{}",
            glob::Pattern::escape(&self.input_dir.to_string_lossy()),
            self.pattern
        );
        debug!("Searching for input files matching: {}", full_pattern);

        let mut files = Vec::new();
        for entry in glob::glob(&full_pattern)? {
            match entry {
                Ok(path) if is_data_file(&path) => files.push(path),
                Ok(path) => debug!("Skipping non-file match: {}", path.display()),
                Err(e) => warn!("Unreadable path during discovery: {}", e),
            }
        }

        files.sort();
        debug!("Found {} input files", files.len());
        Ok(files)
    }
}

/// Check if a path is a regular file
fn is_data_file(path: &Path) -> bool {
    path.is_file()
}
