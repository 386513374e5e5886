//! Configuration management and validation.
//!
//! Holds everything a batch run needs: where to read, where to write, which
//! files to pick up, how many to decode at once and which header fields go
//! into the catalog table.

use crate::constants::{
    CATALOG_COLUMNS, CATALOG_FILE_NAME, DEFAULT_INPUT_DIR, DEFAULT_OUTPUT_SUBDIR,
    INPUT_FILE_PATTERN,
};
use crate::error::{GpcpError, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Configuration for a batch conversion run
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    /// Directory containing the monthly 1DD files
    pub input_dir: PathBuf,

    /// Directory receiving the `.npy` arrays and the catalog table
    pub output_dir: PathBuf,

    /// Glob pattern, relative to `input_dir`, selecting input files
    pub file_pattern: String,

    /// Number of files decoded concurrently
    pub workers: usize,

    /// Header fields recorded in the catalog, in column order
    pub catalog_columns: Vec<String>,

    /// File name of the catalog table inside `output_dir`
    pub catalog_file_name: String,

    /// Remove and recreate the output directory before writing
    pub clean_output: bool,

    /// Log failed files and continue instead of aborting the run
    pub keep_going: bool,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self::for_input(DEFAULT_INPUT_DIR)
    }
}

impl ProcessorConfig {
    /// Configuration reading `input_dir` and writing to `input_dir/numpy_arrays`
    pub fn for_input(input_dir: impl AsRef<Path>) -> Self {
        let input_dir = input_dir.as_ref().to_path_buf();
        Self {
            output_dir: input_dir.join(DEFAULT_OUTPUT_SUBDIR),
            input_dir,
            file_pattern: INPUT_FILE_PATTERN.to_string(),
            workers: num_cpus::get(),
            catalog_columns: CATALOG_COLUMNS.iter().map(|c| c.to_string()).collect(),
            catalog_file_name: CATALOG_FILE_NAME.to_string(),
            clean_output: true,
            keep_going: false,
        }
    }

    /// Set the output directory
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    /// Set the input file pattern
    pub fn with_file_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.file_pattern = pattern.into();
        self
    }

    /// Set the number of concurrent decodes
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Set the catalog columns
    pub fn with_catalog_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.catalog_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Keep an existing output directory and its contents
    pub fn without_clean_output(mut self) -> Self {
        self.clean_output = false;
        self
    }

    /// Continue past files that fail to decode
    pub fn with_keep_going(mut self) -> Self {
        self.keep_going = true;
        self
    }

    /// Full path of the catalog table
    pub fn catalog_path(&self) -> PathBuf {
        self.output_dir.join(&self.catalog_file_name)
    }

    /// Check the configuration before a run
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(GpcpError::Configuration {
                message: "workers must be at least 1".to_string(),
            });
        }

        if self.file_pattern.trim().is_empty() {
            return Err(GpcpError::Configuration {
                message: "file pattern must not be empty".to_string(),
            });
        }
        glob::Pattern::new(&self.file_pattern)?;

        if self.catalog_columns.is_empty() {
            return Err(GpcpError::Configuration {
                message: "catalog needs at least one column".to_string(),
            });
        }

        if self.catalog_file_name.is_empty() {
            return Err(GpcpError::Configuration {
                message: "catalog file name must not be empty".to_string(),
            });
        }

        if self.clean_output {
            let input = resolve_dir(&self.input_dir);
            let output = resolve_dir(&self.output_dir);
            if input.starts_with(&output) {
                return Err(GpcpError::Configuration {
                    message: format!(
                        "refusing to clean output directory {} because it contains the input directory {}",
                        self.output_dir.display(),
                        self.input_dir.display()
                    ),
                });
            }
        }

        debug!(
            "Configuration valid: pattern={}, workers={}, columns={:?}",
            self.file_pattern, self.workers, self.catalog_columns
        );
        Ok(())
    }
}

/// Resolve a directory for comparison, following symlinks when it exists
fn resolve_dir(path: &Path) -> PathBuf {
    path.canonicalize()
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}
