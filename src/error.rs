//! Error handling for GPCP 1DD decoding and batch processing.
//!
//! Every decode failure carries the offending file path and the specific
//! condition; nothing is recovered locally.

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GpcpError {
    #[error("IO error on file: {path} - {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid 1DD format in file: {path} - {reason}")]
    Format { path: PathBuf, reason: String },

    #[error("Invalid state: {reason}")]
    InvalidState { reason: String },

    #[error("Input directory not found at path: {path}")]
    InputNotFound { path: PathBuf },

    #[error("Failed to write output: {path} - {reason}")]
    Output { path: PathBuf, reason: String },

    #[error("Processing task failed for file: {path} - {reason}")]
    TaskFailed { path: PathBuf, reason: String },

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Invalid file pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl GpcpError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn format(path: &Path, reason: impl Into<String>) -> Self {
        Self::Format {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    pub fn invalid_state(reason: impl Into<String>) -> Self {
        Self::InvalidState {
            reason: reason.into(),
        }
    }

    pub fn output(path: &Path, reason: impl Into<String>) -> Self {
        Self::Output {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    /// Path of the file the error refers to, when there is one
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Io { path, .. }
            | Self::Format { path, .. }
            | Self::InputNotFound { path }
            | Self::Output { path, .. }
            | Self::TaskFailed { path, .. } => Some(path),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, GpcpError>;
