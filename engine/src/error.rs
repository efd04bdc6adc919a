//! Error types for the staging engine.
//!
//! `StageError` is returned only for invalid input and for the collaborator
//! services (digest, codec). Filesystem failures during a commit or a
//! directory removal are recorded per entry in the batch report instead.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop an operation before it touches the filesystem, or that
/// a single-shot service cannot recover from.
#[derive(Debug, Error)]
pub enum StageError {
    /// A required text argument was empty
    #[error("Argument '{name}' must not be empty")]
    EmptyArgument { name: &'static str },

    /// No file name could be derived from a staged path
    #[error("Cannot derive a file name from '{path}': {reason}")]
    InvalidFileName { path: String, reason: String },

    /// Failed to open or read a source file
    #[error("Failed to read file: {}", path.display())]
    ReadError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to create or write a destination file
    #[error("Failed to write file: {}", path.display())]
    WriteError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The byte stream broke off after both files were opened
    #[error("Copy interrupted: {} -> {}", from.display(), to.display())]
    CopyInterrupted {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to create a directory
    #[error("Failed to create directory: {}", path.display())]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to enumerate a directory
    #[error("Failed to enumerate directory: {}", path.display())]
    EnumerationFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to delete a file or directory
    #[error("Failed to remove: {}", path.display())]
    RemoveFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The gzip encoder failed
    #[error("Compression failed")]
    CompressionFailed {
        #[source]
        source: io::Error,
    },

    /// The input was not a valid gzip stream
    #[error("Decompression failed")]
    DecompressionFailed {
        #[source]
        source: io::Error,
    },
}

impl StageError {
    /// Extract the OS error code from this error, if available.
    pub fn raw_os_error(&self) -> Option<u32> {
        match self {
            Self::ReadError { source, .. }
            | Self::WriteError { source, .. }
            | Self::CopyInterrupted { source, .. }
            | Self::DirectoryCreationFailed { source, .. }
            | Self::EnumerationFailed { source, .. }
            | Self::RemoveFailed { source, .. }
            | Self::CompressionFailed { source }
            | Self::DecompressionFailed { source } => source.raw_os_error().map(|e| e as u32),
            Self::EmptyArgument { .. } | Self::InvalidFileName { .. } => None,
        }
    }

    /// Full message including the underlying io::Error, for per-item reports.
    pub fn detailed_message(&self) -> String {
        match std::error::Error::source(self) {
            Some(source) => format!("{}: {}", self, source),
            None => self.to_string(),
        }
    }
}

/// Reject empty text arguments up front.
pub(crate) fn require_non_empty(name: &'static str, value: &str) -> Result<(), StageError> {
    if value.is_empty() {
        Err(StageError::EmptyArgument { name })
    } else {
        Ok(())
    }
}
