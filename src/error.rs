//! Unified error types for msgtally.
//!
//! This module provides a single [`ArchiveError`] enum that covers all error
//! cases in the library. This design follows the pattern used by popular
//! crates like `reqwest`, `serde_json`, and `csv`.
//!
//! # Error Handling Philosophy
//!
//! Anything confined to a single export file or a single string value is
//! recovered inside the reader and never surfaces here: a malformed file is
//! logged and skipped, a broken name falls back to its raw form. Only
//! failures that prevent a scan from proceeding at all (a missing archive
//! root, an invalid date filter) reach the caller as a typed error.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// A specialized [`Result`] type for msgtally operations.
///
/// # Example
///
/// ```rust
/// use msgtally::error::Result;
/// use msgtally::scanner::ScanOutcome;
///
/// fn my_function() -> Result<Option<ScanOutcome>> {
///     // ... operations that may fail
///     Ok(None)
/// }
/// ```
pub type Result<T> = std::result::Result<T, ArchiveError>;

/// The error type for all msgtally operations.
///
/// Each variant contains context about what went wrong and, where
/// applicable, the underlying source error.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ArchiveError {
    /// An I/O error occurred.
    ///
    /// This typically happens when:
    /// - A conversation folder disappears mid-scan
    /// - Permission denied while reading an export file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A single export file could not be parsed as the expected JSON schema.
    ///
    /// The reader recovers from this by skipping the file, so this variant
    /// is mostly visible in logs rather than returned from public entry
    /// points.
    #[error("Failed to parse export file {}: {source}", path.display())]
    FileParse {
        /// The file that failed to parse
        path: PathBuf,
        /// The underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// The archive root does not exist or is not a readable directory.
    ///
    /// Returned by [`scan`](crate::scanner::scan) and
    /// [`aggregate_one`](crate::scanner::aggregate_one) so a host UI can
    /// report the bad selection instead of crashing.
    #[error("Archive directory {} does not exist or is not readable", path.display())]
    MissingDirectory {
        /// The path that was expected to be an archive directory
        path: PathBuf,
    },

    /// Invalid date in a filter argument.
    ///
    /// Date filters expect YYYY-MM-DD format.
    #[error("Invalid date '{input}'. Expected format: {expected}")]
    InvalidDate {
        /// The invalid date string that was provided
        input: String,
        /// Expected format description
        expected: &'static str,
    },

    /// JSON serialization error.
    ///
    /// This can occur when writing aggregates as JSON output.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The persisted configuration file could not be read or parsed.
    #[cfg(feature = "cli")]
    #[error("Failed to load config {}: {message}", path.display())]
    Config {
        /// The config file path
        path: PathBuf,
        /// Description of what's wrong
        message: String,
    },
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl ArchiveError {
    /// Creates a parse error for one export file.
    pub fn file_parse(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        ArchiveError::FileParse {
            path: path.into(),
            source,
        }
    }

    /// Creates a missing-directory error.
    pub fn missing_directory(path: impl AsRef<Path>) -> Self {
        ArchiveError::MissingDirectory {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Creates an invalid date error.
    pub fn invalid_date(input: impl Into<String>) -> Self {
        ArchiveError::InvalidDate {
            input: input.into(),
            expected: "YYYY-MM-DD",
        }
    }

    /// Creates a config error.
    #[cfg(feature = "cli")]
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ArchiveError::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, ArchiveError::Io(_))
    }

    /// Returns `true` if this is a file parse error.
    pub fn is_file_parse(&self) -> bool {
        matches!(self, ArchiveError::FileParse { .. })
    }

    /// Returns `true` if this is a missing-directory error.
    pub fn is_missing_directory(&self) -> bool {
        matches!(self, ArchiveError::MissingDirectory { .. })
    }

    /// Returns `true` if this is a date-related error.
    pub fn is_invalid_date(&self) -> bool {
        matches!(self, ArchiveError::InvalidDate { .. })
    }
}

// ============================================================================
// Tests
// ============================================================================
