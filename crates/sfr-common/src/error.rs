//! Error types for sfreport.
//!
//! Errors carry a stable numeric code and a category so collectors can log
//! them uniformly before deciding whether to recover:
//!
//! - `SourceUnavailable` is always recovered locally (absent/empty value).
//! - `SinkUnwritable` is the only error that aborts a report.
//! - `MalformedBinaryInput` is recovered as a zero-valued field.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for sfreport operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// A fact source could not be read.
    Collection,
    /// The report destination could not be written.
    Output,
    /// A binary buffer was too short for the requested field.
    Binary,
    /// Generic I/O and serialization errors.
    Io,
    /// Configuration file errors.
    Config,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Collection => write!(f, "collection"),
            ErrorCategory::Output => write!(f, "output"),
            ErrorCategory::Binary => write!(f, "binary"),
            ErrorCategory::Io => write!(f, "io"),
            ErrorCategory::Config => write!(f, "config"),
        }
    }
}

/// Unified error type for sfreport.
#[derive(Error, Debug)]
pub enum Error {
    // Collection errors (20-29)
    #[error("source unavailable: {source_name}: {reason}")]
    SourceUnavailable { source_name: String, reason: String },

    // Output errors (30-39)
    #[error("cannot open output '{}': {source}", .path.display())]
    SinkUnwritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Binary input errors (40-49)
    #[error("read of {length} bytes at offset {offset:#x} exceeds buffer of {available} bytes")]
    MalformedBinaryInput {
        offset: usize,
        length: usize,
        available: usize,
    },

    // Configuration errors (10-19)
    #[error("configuration error: {0}")]
    Config(String),

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Convenience constructor for an unreadable fact source.
    pub fn source_unavailable(source_name: impl Into<String>, reason: impl ToString) -> Self {
        Error::SourceUnavailable {
            source_name: source_name.into(),
            reason: reason.to_string(),
        }
    }

    /// Returns the stable error code.
    ///
    /// - 10-19: configuration
    /// - 20-29: collection
    /// - 30-39: output
    /// - 40-49: binary input
    /// - 60-69: I/O and serialization
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::SourceUnavailable { .. } => 20,
            Error::SinkUnwritable { .. } => 30,
            Error::MalformedBinaryInput { .. } => 40,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Config(_) => ErrorCategory::Config,
            Error::SourceUnavailable { .. } => ErrorCategory::Collection,
            Error::SinkUnwritable { .. } => ErrorCategory::Output,
            Error::MalformedBinaryInput { .. } => ErrorCategory::Binary,
            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }

    /// Whether the report can continue after this error.
    ///
    /// Only an unwritable sink aborts report generation.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::SourceUnavailable { .. } => true,
            Error::MalformedBinaryInput { .. } => true,
            Error::SinkUnwritable { .. } => false,
            Error::Config(_) => false,
            Error::Io(_) => false,
            Error::Json(_) => false,
        }
    }

    /// Returns a short headline for human-readable output.
    pub fn headline(&self) -> &'static str {
        match self {
            Error::Config(_) => "Configuration Error",
            Error::SourceUnavailable { .. } => "Source Unavailable",
            Error::SinkUnwritable { .. } => "No write permissions on output directory.",
            Error::MalformedBinaryInput { .. } => "Malformed Binary Input",
            Error::Io(_) => "I/O Error",
            Error::Json(_) => "JSON Error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(Error::Config("bad".into()).code(), 10);
        assert_eq!(Error::source_unavailable("/proc/cmdline", "gone").code(), 20);
        assert_eq!(
            Error::MalformedBinaryInput {
                offset: 8,
                length: 4,
                available: 10
            }
            .code(),
            40
        );
    }

    #[test]
    fn test_error_category() {
        let sink = Error::SinkUnwritable {
            path: PathBuf::from("/nope/out.txt"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert_eq!(sink.category(), ErrorCategory::Output);
        assert_eq!(
            Error::source_unavailable("lsb_release", "not found").category(),
            ErrorCategory::Collection
        );
    }

    #[test]
    fn test_only_sink_errors_abort() {
        let sink = Error::SinkUnwritable {
            path: PathBuf::from("/nope/out.txt"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert!(!sink.is_recoverable());
        assert!(Error::source_unavailable("x", "y").is_recoverable());
        assert!(Error::MalformedBinaryInput {
            offset: 0,
            length: 2,
            available: 1
        }
        .is_recoverable());
    }

    #[test]
    fn test_error_messages() {
        let err = Error::MalformedBinaryInput {
            offset: 0x2c,
            length: 2,
            available: 16,
        };
        assert_eq!(
            err.to_string(),
            "read of 2 bytes at offset 0x2c exceeds buffer of 16 bytes"
        );

        let sink = Error::SinkUnwritable {
            path: PathBuf::from("/nope/out.txt"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert!(sink.to_string().starts_with("cannot open output '/nope/out.txt'"));
    }

    #[test]
    fn test_error_category_display() {
        assert_eq!(ErrorCategory::Collection.to_string(), "collection");
        assert_eq!(ErrorCategory::Binary.to_string(), "binary");
    }
}
