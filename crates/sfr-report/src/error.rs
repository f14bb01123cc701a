//! Error types for report assembly.

use crate::assembler::AssemblerState;
use thiserror::Error;

/// Result type for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;

/// Errors that can occur while assembling or rendering a report.
#[derive(Error, Debug)]
pub enum ReportError {
    /// Writing to the sink failed.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// An operation was called in the wrong lifecycle state.
    #[error("cannot {operation} while assembler is {state}")]
    InvalidState {
        operation: &'static str,
        state: AssemblerState,
    },

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
