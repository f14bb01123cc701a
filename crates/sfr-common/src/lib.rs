//! Common types shared by the sfreport crates.
//!
//! - Output format selection and report file naming
//! - The unified error type and its categories

pub mod error;
pub mod output;

pub use error::{Error, ErrorCategory, Result};
pub use output::{report_file_name, OutputFormat, REPORT_FILE_PREFIX};
