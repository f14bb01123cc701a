//! Output format specifications.

use chrono::{DateTime, TimeZone};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Prefix of synthesized report file names.
pub const REPORT_FILE_PREFIX: &str = "sfreport";

/// Timestamp layout used in synthesized report file names.
pub const FILE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%H-%M-%S";

/// Supported report encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Column-aligned plain text (default)
    #[default]
    Text,

    /// Standalone HTML page with collapsible sections
    Html,

    /// Minimal CSV inventory for machine parsing
    Minimal,

    /// Structured JSON document
    Json,
}

impl OutputFormat {
    /// Infer a format from an output path's extension.
    ///
    /// Only `.json`, `.html` and `.htm` select a format; anything else
    /// leaves the decision to the caller.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(OutputFormat::Json),
            "html" | "htm" => Some(OutputFormat::Html),
            _ => None,
        }
    }

    /// Resolve the effective format.
    ///
    /// An explicit mode wins over the path extension, which wins over text.
    pub fn resolve(explicit: Option<Self>, path: Option<&Path>) -> Self {
        explicit
            .or_else(|| path.and_then(Self::from_path))
            .unwrap_or_default()
    }

    /// File extension used when a report path has to be synthesized.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Text | OutputFormat::Minimal => "txt",
            OutputFormat::Html => "html",
            OutputFormat::Json => "json",
        }
    }

    /// Whether sections are written as soon as they are collected.
    ///
    /// JSON needs the whole report before anything can be written.
    pub fn is_streaming(&self) -> bool {
        !matches!(self, OutputFormat::Json)
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Html => write!(f, "html"),
            OutputFormat::Minimal => write!(f, "minimal"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Build the `<prefix>-<hostname>-<timestamp>.<ext>` report file name.
///
/// Downstream tooling globs for this pattern, so the layout is fixed.
pub fn report_file_name<Tz>(
    prefix: &str,
    hostname: &str,
    timestamp: &DateTime<Tz>,
    format: OutputFormat,
) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    format!(
        "{}-{}-{}.{}",
        prefix,
        hostname,
        timestamp.format(FILE_TIMESTAMP_FORMAT),
        format.extension()
    )
}
