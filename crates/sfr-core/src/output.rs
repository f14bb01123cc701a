//! Output destination and format resolution.

use chrono::{DateTime, TimeZone};
use sfr_common::{report_file_name, Error, OutputFormat, Result};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Path argument that selects stdout.
pub const STDOUT_PATH: &str = "-";

/// Where and how the report is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTarget {
    pub format: OutputFormat,
    /// `None` writes to stdout.
    pub path: Option<PathBuf>,
}

impl OutputTarget {
    /// Resolve the format and destination.
    ///
    /// Format precedence is `--json`, then `--minimal`, then the path
    /// extension, then text. JSON and minimal reports with no explicit path
    /// go to a synthesized `<prefix>-<host>-<timestamp>.<ext>` file in the
    /// working directory.
    pub fn resolve<Tz>(
        json: bool,
        minimal: bool,
        path: Option<&str>,
        file_prefix: &str,
        hostname: &str,
        now: &DateTime<Tz>,
    ) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let path = path.filter(|p| *p != STDOUT_PATH).map(PathBuf::from);
        let explicit = if json {
            Some(OutputFormat::Json)
        } else if minimal {
            Some(OutputFormat::Minimal)
        } else {
            None
        };
        let format = OutputFormat::resolve(explicit, path.as_deref());

        let path = match (path, explicit) {
            (Some(path), _) => Some(path),
            (None, Some(format)) => Some(PathBuf::from(report_file_name(
                file_prefix,
                hostname,
                now,
                format,
            ))),
            (None, None) => None,
        };
        OutputTarget { format, path }
    }

    pub fn is_file(&self) -> bool {
        self.path.is_some()
    }

    /// Human-readable destination for status messages.
    pub fn display_name(&self) -> String {
        match &self.path {
            Some(path) => path.display().to_string(),
            None => "<stdout>".to_string(),
        }
    }

    /// Open the sink. Failure to create the file is the one fatal error.
    pub fn open(&self) -> Result<Box<dyn Write>> {
        match &self.path {
            Some(path) => {
                let file = open_file(path)?;
                Ok(Box::new(BufWriter::new(file)))
            }
            None => Ok(Box::new(io::stdout().lock())),
        }
    }
}

fn open_file(path: &Path) -> Result<File> {
    File::create(path).map_err(|source| Error::SinkUnwritable {
        path: path.to_path_buf(),
        source,
    })
}
