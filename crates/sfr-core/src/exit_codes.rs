//! Exit codes for the sfreport CLI.
//!
//! A report that cannot be opened for writing is the only failure; every
//! collection problem still produces a report and exits cleanly.

/// Process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Report written (or version printed).
    Clean = 0,

    /// The output path could not be opened for writing.
    OutputError = 1,

    /// Invalid arguments or configuration file.
    ArgsError = 2,
}

impl ExitCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Stable name for machine-readable logs.
    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::Clean => "OK_CLEAN",
            ExitCode::OutputError => "ERR_OUTPUT",
            ExitCode::ArgsError => "ERR_ARGS",
        }
    }
}

impl From<&sfr_common::Error> for ExitCode {
    fn from(err: &sfr_common::Error) -> Self {
        match err.category() {
            sfr_common::ErrorCategory::Config => ExitCode::ArgsError,
            _ => ExitCode::OutputError,
        }
    }
}
