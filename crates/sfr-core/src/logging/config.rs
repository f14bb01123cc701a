//! Log level and format selection.
//!
//! Sources, lowest precedence first:
//! - `RUST_LOG` (only the most verbose level word it mentions)
//! - `SFREPORT_LOG`, `SFREPORT_LOG_FORMAT`
//! - `--verbose`, `--quiet`, `--log-format`

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::Level;
use tracing_subscriber::filter::LevelFilter;

/// Encoding of log lines on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Plain console lines.
    #[default]
    Human,
    /// One JSON object per line.
    Jsonl,
}

impl LogFormat {
    const ALIASES: [(LogFormat, &'static [&'static str]); 2] = [
        (LogFormat::Human, &["human", "console", "pretty", "text"]),
        (LogFormat::Jsonl, &["jsonl", "json"]),
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LogFormat::Human => "human",
            LogFormat::Jsonl => "jsonl",
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALIASES
            .iter()
            .find(|(_, names)| names.contains(&wanted.as_str()))
            .map(|(format, _)| *format)
            .ok_or_else(|| format!("unknown log format '{s}'"))
    }
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Minimum severity that reaches stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    /// Only problems an operator should see.
    #[default]
    Warn,
    Error,
    Off,
}

impl LogLevel {
    const ALIASES: [(LogLevel, &'static [&'static str]); 6] = [
        (LogLevel::Trace, &["trace"]),
        (LogLevel::Debug, &["debug"]),
        (LogLevel::Info, &["info"]),
        (LogLevel::Warn, &["warn", "warning"]),
        (LogLevel::Error, &["error"]),
        (LogLevel::Off, &["off", "none", "quiet"]),
    ];

    /// Map `--verbose` repetitions and `--quiet` onto a level. `None` means
    /// no CLI override.
    pub fn from_verbosity(verbose: u8, quiet: bool) -> Option<Self> {
        if quiet {
            return Some(LogLevel::Off);
        }
        match verbose {
            0 => None,
            1 => Some(LogLevel::Info),
            2 => Some(LogLevel::Debug),
            _ => Some(LogLevel::Trace),
        }
    }

    pub fn as_str(self) -> &'static str {
        Self::ALIASES
            .iter()
            .find(|(level, _)| *level == self)
            .and_then(|(_, names)| names.first())
            .copied()
            .unwrap_or("warn")
    }

    /// The tracing level, or `None` when logging is off.
    pub fn tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Trace => Some(Level::TRACE),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Off => None,
        }
    }

    /// Most verbose level word mentioned in a `RUST_LOG` value.
    fn from_rust_log(value: &str) -> Option<Self> {
        let value = value.to_ascii_lowercase();
        [
            LogLevel::Trace,
            LogLevel::Debug,
            LogLevel::Info,
            LogLevel::Warn,
            LogLevel::Error,
        ]
        .into_iter()
        .find(|level| value.contains(level.as_str()))
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALIASES
            .iter()
            .find(|(_, names)| names.contains(&wanted.as_str()))
            .map(|(level, _)| *level)
            .ok_or_else(|| format!("unknown log level '{s}'"))
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        LevelFilter::from(level.tracing_level())
    }
}

/// Resolved logging settings for one run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LogConfig {
    pub format: LogFormat,
    pub level: LogLevel,
    /// Prefix human lines with a timestamp.
    pub timestamps: bool,
}

impl LogConfig {
    /// Read the environment, then apply CLI overrides.
    pub fn from_env(cli_level: Option<LogLevel>, cli_format: Option<LogFormat>) -> Self {
        let var = |name: &str| std::env::var(name).ok();
        Self::from_vars(
            var("SFREPORT_LOG").as_deref(),
            var("RUST_LOG").as_deref(),
            var("SFREPORT_LOG_FORMAT").as_deref(),
            cli_level,
            cli_format,
        )
    }

    /// Resolve from explicit values. Unparseable values are ignored.
    pub fn from_vars(
        sfreport_log: Option<&str>,
        rust_log: Option<&str>,
        log_format: Option<&str>,
        cli_level: Option<LogLevel>,
        cli_format: Option<LogFormat>,
    ) -> Self {
        let env_level = sfreport_log
            .and_then(|v| v.parse().ok())
            .or_else(|| rust_log.and_then(LogLevel::from_rust_log));
        let env_format = log_format.and_then(|v| v.parse().ok());

        LogConfig {
            level: cli_level.or(env_level).unwrap_or_default(),
            format: cli_format.or(env_format).unwrap_or_default(),
            timestamps: false,
        }
    }

    pub fn with_format(self, format: LogFormat) -> Self {
        LogConfig { format, ..self }
    }

    pub fn with_level(self, level: LogLevel) -> Self {
        LogConfig { level, ..self }
    }

    pub fn with_timestamps(self, timestamps: bool) -> Self {
        LogConfig { timestamps, ..self }
    }
}
