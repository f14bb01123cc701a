//! sfreport - AMD Solarflare system report
//!
//! Collects host, PCI and network-interface facts and writes them as a
//! text, HTML, JSON or minimal CSV report.

use chrono::Local;
use clap::Parser;
use sfr_common::Error;
use sfr_core::collect::{self, SysPaths, ToolRunnerBuilder, DEFAULT_TIMEOUT_SECS};
use sfr_core::exit_codes::ExitCode;
use sfr_core::logging::{init_logging, LogConfig, LogFormat, LogLevel};
use sfr_core::output::OutputTarget;
use sfr_core::report;
use sfr_report::{ReportConfig, ReportMetadata};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, error};

/// AMD Solarflare system report tool
#[derive(Parser, Debug)]
#[command(name = "sfreport")]
#[command(about, long_about = None)]
#[command(disable_version_flag = true)]
struct Cli {
    /// Generate minimal CSV output
    #[arg(short, long)]
    minimal: bool,

    /// Generate JSON output
    #[arg(short, long)]
    json: bool,

    /// Show version information
    #[arg(short = 'v', long = "version")]
    version: bool,

    /// Output file path (default: stdout)
    #[arg(value_name = "OUTPUT_FILE")]
    output_file: Option<String>,

    /// Report configuration file (JSON)
    #[arg(long, env = "SFREPORT_CONFIG")]
    config: Option<PathBuf>,

    /// Seconds before an external command is abandoned
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    command_timeout: u64,

    /// Increase log verbosity (--verbose, --verbose --verbose, ...)
    #[arg(long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all log output
    #[arg(short, long)]
    quiet: bool,

    /// Log format on stderr
    #[arg(long, value_enum)]
    log_format: Option<LogFormat>,
}

fn load_config(path: Option<&Path>) -> Result<ReportConfig, Error> {
    let Some(path) = path else {
        return Ok(ReportConfig::default());
    };
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
    ReportConfig::from_json(&content)
        .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
}

fn run(cli: &Cli) -> ExitCode {
    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("sfreport: {}", e);
            return ExitCode::from(&e);
        }
    };

    if cli.version {
        eprintln!("{} (version {})", config.title, config.version);
        return ExitCode::Clean;
    }

    if !collect::system::is_root() {
        eprintln!("WARNING: This script will not provide a full report");
        eprintln!("unless you run it as root.");
    }

    let hostname = collect::hostname();
    let now = Local::now();
    let target = OutputTarget::resolve(
        cli.json,
        cli.minimal,
        cli.output_file.as_deref(),
        &config.file_prefix,
        &hostname,
        &now,
    );
    debug!(format = %target.format, destination = %target.display_name(), "output resolved");

    let metadata = ReportMetadata::new(
        config.title.clone(),
        config.version.clone(),
        hostname,
        collect::current_user(),
        &now,
    );
    if target.is_file() {
        eprintln!("{}", metadata.banner());
    }

    let sink = match target.open() {
        Ok(sink) => sink,
        Err(e) => {
            let reason = match &e {
                Error::SinkUnwritable { source, .. } => source.to_string(),
                other => other.to_string(),
            };
            eprintln!("{}\nopen: {}", e.headline(), reason);
            return ExitCode::from(&e);
        }
    };

    let runner = ToolRunnerBuilder::new()
        .timeout(Duration::from_secs(cli.command_timeout))
        .build();
    let paths = SysPaths::from_env();

    if let Err(e) = report::generate(sink, target.format, metadata, &config, &paths, &runner) {
        error!(error = %e, "failed to write report");
        eprintln!("sfreport: failed to write report: {}", e);
        return ExitCode::OutputError;
    }

    if target.is_file() {
        eprintln!("Finished writing report to {}", target.display_name());
    }
    ExitCode::Clean
}

fn main() {
    let cli = Cli::parse();

    let log_config = LogConfig::from_env(
        LogLevel::from_verbosity(cli.verbose, cli.quiet),
        cli.log_format,
    );
    init_logging(&log_config);

    let code = run(&cli);
    debug!(exit = code.as_i32(), code = code.code_name(), "exiting");
    std::process::exit(code.as_i32());
}
