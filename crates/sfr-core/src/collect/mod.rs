//! Host fact collection.
//!
//! Collectors read sysfs, procfs and a handful of external tools and turn
//! what they find into the fact types the report sections render:
//! - PCI functions via `<sysfs>/bus/pci/devices/*/config`
//! - Network interfaces via `<sysfs>/class/net`, `modinfo` and `ethtool`
//! - System summary via uname, `/proc` and distribution release files
//!
//! Every source is optional. A missing file or failed command becomes an
//! absent value, logged at debug level, and never stops the report.

pub mod config_space;
pub mod net;
pub mod pci;
pub mod system;
pub mod tool_runner;

pub use config_space::ConfigSpace;
pub use net::{collect_interfaces, SOLARFLARE_DRIVERS};
pub use pci::{collect_pci_functions, PciFunction};
pub use system::{collect_summary, collect_uptime, current_user, hostname};
pub use tool_runner::{
    ToolConfig, ToolError, ToolOutput, ToolRunner, ToolRunnerBuilder, ToolSpec,
    DEFAULT_MAX_OUTPUT_BYTES, DEFAULT_TIMEOUT_SECS,
};

use regex::Regex;
use sfr_common::Error;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::debug;

/// Roots of the pseudo-filesystems collectors read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SysPaths {
    pub sysfs: PathBuf,
    pub procfs: PathBuf,
    pub etc: PathBuf,
}

impl Default for SysPaths {
    fn default() -> Self {
        SysPaths {
            sysfs: PathBuf::from("/sys"),
            procfs: PathBuf::from("/proc"),
            etc: PathBuf::from("/etc"),
        }
    }
}

impl SysPaths {
    /// Default roots, each overridable through `SFREPORT_SYSFS`,
    /// `SFREPORT_PROCFS` and `SFREPORT_ETC`.
    pub fn from_env() -> Self {
        let mut paths = SysPaths::default();
        if let Some(root) = std::env::var_os("SFREPORT_SYSFS") {
            paths.sysfs = root.into();
        }
        if let Some(root) = std::env::var_os("SFREPORT_PROCFS") {
            paths.procfs = root.into();
        }
        if let Some(root) = std::env::var_os("SFREPORT_ETC") {
            paths.etc = root.into();
        }
        paths
    }

    /// All three roots under one directory, laid out as `sys/`, `proc/`
    /// and `etc/`.
    pub fn under(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        SysPaths {
            sysfs: root.join("sys"),
            procfs: root.join("proc"),
            etc: root.join("etc"),
        }
    }
}

/// Source of external command output.
///
/// Implementations return stdout, or an empty string when the command is
/// missing, fails or times out.
pub trait CommandSource {
    fn output(&self, command: &str, args: &[&str]) -> String;
}

impl CommandSource for ToolRunner {
    fn output(&self, command: &str, args: &[&str]) -> String {
        self.run_or_empty(command, args)
    }
}

/// Read a text file, or `None` after logging why it was unavailable.
pub(crate) fn read_source(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(content) => Some(content),
        Err(e) => {
            log_unavailable(&path.display().to_string(), &e);
            None
        }
    }
}

/// Basename of a symlink's target.
pub(crate) fn link_basename(path: &Path) -> Option<String> {
    match std::fs::read_link(path) {
        Ok(target) => target
            .file_name()
            .map(|name| name.to_string_lossy().into_owned()),
        Err(e) => {
            log_unavailable(&path.display().to_string(), &e);
            None
        }
    }
}

pub(crate) fn log_unavailable(source_name: &str, reason: &dyn std::fmt::Display) {
    let err = Error::source_unavailable(source_name, reason);
    debug!(code = err.code(), category = %err.category(), "{}", err);
}

/// Compile a literal pattern once per call site.
///
/// `None` only if the pattern itself is invalid, which the unit tests rule
/// out for every pattern in this crate.
pub(crate) fn cached_regex(
    cell: &'static OnceLock<Option<Regex>>,
    pattern: &str,
) -> Option<&'static Regex> {
    cell.get_or_init(|| Regex::new(pattern).ok()).as_ref()
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_under_lays_out_roots() {
        let paths = SysPaths::under("/tmp/fake");
        assert_eq!(paths.sysfs, PathBuf::from("/tmp/fake/sys"));
        assert_eq!(paths.procfs, PathBuf::from("/tmp/fake/proc"));
        assert_eq!(paths.etc, PathBuf::from("/tmp/fake/etc"));
    }

    #[test]
    fn test_missing_source_is_none() {
        assert_eq!(read_source(Path::new("/nonexistent/sfreport/file")), None);
        assert_eq!(link_basename(Path::new("/nonexistent/sfreport/link")), None);
    }

    #[test]
    fn test_cached_regex_compiles_once() {
        static CELL: OnceLock<Option<Regex>> = OnceLock::new();
        let first = cached_regex(&CELL, r"^\d+$").unwrap();
        let second = cached_regex(&CELL, r"ignored").unwrap();
        assert!(std::ptr::eq(first, second));
        assert!(first.is_match("42"));
    }
}
