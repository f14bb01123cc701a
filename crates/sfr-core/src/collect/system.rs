//! Operating-system facts for the system summary.
//!
//! # Sources
//! - `uname(2)` - OS name, release, version, machine, node name
//! - `/proc/cmdline` - kernel command line
//! - `/proc/meminfo` - total and free physical memory
//! - `lsb_release -d`, `/etc/*-release`, `/etc/debian_version` - distribution
//! - `uptime` - free-text uptime line

use super::{cached_regex, log_unavailable, read_source, CommandSource, SysPaths};
use regex::Regex;
use sfr_report::{MemorySummary, SystemSummary};
use std::collections::HashMap;
use std::ffi::CStr;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

const LSB_DESCRIPTION_PATTERN: &str = r"^Description:\s*(.*)";
static LSB_DESCRIPTION_RE: OnceLock<Option<Regex>> = OnceLock::new();

const MEMINFO_LINE_PATTERN: &str = r"^([^:]+):\s*(\d+)\s*kB";
static MEMINFO_LINE_RE: OnceLock<Option<Regex>> = OnceLock::new();

/// Fields of `uname(2)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Uname {
    pub sysname: String,
    pub nodename: String,
    pub release: String,
    pub version: String,
    pub machine: String,
}

fn c_field(field: &[libc::c_char]) -> String {
    // SAFETY: uname NUL-terminates every field within its fixed-size array.
    unsafe { CStr::from_ptr(field.as_ptr()) }
        .to_string_lossy()
        .into_owned()
}

/// Query `uname(2)`; `None` if the call fails.
pub fn uname() -> Option<Uname> {
    let mut uname = std::mem::MaybeUninit::<libc::utsname>::uninit();
    // SAFETY: the pointer refers to writable storage sized for utsname.
    if unsafe { libc::uname(uname.as_mut_ptr()) } != 0 {
        log_unavailable("uname", &std::io::Error::last_os_error());
        return None;
    }
    // SAFETY: uname returned 0, so every field is initialized.
    let raw = unsafe { uname.assume_init() };
    Some(Uname {
        sysname: c_field(&raw.sysname),
        nodename: c_field(&raw.nodename),
        release: c_field(&raw.release),
        version: c_field(&raw.version),
        machine: c_field(&raw.machine),
    })
}

/// Host name as reported by the kernel.
pub fn hostname() -> String {
    uname()
        .map(|u| u.nodename)
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "localhost".to_string())
}

/// `ROOT USER` when running with effective uid 0.
pub fn current_user() -> &'static str {
    if is_root() {
        "ROOT USER"
    } else {
        "NON-ROOT USER"
    }
}

pub fn is_root() -> bool {
    // SAFETY: geteuid has no preconditions and cannot fail.
    unsafe { libc::geteuid() == 0 }
}

/// Parse `/proc/meminfo` into kB values keyed by field name.
pub fn parse_meminfo_content(content: &str) -> HashMap<String, u64> {
    let Some(re) = cached_regex(&MEMINFO_LINE_RE, MEMINFO_LINE_PATTERN) else {
        return HashMap::new();
    };
    content
        .lines()
        .filter_map(|line| {
            let caps = re.captures(line)?;
            let value = caps[2].parse::<u64>().ok()?;
            Some((caps[1].to_string(), value))
        })
        .collect()
}

/// Total and free memory in MB, if both are present.
pub fn memory_summary(content: &str) -> Option<MemorySummary> {
    let fields = parse_meminfo_content(content);
    Some(MemorySummary {
        total_physical_mb: fields.get("MemTotal")? / 1024,
        free_physical_mb: fields.get("MemFree")? / 1024,
    })
}

/// Description from `lsb_release -d` output.
pub fn parse_lsb_description(output: &str) -> Option<String> {
    let re = cached_regex(&LSB_DESCRIPTION_RE, LSB_DESCRIPTION_PATTERN)?;
    let caps = re.captures(output)?;
    Some(caps[1].trim_end().to_string()).filter(|d| !d.is_empty())
}

/// First line of the first `*-release` file in `etc`, by name.
fn release_file_line(etc: &Path) -> Option<String> {
    let entries = match fs::read_dir(etc) {
        Ok(entries) => entries,
        Err(e) => {
            log_unavailable(&etc.display().to_string(), &e);
            return None;
        }
    };
    let mut release_files: Vec<_> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.ends_with("-release"))
        })
        .collect();
    release_files.sort();

    let content = read_source(release_files.first()?)?;
    content
        .lines()
        .next()
        .map(str::to_string)
        .filter(|line| !line.is_empty())
}

/// Distribution name, trying each source in turn.
pub fn distribution(etc: &Path, commands: &dyn CommandSource) -> Option<String> {
    parse_lsb_description(&commands.output("lsb_release", &["-d"]))
        .or_else(|| release_file_line(etc))
        .or_else(|| {
            let version = read_source(&etc.join("debian_version"))?;
            Some(format!("Debian {}", version.trim()))
        })
}

/// Gather the system summary. Missing optional sources leave their fields
/// out.
pub fn collect_summary(paths: &SysPaths, commands: &dyn CommandSource) -> SystemSummary {
    let uts = uname().unwrap_or_default();
    let kernel_command_line = read_source(&paths.procfs.join("cmdline"))
        .map(|content| content.trim().to_string())
        .filter(|cmdline| !cmdline.is_empty());
    let memory = read_source(&paths.procfs.join("meminfo")).and_then(|c| memory_summary(&c));

    SystemSummary {
        os_name: uts.sysname,
        version: format!("{} {}", uts.release, uts.version),
        architecture: uts.machine,
        system_name: hostname(),
        kernel_command_line,
        distribution: distribution(&paths.etc, commands),
        memory,
    }
}

/// `uptime` output, trimmed; empty if the command is unavailable.
pub fn collect_uptime(commands: &dyn CommandSource) -> String {
    commands.output("uptime", &[]).trim().to_string()
}
