//! End-to-end tests for the sfreport binary.
//!
//! Collection roots point at an empty temporary tree so the reports do not
//! depend on the build host's hardware.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use regex::Regex;
use std::fs;
use std::os::unix::fs::{symlink, PermissionsExt};
use std::path::Path;
use tempfile::TempDir;

const BANNER: &str = "AMD Solarflare system report (version 4.16.1)";

/// sfreport with sysfs, procfs and /etc redirected under `root`.
fn sfreport(root: &Path) -> Command {
    sfreport_with_timeout(root, 5)
}

fn sfreport_with_timeout(root: &Path, secs: u64) -> Command {
    let mut cmd = cargo_bin_cmd!("sfreport");
    cmd.env("SFREPORT_SYSFS", root.join("sys"))
        .env("SFREPORT_PROCFS", root.join("proc"))
        .env("SFREPORT_ETC", root.join("etc"))
        .env_remove("SFREPORT_CONFIG")
        .env_remove("SFREPORT_LOG")
        .env_remove("RUST_LOG")
        .args(["--command-timeout", secs.to_string().as_str()]);
    cmd
}

/// An `sfc`-bound interface under `<root>/sys`.
fn add_sfc_interface(root: &Path, name: &str, pci_address: &str) {
    let device = root.join("sys/bus/pci/devices").join(pci_address);
    fs::create_dir_all(&device).unwrap();
    symlink("../../../bus/pci/drivers/sfc", device.join("driver")).unwrap();

    let iface = root.join("sys/class/net").join(name);
    fs::create_dir_all(&iface).unwrap();
    fs::write(iface.join("address"), "00:0f:53:00:00:01\n").unwrap();
    symlink(&device, iface.join("device")).unwrap();
}

/// Executable shell script `name` in `bin`.
fn fake_tool(bin: &Path, name: &str, body: &str) {
    fs::create_dir_all(bin).unwrap();
    let path = bin.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
}

fn is_root() -> bool {
    // SAFETY: geteuid has no preconditions.
    unsafe { libc::geteuid() == 0 }
}

fn scratch() -> TempDir {
    tempfile::tempdir().expect("tempdir")
}

mod version {
    use super::*;

    #[test]
    fn short_flag_prints_banner_to_stderr() {
        let dir = scratch();
        sfreport(dir.path())
            .arg("-v")
            .assert()
            .success()
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::contains(BANNER));
    }

    #[test]
    fn long_flag_prints_banner() {
        let dir = scratch();
        sfreport(dir.path())
            .arg("--version")
            .assert()
            .code(0)
            .stderr(predicate::str::contains(BANNER));
    }

    #[test]
    fn unknown_flag_rejected() {
        let dir = scratch();
        sfreport(dir.path())
            .arg("--no-such-flag")
            .assert()
            .failure();
    }
}

mod formats {
    use super::*;

    #[test]
    fn text_to_stdout_by_default() {
        let dir = scratch();
        sfreport(dir.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("System Summary"))
            .stdout(predicate::str::contains("AMD Solarflare PCI devices"))
            .stdout(predicate::str::contains(
                "Network interfaces for AMD Solarflare adapters",
            ))
            .stdout(predicate::str::contains("none found"))
            .stderr(predicate::str::contains("Finished writing").not());
    }

    #[test]
    fn non_root_warning_on_stderr_only() {
        let dir = scratch();
        let assert = sfreport(dir.path()).assert().success();
        let stderr = String::from_utf8_lossy(&assert.get_output().stderr).into_owned();
        let stdout = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();

        let warning = "WARNING: This script will not provide a full report\n\
                       unless you run it as root.\n";
        if is_root() {
            assert!(!stderr.contains("WARNING:"), "{stderr}");
        } else {
            assert!(stderr.contains(warning), "{stderr}");
        }
        assert!(!stdout.contains("WARNING:"));
    }

    #[test]
    fn json_to_explicit_file() {
        let dir = scratch();
        let out = dir.path().join("report.out");
        sfreport(dir.path())
            .arg("--json")
            .arg(&out)
            .assert()
            .success()
            .stderr(predicate::str::contains(BANNER))
            .stderr(predicate::str::contains(format!(
                "Finished writing report to {}",
                out.display()
            )));

        let content = fs::read_to_string(&out).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        let keys: Vec<&str> = value
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(
            keys,
            [
                "report_info",
                "system_summary",
                "uptime",
                "pci_device_sfc",
                "network_interfaces"
            ]
        );
        assert_eq!(value["report_info"]["version"], "4.16.1");
        assert_eq!(value["pci_device_sfc"]["data"], serde_json::json!([]));
        assert!(content.starts_with("{\n  \""));
    }

    #[test]
    fn json_extension_selects_json() {
        let dir = scratch();
        let out = dir.path().join("report.json");
        sfreport(dir.path()).arg(&out).assert().success();
        let content = fs::read_to_string(&out).unwrap();
        assert!(serde_json::from_str::<serde_json::Value>(&content).is_ok());
    }

    #[test]
    fn html_by_extension() {
        let dir = scratch();
        let out = dir.path().join("report.html");
        sfreport(dir.path()).arg(&out).assert().success();

        let html = fs::read_to_string(&out).unwrap();
        assert!(html.starts_with("<!DOCTYPE HTML PUBLIC"));
        assert!(html.ends_with("  </body>\n</html>\n"));
        assert!(html.contains("id='pci_device_sfc_c'"));
        let opened = Regex::new(r"<div style='display:(none|block)'").unwrap();
        assert_eq!(
            opened.find_iter(&html).count(),
            html.matches("</div>").count()
        );
    }

    #[test]
    fn minimal_to_explicit_file() {
        let dir = scratch();
        let out = dir.path().join("inventory.txt");
        sfreport(dir.path()).arg("-m").arg(&out).assert().success();

        let csv = fs::read_to_string(&out).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("CSV:AMD Solarflare inventory report"));
        assert_eq!(
            lines.next(),
            Some("name,device_id,revision,subsys_id,driver,pci_address,driver_version,controller_version,mac_address")
        );
        assert!(!csv.contains("System Summary"));
    }

    #[test]
    fn json_without_path_synthesizes_file_name() {
        let dir = scratch();
        sfreport(dir.path())
            .current_dir(dir.path())
            .arg("-j")
            .assert()
            .success()
            .stdout(predicate::str::is_empty());

        let name_re =
            Regex::new(r"^sfreport-.+-\d{4}-\d{2}-\d{2}-\d{2}-\d{2}-\d{2}\.json$").unwrap();
        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|name| name_re.is_match(name))
            .collect();
        assert_eq!(names.len(), 1, "{names:?}");
    }
}

mod errors {
    use super::*;

    #[test]
    fn unwritable_path_exits_one() {
        let dir = scratch();
        let out = dir.path().join("missing-dir").join("report.txt");
        sfreport(dir.path())
            .arg(&out)
            .assert()
            .code(1)
            .stderr(predicate::str::contains(
                "No write permissions on output directory.",
            ))
            .stderr(predicate::str::contains("open: "))
            .stderr(predicate::str::contains("Finished writing").not());
    }

    #[test]
    fn invalid_config_exits_two() {
        let dir = scratch();
        let config = dir.path().join("config.json");
        fs::write(&config, r#"{"file_prefix": ""}"#).unwrap();
        sfreport(dir.path())
            .arg("--config")
            .arg(&config)
            .assert()
            .code(2)
            .stderr(predicate::str::contains("configuration error"));
    }

    #[test]
    fn missing_config_exits_two() {
        let dir = scratch();
        sfreport(dir.path())
            .args(["--config", "/nonexistent/sfreport.json"])
            .assert()
            .code(2);
    }
}

mod config {
    use super::*;

    #[test]
    fn config_file_retitles_and_collapses() {
        let dir = scratch();
        let config = dir.path().join("config.json");
        fs::write(
            &config,
            r#"{"title": "Lab report", "collapsed": ["network_interfaces"]}"#,
        )
        .unwrap();
        add_sfc_interface(dir.path(), "sfc0", "0000:01:00.0");
        let out = dir.path().join("report.html");
        sfreport(dir.path())
            .env("SFREPORT_CONFIG", &config)
            .arg(&out)
            .assert()
            .success()
            .stderr(predicate::str::contains("Lab report (version 4.16.1)"));

        let html = fs::read_to_string(&out).unwrap();
        assert!(html.contains("<title>Lab report</title>"));
        assert!(html.contains("<div style='display:block' id='pci_device_sfc_c'>"));

        // Hidden sections still carry their full table.
        let hidden = "<div style='display:none' id='network_interfaces_c'>";
        let start = html.find(hidden).expect("collapsed section") + hidden.len();
        let body = &html[start..];
        let content = &body[..body.find("</div>").unwrap()];
        assert!(content.contains("<table class=\"horiz\">"), "{content}");
        assert!(content.contains("<th>controller_version</th>"), "{content}");
        assert!(content.contains("<td>sfc0</td>"), "{content}");
        assert!(content.contains("<td>0000:01:00.0</td>"), "{content}");
    }

    #[test]
    fn disabled_sections_omitted() {
        let dir = scratch();
        let config = dir.path().join("config.json");
        fs::write(&config, r#"{"sections": {"uptime": false, "summary": false}}"#).unwrap();
        let out = dir.path().join("report.json");
        sfreport(dir.path())
            .arg("--config")
            .arg(&config)
            .arg(&out)
            .assert()
            .success();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        assert!(value.get("system_summary").is_none());
        assert!(value.get("uptime").is_none());
        assert!(value.get("network_interfaces").is_some());
    }
}

mod logging {
    use super::*;

    #[test]
    fn jsonl_logs_stay_on_stderr() {
        let dir = scratch();
        let out = dir.path().join("report.json");
        let assert = sfreport(dir.path())
            .args(["--verbose", "--verbose", "--log-format", "jsonl"])
            .arg(&out)
            .assert()
            .success();

        let stderr = String::from_utf8_lossy(&assert.get_output().stderr).into_owned();
        let log_lines: Vec<&str> = stderr.lines().filter(|l| l.starts_with('{')).collect();
        assert!(!log_lines.is_empty(), "{stderr}");
        for line in log_lines {
            assert!(serde_json::from_str::<serde_json::Value>(line).is_ok(), "{line}");
        }
        assert_eq!(stderr.matches("report written").count(), 1, "{stderr}");
        assert!(serde_json::from_str::<serde_json::Value>(&fs::read_to_string(&out).unwrap()).is_ok());
    }

    #[test]
    fn hung_tool_is_not_reported() {
        let dir = scratch();
        let bin = dir.path().join("bin");
        fake_tool(&bin, "uptime", "sleep 8\necho ' 12:00:00 up 1 day'");
        let path = format!(
            "{}:{}",
            bin.display(),
            std::env::var("PATH").unwrap_or_default()
        );

        let out = dir.path().join("report.json");
        let assert = sfreport_with_timeout(dir.path(), 1)
            .env("PATH", path)
            .arg(&out)
            .assert()
            .success();

        let stderr = String::from_utf8_lossy(&assert.get_output().stderr).into_owned();
        assert!(!stderr.contains("timed out"), "{stderr}");
        assert!(!stderr.contains(" WARN "), "{stderr}");

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(value["uptime"]["text"], "");
    }

    #[test]
    fn quiet_suppresses_logs() {
        let dir = scratch();
        sfreport(dir.path())
            .args(["--quiet", "--verbose"])
            .assert()
            .success()
            .stderr(predicate::str::contains("DEBUG").not());
    }
}
