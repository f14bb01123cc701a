//! Collector tests against a fake sysfs tree.

use sfr_common::OutputFormat;
use sfr_core::collect::{self, CommandSource, SysPaths};
use sfr_core::report;
use sfr_report::{Cell, InventorySection, ReportConfig, ReportMetadata};
use std::collections::HashMap;
use std::fs;
use std::os::unix::fs::symlink;
use std::path::Path;
use tempfile::TempDir;

/// Canned command output keyed by the full command line.
#[derive(Default)]
struct Canned(HashMap<String, String>);

impl Canned {
    fn with(mut self, line: &str, output: &str) -> Self {
        self.0.insert(line.to_string(), output.to_string());
        self
    }
}

impl CommandSource for Canned {
    fn output(&self, command: &str, args: &[&str]) -> String {
        let line = std::iter::once(command)
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");
        self.0.get(&line).cloned().unwrap_or_default()
    }
}

fn config_header(vendor: u16, device: u16, revision: u8, class: u16, subsys: (u16, u16)) -> Vec<u8> {
    let mut bytes = vec![0u8; 256];
    bytes[0..2].copy_from_slice(&vendor.to_le_bytes());
    bytes[2..4].copy_from_slice(&device.to_le_bytes());
    bytes[8] = revision;
    bytes[0x0a..0x0c].copy_from_slice(&class.to_le_bytes());
    bytes[0x2c..0x2e].copy_from_slice(&subsys.0.to_le_bytes());
    bytes[0x2e..0x30].copy_from_slice(&subsys.1.to_le_bytes());
    bytes
}

fn add_pci(sys: &Path, address: &str, config: Option<&[u8]>, driver: Option<&str>) {
    let dir = sys.join("bus/pci/devices").join(address);
    fs::create_dir_all(&dir).unwrap();
    if let Some(config) = config {
        fs::write(dir.join("config"), config).unwrap();
    }
    if let Some(driver) = driver {
        symlink(format!("../../../bus/pci/drivers/{driver}"), dir.join("driver")).unwrap();
    }
}

fn add_iface(sys: &Path, name: &str, pci_address: Option<&str>, mac: &str) {
    let dir = sys.join("class/net").join(name);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("address"), format!("{mac}\n")).unwrap();
    if let Some(address) = pci_address {
        symlink(sys.join("bus/pci/devices").join(address), dir.join("device")).unwrap();
    }
}

/// Two Solarflare ports, one Intel port, loopback and some noise.
fn fake_host() -> (TempDir, SysPaths) {
    let root = tempfile::tempdir().unwrap();
    let paths = SysPaths::under(root.path());
    let sys = &paths.sysfs;

    let sfc = config_header(0x1924, 0x0a03, 0x02, 0x0200, (0x1924, 0x8022));
    add_pci(sys, "0000:01:00.0", Some(&sfc), Some("sfc"));
    // Unprivileged-style short read.
    add_pci(sys, "0000:01:00.1", Some(&sfc[..8]), Some("sfc"));
    let intel = config_header(0x8086, 0x1572, 0x01, 0x0200, (0x8086, 0x0000));
    add_pci(sys, "0000:02:00.0", Some(&intel), Some("i40e"));
    let xilinx_fpga = config_header(0x10ee, 0x5000, 0x00, 0x1180, (0x10ee, 0x000e));
    add_pci(sys, "0000:03:00.0", Some(&xilinx_fpga), None);
    add_pci(sys, "0000:04:00.0", None, None);
    fs::create_dir_all(sys.join("bus/pci/devices/pci0000:00")).unwrap();

    add_iface(sys, "enp1s0f0np0", Some("0000:01:00.0"), "00:0f:53:01:02:03");
    add_iface(sys, "enp1s0f1np1", Some("0000:01:00.1"), "00:0f:53:01:02:04");
    add_iface(sys, "enp2s0f0", Some("0000:02:00.0"), "3c:fd:fe:00:00:01");
    add_iface(sys, "lo", None, "00:00:00:00:00:00");

    (root, paths)
}

fn commands() -> Canned {
    Canned::default()
        .with("modinfo -F version sfc", "5.3.12.1000\n")
        .with(
            "ethtool -i enp1s0f0np0",
            "driver: sfc\nversion: 5.3.12.1000\nfirmware-version: 8.2.1.1003 rx1 tx1\nbus-info: 0000:01:00.0\n",
        )
}

#[test]
fn pci_selects_solarflare_functions_in_order() {
    let (_root, paths) = fake_host();
    let devices = collect::collect_pci_functions(&paths.sysfs);

    let addresses: Vec<&str> = devices.iter().map(|d| d.address.as_str()).collect();
    assert_eq!(addresses, ["0000:01:00.0", "0000:01:00.1"]);

    assert_eq!(devices[0].device_id_text(), "1924:0a03");
    assert_eq!(devices[0].revision_text(), "02");
    assert_eq!(devices[0].subsystem_id_text(), "1924:8022");

    // Short config read: identity survives, later fields read as zero.
    assert_eq!(devices[1].device_id_text(), "1924:0a03");
    assert_eq!(devices[1].revision_text(), "00");
    assert_eq!(devices[1].subsystem_id_text(), "0000:0000");
}

#[test]
fn scan_skips_non_addresses_and_missing_config() {
    let (_root, paths) = fake_host();
    let all = collect::pci::scan_functions(&paths.sysfs);
    let addresses: Vec<&str> = all.iter().map(|f| f.address.as_str()).collect();
    assert_eq!(
        addresses,
        ["0000:01:00.0", "0000:01:00.1", "0000:02:00.0", "0000:03:00.0"]
    );
}

#[test]
fn interfaces_bound_to_sfc_with_fallbacks() {
    let (_root, paths) = fake_host();
    let interfaces = collect::collect_interfaces(&paths.sysfs, &commands());

    let names: Vec<&str> = interfaces.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, ["enp1s0f0np0", "enp1s0f1np1"]);

    let first = &interfaces[0];
    assert_eq!(first.driver, "sfc");
    assert_eq!(first.driver_version.as_deref(), Some("5.3.12.1000"));
    assert_eq!(first.firmware_version.as_deref(), Some("8.2.1.1003 rx1 tx1"));
    assert_eq!(first.bus_info.as_deref(), Some("0000:01:00.0"));
    assert_eq!(first.mac_address.as_deref(), Some("00:0f:53:01:02:03"));

    // No ethtool output: bus address from the device link, firmware unknown.
    let second = &interfaces[1];
    assert_eq!(second.bus_info.as_deref(), Some("0000:01:00.1"));
    assert_eq!(second.firmware_version.as_deref(), Some("unknown"));
    assert_eq!(second.driver_version.as_deref(), Some("5.3.12.1000"));
}

#[test]
fn driver_version_unknown_without_modinfo() {
    let (_root, paths) = fake_host();
    let interfaces = collect::collect_interfaces(&paths.sysfs, &Canned::default());
    assert!(interfaces
        .iter()
        .all(|i| i.driver_version.as_deref() == Some("unknown")));
}

#[test]
fn inventory_joins_interfaces_to_devices() {
    let (_root, paths) = fake_host();
    let devices = collect::collect_pci_functions(&paths.sysfs);
    let interfaces = collect::collect_interfaces(&paths.sysfs, &commands());

    let table = InventorySection::table("inventory", &interfaces, &devices);
    assert_eq!(table.rows().len(), 2);
    let row = &table.rows()[1];
    assert_eq!(row.get("name"), &Cell::from("enp1s0f1np1"));
    assert_eq!(row.get("device_id"), &Cell::from("1924:0a03"));
    assert_eq!(row.get("pci_address"), &Cell::from("0000:01:00.1"));
    assert_eq!(row.get("mac_address"), &Cell::from("00:0f:53:01:02:04"));
}

#[test]
fn full_json_report_from_fake_host() {
    let (_root, paths) = fake_host();
    fs::create_dir_all(&paths.procfs).unwrap();
    fs::write(paths.procfs.join("cmdline"), "ro quiet sfc.rss_cpus=4\n").unwrap();
    fs::write(
        paths.procfs.join("meminfo"),
        "MemTotal:       8388608 kB\nMemFree:        2097152 kB\n",
    )
    .unwrap();

    let metadata = ReportMetadata::new(
        "AMD Solarflare system report",
        "4.16.1",
        "fakehost",
        "ROOT USER",
        &chrono::Utc::now(),
    );
    let mut out = Vec::new();
    report::generate(
        &mut out,
        OutputFormat::Json,
        metadata,
        &ReportConfig::default(),
        &paths,
        &commands().with("uptime", " 12:00:00 up 1 day\n"),
    )
    .unwrap();

    let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(value["report_info"]["hostname"], "fakehost");
    assert_eq!(
        value["system_summary"]["kernel_command_line"],
        "ro quiet sfc.rss_cpus=4"
    );
    assert_eq!(value["system_summary"]["memory"]["total_physical_mb"], 8192);
    assert_eq!(value["uptime"]["text"], "12:00:00 up 1 day");
    assert_eq!(value["pci_device_sfc"]["data"].as_array().unwrap().len(), 2);
    assert_eq!(
        value["network_interfaces"]["data"][0]["controller_version"],
        "8.2.1.1003 rx1 tx1"
    );
}
