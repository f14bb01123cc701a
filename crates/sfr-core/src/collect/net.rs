//! Network interfaces bound to Solarflare drivers.

use super::{link_basename, log_unavailable, read_source, CommandSource};
use sfr_report::InterfaceFacts;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Kernel drivers that bind Solarflare and Xilinx Ethernet functions.
pub const SOLARFLARE_DRIVERS: [&str; 3] = ["sfc", "sfc_ef100", "xilinx_efct"];

/// Placeholder for a version or address no source could supply.
pub const UNKNOWN: &str = "unknown";

/// Fields of `ethtool -i` output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DriverInfo {
    pub driver: Option<String>,
    pub version: Option<String>,
    pub firmware_version: Option<String>,
    pub bus_info: Option<String>,
}

/// Parse `ethtool -i` output. Empty values are treated as missing.
pub fn parse_driver_info(content: &str) -> DriverInfo {
    let mut info = DriverInfo::default();
    for line in content.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        let slot = match key.trim() {
            "driver" => &mut info.driver,
            "version" => &mut info.version,
            "firmware-version" => &mut info.firmware_version,
            "bus-info" => &mut info.bus_info,
            _ => continue,
        };
        *slot = Some(value.to_string());
    }
    info
}

fn first_line(output: &str) -> Option<String> {
    output
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}

/// Facts for one interface, or `None` if it is not bound to a Solarflare
/// driver.
pub fn read_interface(
    iface_dir: &Path,
    name: &str,
    commands: &dyn CommandSource,
) -> Option<InterfaceFacts> {
    let driver = link_basename(&iface_dir.join("device/driver"))?;
    if !SOLARFLARE_DRIVERS.contains(&driver.as_str()) {
        return None;
    }

    let ethtool = parse_driver_info(&commands.output("ethtool", &["-i", name]));
    let driver_version = first_line(&commands.output("modinfo", &["-F", "version", driver.as_str()]))
        .or(ethtool.version)
        .unwrap_or_else(|| UNKNOWN.to_string());
    let firmware_version = ethtool
        .firmware_version
        .unwrap_or_else(|| UNKNOWN.to_string());
    let bus_info = ethtool
        .bus_info
        .or_else(|| link_basename(&iface_dir.join("device")))
        .unwrap_or_else(|| UNKNOWN.to_string());
    let mac_address = read_source(&iface_dir.join("address"))
        .map(|content| content.trim().to_string())
        .filter(|mac| !mac.is_empty());

    Some(InterfaceFacts {
        name: name.to_string(),
        driver,
        bus_info: Some(bus_info),
        driver_version: Some(driver_version),
        firmware_version: Some(firmware_version),
        mac_address,
    })
}

/// Solarflare interfaces under `<sysfs>/class/net`, sorted by name.
pub fn collect_interfaces(sysfs: &Path, commands: &dyn CommandSource) -> Vec<InterfaceFacts> {
    let net_dir = sysfs.join("class/net");
    let entries = match fs::read_dir(&net_dir) {
        Ok(entries) => entries,
        Err(e) => {
            log_unavailable(&net_dir.display().to_string(), &e);
            return Vec::new();
        }
    };

    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();

    let interfaces: Vec<InterfaceFacts> = names
        .iter()
        .filter_map(|name| read_interface(&net_dir.join(name), name, commands))
        .collect();
    debug!(count = interfaces.len(), "collected Solarflare interfaces");
    interfaces
}
