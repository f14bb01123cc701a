//! PCI function discovery through sysfs.

use super::{cached_regex, log_unavailable, ConfigSpace};
use regex::Regex;
use sfr_report::PciDeviceFacts;
use std::fs::{self, File};
use std::path::Path;
use std::sync::OnceLock;
use tracing::debug;

/// Solarflare Communications.
pub const SOLARFLARE_VENDOR_ID: u16 = 0x1924;
/// Xilinx, which ships Solarflare-derived Ethernet controllers.
pub const XILINX_VENDOR_ID: u16 = 0x10ee;
/// Ethernet controller class and subclass.
pub const ETHERNET_CLASS: u16 = 0x0200;

/// Domain-qualified bus address, e.g. `0000:01:00.0`.
const ADDRESS_PATTERN: &str = r"^[0-9a-f]{4}:";
static ADDRESS_RE: OnceLock<Option<Regex>> = OnceLock::new();

/// One PCI function and its configuration-space snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PciFunction {
    pub address: String,
    pub config: ConfigSpace,
}

impl PciFunction {
    pub fn new(address: impl Into<String>, config: ConfigSpace) -> Self {
        PciFunction {
            address: address.into(),
            config,
        }
    }

    /// Solarflare vendor ID, or a Xilinx Ethernet controller.
    pub fn is_solarflare(&self) -> bool {
        match self.config.vendor_id() {
            SOLARFLARE_VENDOR_ID => true,
            XILINX_VENDOR_ID => self.config.device_class() == ETHERNET_CLASS,
            _ => false,
        }
    }

    pub fn facts(&self) -> PciDeviceFacts {
        PciDeviceFacts {
            address: self.address.clone(),
            vendor_id: self.config.vendor_id(),
            device_id: self.config.device_id(),
            revision: self.config.revision(),
            subsystem_vendor_id: self.config.subsystem_vendor_id(),
            subsystem_id: self.config.subsystem_id(),
        }
    }
}

fn is_bus_address(name: &str) -> bool {
    cached_regex(&ADDRESS_RE, ADDRESS_PATTERN).is_some_and(|re| re.is_match(name))
}

/// Read one function's `config` file.
pub fn read_function(device_dir: &Path, address: &str) -> Option<PciFunction> {
    let path = device_dir.join("config");
    let config = File::open(&path)
        .map_err(sfr_common::Error::from)
        .and_then(ConfigSpace::from_reader);
    match config {
        Ok(config) => Some(PciFunction::new(address, config)),
        Err(e) => {
            log_unavailable(&path.display().to_string(), &e);
            None
        }
    }
}

/// Every PCI function under `<sysfs>/bus/pci/devices`, sorted by address.
pub fn scan_functions(sysfs: &Path) -> Vec<PciFunction> {
    let devices_dir = sysfs.join("bus/pci/devices");
    let entries = match fs::read_dir(&devices_dir) {
        Ok(entries) => entries,
        Err(e) => {
            log_unavailable(&devices_dir.display().to_string(), &e);
            return Vec::new();
        }
    };

    let mut functions: Vec<PciFunction> = entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let address = entry.file_name().to_string_lossy().into_owned();
            if !is_bus_address(&address) {
                return None;
            }
            read_function(&entry.path(), &address)
        })
        .collect();
    functions.sort_by(|a, b| a.address.cmp(&b.address));
    functions
}

/// Solarflare PCI functions, ready for the device inventory.
pub fn collect_pci_functions(sysfs: &Path) -> Vec<PciDeviceFacts> {
    let devices: Vec<PciDeviceFacts> = scan_functions(sysfs)
        .iter()
        .filter(|function| function.is_solarflare())
        .map(PciFunction::facts)
        .collect();
    debug!(count = devices.len(), "collected Solarflare PCI functions");
    devices
}
