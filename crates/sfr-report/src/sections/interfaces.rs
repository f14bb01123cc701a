//! Network interface section.

use crate::table::{Row, Table};
use serde::{Deserialize, Serialize};

/// Driver facts of one network interface.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceFacts {
    /// Kernel interface name.
    pub name: String,
    /// Bound driver.
    pub driver: String,
    /// PCI bus address of the underlying device.
    pub bus_info: Option<String>,
    pub driver_version: Option<String>,
    /// Controller firmware version.
    pub firmware_version: Option<String>,
    pub mac_address: Option<String>,
}

/// Table of interfaces bound to Solarflare drivers.
pub struct InterfacesSection;

impl InterfacesSection {
    pub const TITLE: &'static str = "Network interfaces for AMD Solarflare adapters";
    pub const ID: &'static str = "network_interfaces";
    pub const ATTRIBUTES: [&'static str; 4] =
        ["name", "address", "driver_version", "controller_version"];

    /// One line per interface.
    pub fn table(interfaces: &[InterfaceFacts]) -> Table {
        let rows = interfaces.iter().map(|iface| {
            Row::new()
                .with("name", &iface.name)
                .with("address", iface.bus_info.clone())
                .with("driver_version", iface.driver_version.clone())
                .with("controller_version", iface.firmware_version.clone())
        });
        Table::new(Self::TITLE, &Self::ATTRIBUTES)
            .with_id(Self::ID)
            .with_rows(rows)
    }
}
