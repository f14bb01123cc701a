//! Flat inventory used by the minimal CSV report.

use super::devices::PciDeviceFacts;
use super::interfaces::InterfaceFacts;
use crate::table::{Row, Table};

/// One line per interface, joined with its PCI function by bus address.
pub struct InventorySection;

impl InventorySection {
    pub const ID: &'static str = "inventory";
    pub const ATTRIBUTES: [&'static str; 9] = [
        "name",
        "device_id",
        "revision",
        "subsys_id",
        "driver",
        "pci_address",
        "driver_version",
        "controller_version",
        "mac_address",
    ];

    /// Build the inventory table. Interfaces whose bus address matches no
    /// device leave the PCI columns absent.
    pub fn table(
        title: &str,
        interfaces: &[InterfaceFacts],
        devices: &[PciDeviceFacts],
    ) -> Table {
        let rows = interfaces.iter().map(|iface| {
            let device = iface
                .bus_info
                .as_deref()
                .and_then(|bus| devices.iter().find(|dev| dev.address == bus));
            Row::new()
                .with("name", &iface.name)
                .with("device_id", device.map(PciDeviceFacts::device_id_text))
                .with("revision", device.map(PciDeviceFacts::revision_text))
                .with("subsys_id", device.map(PciDeviceFacts::subsystem_id_text))
                .with("driver", &iface.driver)
                .with("pci_address", iface.bus_info.clone())
                .with("driver_version", iface.driver_version.clone())
                .with("controller_version", iface.firmware_version.clone())
                .with("mac_address", iface.mac_address.clone())
        });
        Table::new(title, &Self::ATTRIBUTES)
            .with_id(Self::ID)
            .with_rows(rows)
    }
}
