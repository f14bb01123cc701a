//! PCI device inventory section.

use crate::table::{Orientation, Row, Table};
use serde::{Deserialize, Serialize};

/// Identification fields of one PCI function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PciDeviceFacts {
    /// Bus address, e.g. `0000:01:00.0`.
    pub address: String,
    pub vendor_id: u16,
    pub device_id: u16,
    pub revision: u8,
    pub subsystem_vendor_id: u16,
    pub subsystem_id: u16,
}

impl PciDeviceFacts {
    /// `vvvv:dddd`.
    pub fn device_id_text(&self) -> String {
        format!("{:04x}:{:04x}", self.vendor_id, self.device_id)
    }

    /// Two hex digits.
    pub fn revision_text(&self) -> String {
        format!("{:02x}", self.revision)
    }

    /// `ssvv:ssdd`.
    pub fn subsystem_id_text(&self) -> String {
        format!("{:04x}:{:04x}", self.subsystem_vendor_id, self.subsystem_id)
    }
}

/// Solarflare PCI function table.
pub struct DevicesSection;

impl DevicesSection {
    pub const TITLE: &'static str = "AMD Solarflare PCI devices";
    pub const ID: &'static str = "pci_device_sfc";
    pub const ATTRIBUTES: [&'static str; 4] = ["address", "device_id", "revision", "subsystem_id"];

    /// One column per device.
    pub fn table(devices: &[PciDeviceFacts]) -> Table {
        let rows = devices.iter().map(|dev| {
            Row::new()
                .with("address", &dev.address)
                .with("device_id", dev.device_id_text())
                .with("revision", dev.revision_text())
                .with("subsystem_id", dev.subsystem_id_text())
        });
        Table::new(Self::TITLE, &Self::ATTRIBUTES)
            .with_id(Self::ID)
            .with_orientation(Orientation::Vertical)
            .with_rows(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Cell;

    #[test]
    fn test_hex_formatting() {
        let dev = PciDeviceFacts {
            address: "0000:01:00.0".into(),
            vendor_id: 0x1924,
            device_id: 0x0b03,
            revision: 0x1,
            subsystem_vendor_id: 0x1924,
            subsystem_id: 0x8022,
        };
        let table = DevicesSection::table(&[dev]);
        let row = &table.rows()[0];
        assert_eq!(row.get("device_id"), &Cell::from("1924:0b03"));
        assert_eq!(row.get("revision"), &Cell::from("01"));
        assert_eq!(row.get("subsystem_id"), &Cell::from("1924:8022"));
        assert_eq!(table.section_key(), "pci_device_sfc");
    }

    #[test]
    fn test_no_devices() {
        let table = DevicesSection::table(&[]);
        assert!(table.is_empty());
        assert_eq!(table.orientation(), Orientation::Vertical);
    }
}
