//! Report section data structures.
//!
//! Each section turns already-collected facts into a [`Table`](crate::Table).
//! Nothing here reads the host.

pub mod devices;
pub mod interfaces;
pub mod inventory;
pub mod summary;

pub use devices::{DevicesSection, PciDeviceFacts};
pub use interfaces::{InterfaceFacts, InterfacesSection};
pub use inventory::InventorySection;
pub use summary::{MemorySummary, SystemSummary};
