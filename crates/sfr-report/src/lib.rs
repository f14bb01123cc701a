//! Fact-to-report rendering engine for sfreport.
//!
//! Takes already-collected host facts and renders them into one of four
//! parallel encodings from a single tabular model.
//!
//! # Formats
//!
//! - Text: column-aligned tables with `=` rules
//! - HTML: standalone page with collapsible sections
//! - Minimal: bare CSV inventory
//! - JSON: one document written after all sections are collected
//!
//! # Example
//!
//! ```
//! use sfr_common::OutputFormat;
//! use sfr_report::{ReportAssembler, ReportConfig, ReportMetadata, Row, Table};
//!
//! let config = ReportConfig::default();
//! let meta = ReportMetadata::new(&config.title, &config.version, "node1", "ROOT USER", &chrono::Utc::now());
//! let mut out = Vec::new();
//! let mut assembler = ReportAssembler::new(&mut out, OutputFormat::Text, meta, &config);
//! assembler
//!     .add_table(Table::new("Interfaces", &["name"]).with_rows(vec![Row::new().with("name", "eth0")]))
//!     .unwrap();
//! assembler.finish().unwrap();
//! ```

pub mod assembler;
pub mod config;
pub mod error;
pub mod render;
pub mod report;
pub mod sections;
pub mod table;

pub use assembler::{AssemblerState, ReportAssembler};
pub use config::{ReportConfig, ReportSections};
pub use error::{ReportError, Result};
pub use render::{renderer_for, Renderer};
pub use report::{Report, ReportMetadata, Section, SectionBody};
pub use sections::{
    DevicesSection, InterfaceFacts, InterfacesSection, InventorySection, MemorySummary,
    PciDeviceFacts, SystemSummary,
};
pub use table::{Cell, Orientation, Row, Table, ValueFormat};
