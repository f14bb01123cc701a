//! Report driver: collect host facts, then feed them to the assembler in
//! the fixed section order.

use crate::collect::{self, CommandSource, SysPaths};
use sfr_common::OutputFormat;
use sfr_report::{
    DevicesSection, InterfaceFacts, InterfacesSection, InventorySection, PciDeviceFacts,
    ReportAssembler, ReportConfig, ReportMetadata, SystemSummary,
};
use std::io::Write;
use tracing::debug;

pub const UPTIME_TITLE: &str = "System Uptime";
pub const UPTIME_ID: &str = "uptime";

/// Everything the report shows about the host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostFacts {
    pub summary: Option<SystemSummary>,
    pub uptime: Option<String>,
    pub devices: Vec<PciDeviceFacts>,
    pub interfaces: Vec<InterfaceFacts>,
}

/// Collect the facts the chosen format will render.
///
/// Minimal reports only need the device and interface inventories.
/// Disabled sections are not collected.
pub fn collect_facts(
    paths: &SysPaths,
    commands: &dyn CommandSource,
    config: &ReportConfig,
    format: OutputFormat,
) -> HostFacts {
    let sections = &config.sections;
    let minimal = format == OutputFormat::Minimal;

    let summary = (!minimal && sections.summary).then(|| collect::collect_summary(paths, commands));
    let uptime = (!minimal && sections.uptime).then(|| collect::collect_uptime(commands));
    let devices = if minimal || sections.devices {
        collect::collect_pci_functions(&paths.sysfs)
    } else {
        Vec::new()
    };
    let interfaces = if minimal || sections.interfaces {
        collect::collect_interfaces(&paths.sysfs, commands)
    } else {
        Vec::new()
    };

    debug!(
        devices = devices.len(),
        interfaces = interfaces.len(),
        "host facts collected"
    );
    HostFacts {
        summary,
        uptime,
        devices,
        interfaces,
    }
}

/// Render collected facts to `sink`.
///
/// Section order is the same for every format: system summary, uptime,
/// PCI devices, network interfaces. Minimal reports hold only the CSV
/// inventory table.
pub fn write_report<W: Write>(
    sink: W,
    format: OutputFormat,
    metadata: ReportMetadata,
    config: &ReportConfig,
    facts: &HostFacts,
) -> sfr_report::Result<()> {
    let mut assembler = ReportAssembler::new(sink, format, metadata, config);
    assembler.begin()?;

    if format == OutputFormat::Minimal {
        assembler.add_table(InventorySection::table(
            &config.inventory_title,
            &facts.interfaces,
            &facts.devices,
        ))?;
    } else {
        let sections = &config.sections;
        if let Some(summary) = facts.summary.as_ref().filter(|_| sections.summary) {
            assembler.add_summary(summary.clone())?;
        }
        if let Some(uptime) = facts.uptime.as_deref().filter(|_| sections.uptime) {
            assembler.add_text(UPTIME_TITLE, Some(UPTIME_ID), uptime, false)?;
        }
        if sections.devices {
            assembler.add_table(DevicesSection::table(&facts.devices))?;
        }
        if sections.interfaces {
            assembler.add_table(InterfacesSection::table(&facts.interfaces))?;
        }
    }

    assembler.finish()?;
    Ok(())
}

/// Collect and render in one step.
pub fn generate<W: Write>(
    sink: W,
    format: OutputFormat,
    metadata: ReportMetadata,
    config: &ReportConfig,
    paths: &SysPaths,
    commands: &dyn CommandSource,
) -> sfr_report::Result<()> {
    let facts = collect_facts(paths, commands, config, format);
    write_report(sink, format, metadata, config, &facts)
}
