//! System summary section data.

use crate::table::{Orientation, Row, Table};
use serde::{Deserialize, Serialize};

/// Physical memory figures in megabytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemorySummary {
    /// `MemTotal` in MB.
    pub total_physical_mb: u64,
    /// `MemFree` in MB.
    pub free_physical_mb: u64,
}

/// Host identity and resources.
///
/// Field order is the JSON key order of the `system_summary` object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemSummary {
    /// Kernel name (`uname -s`).
    pub os_name: String,
    /// Kernel release followed by kernel version.
    pub version: String,
    /// Machine hardware name.
    pub architecture: String,
    /// Node name.
    pub system_name: String,
    /// Contents of `/proc/cmdline`.
    pub kernel_command_line: Option<String>,
    /// Distribution description.
    pub distribution: Option<String>,
    /// Memory figures from `/proc/meminfo`.
    pub memory: Option<MemorySummary>,
}

impl SystemSummary {
    /// Section title.
    pub const TITLE: &'static str = "System Summary";

    /// JSON key of the section.
    pub const KEY: &'static str = "system_summary";

    /// Vertical table of the fields that are present.
    pub fn to_table(&self) -> Table {
        let mut attributes = vec!["OS Name", "Version", "Architecture"];
        let mut row = Row::new()
            .with("OS Name", &self.os_name)
            .with("Version", &self.version)
            .with("Architecture", &self.architecture);

        if let Some(cmdline) = &self.kernel_command_line {
            attributes.push("Kernel Command Line");
            row.set("Kernel Command Line", cmdline);
        }
        if let Some(distribution) = &self.distribution {
            attributes.push("Distribution");
            row.set("Distribution", distribution);
        }

        attributes.push("System Name");
        row.set("System Name", &self.system_name);

        if let Some(memory) = &self.memory {
            attributes.extend(["Total Physical Memory", "Free Physical Memory"]);
            row.set(
                "Total Physical Memory",
                format!("{} MB", memory.total_physical_mb),
            );
            row.set(
                "Free Physical Memory",
                format!("{} MB", memory.free_physical_mb),
            );
        }

        Table::new(Self::TITLE, &attributes)
            .with_orientation(Orientation::Vertical)
            .with_rows(vec![row])
    }
}
