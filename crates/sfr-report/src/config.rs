//! Report configuration types.

use crate::error::{ReportError, Result};
use serde::{Deserialize, Serialize};
use sfr_common::REPORT_FILE_PREFIX;

/// Report section visibility configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSections {
    /// System summary table.
    #[serde(default = "default_true")]
    pub summary: bool,
    /// Uptime text section.
    #[serde(default = "default_true")]
    pub uptime: bool,
    /// Solarflare PCI device table.
    #[serde(default = "default_true")]
    pub devices: bool,
    /// Network interface table.
    #[serde(default = "default_true")]
    pub interfaces: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ReportSections {
    fn default() -> Self {
        Self {
            summary: true,
            uptime: true,
            devices: true,
            interfaces: true,
        }
    }
}

/// Complete report configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Banner title of full reports.
    #[serde(default = "default_title")]
    pub title: String,
    /// CSV title of the minimal inventory table.
    #[serde(default = "default_inventory_title")]
    pub inventory_title: String,
    /// Prefix of synthesized report file names.
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
    /// Version stamped into the report.
    #[serde(default = "default_version")]
    pub version: String,
    /// Section visibility.
    #[serde(default)]
    pub sections: ReportSections,
    /// Section keys whose HTML body starts hidden.
    #[serde(default)]
    pub collapsed: Vec<String>,
}

fn default_title() -> String {
    "AMD Solarflare system report".to_string()
}

fn default_inventory_title() -> String {
    "AMD Solarflare inventory report".to_string()
}

fn default_file_prefix() -> String {
    REPORT_FILE_PREFIX.to_string()
}

fn default_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            inventory_title: default_inventory_title(),
            file_prefix: default_file_prefix(),
            version: default_version(),
            sections: ReportSections::default(),
            collapsed: Vec::new(),
        }
    }
}

impl ReportConfig {
    /// Create a new report configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the report title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the report version.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Start the given section collapsed.
    pub fn with_collapsed(mut self, key: impl Into<String>) -> Self {
        self.collapsed.push(key.into());
        self
    }

    /// Whether a section key starts collapsed.
    pub fn is_collapsed(&self, key: &str) -> bool {
        self.collapsed.iter().any(|k| k == key)
    }

    /// Reject configurations that would produce unusable output.
    pub fn validate(&self) -> Result<()> {
        if self.file_prefix.is_empty() || self.file_prefix.contains('/') {
            return Err(ReportError::InvalidConfig(format!(
                "file_prefix must be a non-empty file name, got '{}'",
                self.file_prefix
            )));
        }
        if self.title.trim().is_empty() {
            return Err(ReportError::InvalidConfig("title must not be empty".into()));
        }
        Ok(())
    }

    /// Load configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
