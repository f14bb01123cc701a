//! Report assembly lifecycle.
//!
//! The assembler owns the sink, the selected renderer and the [`Report`] for
//! one generation:
//!
//! ```text
//! Initialized --begin--> Collecting --finish--> Rendering --> Closed
//! ```
//!
//! Streaming formats render each section as soon as it is added. JSON only
//! records sections and serializes the whole report in `finish`.

use crate::config::ReportConfig;
use crate::error::{ReportError, Result};
use crate::render::{renderer_for, Renderer};
use crate::report::{Report, ReportMetadata, Section};
use crate::sections::SystemSummary;
use crate::table::Table;
use serde::Serialize;
use sfr_common::OutputFormat;
use std::collections::HashSet;
use std::io::Write;
use tracing::{debug, info};

/// Lifecycle state of a [`ReportAssembler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AssemblerState {
    /// Sink and format resolved, nothing written yet.
    Initialized,
    /// Document head written, sections being appended.
    Collecting,
    /// Writing the document tail.
    Rendering,
    /// Sink flushed and released.
    Closed,
}

impl std::fmt::Display for AssemblerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssemblerState::Initialized => write!(f, "initialized"),
            AssemblerState::Collecting => write!(f, "collecting"),
            AssemblerState::Rendering => write!(f, "rendering"),
            AssemblerState::Closed => write!(f, "closed"),
        }
    }
}

/// Drives one renderer over one sink.
pub struct ReportAssembler<W: Write> {
    sink: Option<W>,
    renderer: Box<dyn Renderer>,
    report: Report,
    collapsed: HashSet<String>,
    state: AssemblerState,
}

impl<W: Write> ReportAssembler<W> {
    /// Create an assembler; the renderer is chosen here, once.
    pub fn new(
        sink: W,
        format: OutputFormat,
        metadata: ReportMetadata,
        config: &ReportConfig,
    ) -> Self {
        ReportAssembler {
            sink: Some(sink),
            renderer: renderer_for(format),
            report: Report::new(metadata),
            collapsed: config.collapsed.iter().cloned().collect(),
            state: AssemblerState::Initialized,
        }
    }

    pub fn format(&self) -> OutputFormat {
        self.renderer.format()
    }

    pub fn state(&self) -> AssemblerState {
        self.state
    }

    /// Sections recorded so far.
    pub fn report(&self) -> &Report {
        &self.report
    }

    fn expect_state(&self, expected: AssemblerState, operation: &'static str) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(ReportError::InvalidState {
                operation,
                state: self.state,
            })
        }
    }

    /// Write the document head and start collecting.
    pub fn begin(&mut self) -> Result<()> {
        self.expect_state(AssemblerState::Initialized, "begin")?;
        let state = self.state;
        let sink = self.sink.as_mut().ok_or(ReportError::InvalidState {
            operation: "begin",
            state,
        })?;
        self.renderer.begin_document(sink, self.report.metadata())?;
        self.state = AssemblerState::Collecting;
        debug!(
            format = %self.format(),
            streaming = self.format().is_streaming(),
            "report started"
        );
        Ok(())
    }

    /// Append a section and hand it to the renderer. The JSON renderer
    /// ignores it until `finish`.
    pub fn add_section(&mut self, section: Section) -> Result<()> {
        if self.state == AssemblerState::Initialized {
            self.begin()?;
        }
        self.expect_state(AssemblerState::Collecting, "add section")?;

        let collapsed = section.is_collapsed() || self.collapsed.contains(&section.key());
        let section = section.with_collapsed(collapsed);

        let state = self.state;
        let sink = self.sink.as_mut().ok_or(ReportError::InvalidState {
            operation: "add section",
            state,
        })?;
        self.renderer.render_section(sink, &section)?;
        debug!(key = %section.key(), "section added");
        self.report.push(section);
        Ok(())
    }

    pub fn add_table(&mut self, table: Table) -> Result<()> {
        self.add_section(Section::table(table))
    }

    pub fn add_summary(&mut self, summary: SystemSummary) -> Result<()> {
        self.add_section(Section::summary(summary))
    }

    pub fn add_text(
        &mut self,
        title: &str,
        id: Option<&str>,
        text: &str,
        delimited: bool,
    ) -> Result<()> {
        self.add_section(Section::text(title, id, text, delimited))
    }

    /// Write the document tail, flush and release the sink.
    ///
    /// An empty report still gets its document wrapper.
    pub fn finish(&mut self) -> Result<()> {
        if self.state == AssemblerState::Initialized {
            self.begin()?;
        }
        self.expect_state(AssemblerState::Collecting, "finish")?;
        self.state = AssemblerState::Rendering;

        let mut sink = self.sink.take().ok_or(ReportError::InvalidState {
            operation: "finish",
            state: self.state,
        })?;
        self.renderer.end_document(&mut sink, &self.report)?;
        sink.flush()?;
        drop(sink);

        self.state = AssemblerState::Closed;
        info!(
            format = %self.format(),
            sections = self.report.sections().len(),
            "report written"
        );
        Ok(())
    }
}
