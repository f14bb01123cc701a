//! Structured JSON document, written once at the end.

use super::Renderer;
use crate::report::{Report, ReportMetadata};
use crate::table::Table;
use sfr_common::OutputFormat;
use std::io::{self, Write};

/// JSON renderer.
///
/// Sections carry their identity in the document structure, so every
/// streaming call is a no-op and the whole report is serialized by
/// [`Renderer::end_document`].
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn format(&self) -> OutputFormat {
        OutputFormat::Json
    }

    fn begin_document(&self, _out: &mut dyn Write, _meta: &ReportMetadata) -> io::Result<()> {
        Ok(())
    }

    fn render_heading(
        &self,
        _out: &mut dyn Write,
        _text: &str,
        _id: Option<&str>,
        _collapsed: bool,
    ) -> io::Result<()> {
        Ok(())
    }

    fn render_table(&self, _out: &mut dyn Write, _table: &Table) -> io::Result<()> {
        Ok(())
    }

    fn render_footer(&self, _out: &mut dyn Write, _id: Option<&str>) -> io::Result<()> {
        Ok(())
    }

    fn render_preformatted(
        &self,
        _out: &mut dyn Write,
        _text: &str,
        _delimited: bool,
    ) -> io::Result<()> {
        Ok(())
    }

    fn end_document(&self, out: &mut dyn Write, report: &Report) -> io::Result<()> {
        let document = report.to_json()?;
        serde_json::to_writer_pretty(&mut *out, &document)?;
        writeln!(out)
    }
}
