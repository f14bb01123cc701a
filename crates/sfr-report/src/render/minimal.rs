//! Minimal CSV inventory.
//!
//! Fields are joined with bare commas. Values are never quoted, so a value
//! containing a comma shifts the columns after it; existing consumers parse
//! this layout as-is.

use super::Renderer;
use crate::report::{Report, ReportMetadata};
use crate::table::Table;
use sfr_common::OutputFormat;
use std::io::{self, Write};

/// CSV renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinimalRenderer;

impl Renderer for MinimalRenderer {
    fn format(&self) -> OutputFormat {
        OutputFormat::Minimal
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

    fn render_table(&self, out: &mut dyn Write, table: &Table) -> io::Result<()> {
        writeln!(out, "CSV:{}", table.title())?;
        writeln!(out, "{}", table.attributes().join(","))?;
        for row in table.rows() {
            let fields: Vec<_> = table
                .attributes()
                .iter()
                .map(|attr| row.get(attr).as_text().unwrap_or_default())
                .collect();
            writeln!(out, "{}", fields.join(","))?;
        }
        writeln!(out)
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

    fn end_document(&self, _out: &mut dyn Write, _report: &Report) -> io::Result<()> {
        Ok(())
    }
}
