//! Column-aligned plain text.

use super::Renderer;
use crate::report::{Report, ReportMetadata};
use crate::table::{GridCell, Orientation, Table, NONE_FOUND};
use sfr_common::OutputFormat;
use std::io::{self, Write};

/// Separator between adjacent columns.
const GUTTER: &str = "  ";

/// Width of the column separator.
pub const GUTTER_WIDTH: usize = GUTTER.len();

const BEGIN_DELIMITER: &str = "--- BEGIN ---";
const END_DELIMITER: &str = "--- END ---";

/// Plain text renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer;

fn pad(cell: &GridCell, width: usize) -> String {
    format!("{:<width$}", cell.text, width = width)
}

fn join_padded(cells: &[GridCell], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| pad(cell, *width))
        .collect::<Vec<_>>()
        .join(GUTTER)
}

fn write_line(out: &mut dyn Write, text: &str) -> io::Result<()> {
    out.write_all(text.as_bytes())?;
    if !text.ends_with('\n') {
        out.write_all(b"\n")?;
    }
    Ok(())
}

impl Renderer for TextRenderer {
    fn format(&self) -> OutputFormat {
        OutputFormat::Text
    }

    fn begin_document(&self, out: &mut dyn Write, meta: &ReportMetadata) -> io::Result<()> {
        write!(out, "{}\n\n", meta.banner())
    }

    fn render_heading(
        &self,
        out: &mut dyn Write,
        text: &str,
        _id: Option<&str>,
        _collapsed: bool,
    ) -> io::Result<()> {
        write!(out, "{text}\n\n")
    }

    fn render_table(&self, out: &mut dyn Write, table: &Table) -> io::Result<()> {
        let layout = table.layout();
        let widths = layout.widths();

        match table.orientation() {
            Orientation::Horizontal => {
                for (y, line) in layout.lines().iter().enumerate() {
                    writeln!(out, "{}", join_padded(line, widths))?;
                    if y == 0 {
                        writeln!(out, "{}", "=".repeat(layout.total_width(GUTTER_WIDTH)))?;
                    }
                }
                if table.is_empty() {
                    writeln!(out, "{NONE_FOUND}")?;
                }
            }
            Orientation::Vertical => {
                if layout.lines().is_empty() && table.is_empty() {
                    writeln!(out, "{NONE_FOUND}")?;
                }
                for (y, line) in layout.lines().iter().enumerate() {
                    let (header, data) = line.split_at(1);
                    let mut text = format!("{} |", pad(&header[0], widths[0]));
                    if !data.is_empty() {
                        text.push(' ');
                        text.push_str(&join_padded(data, &widths[1..]));
                    } else if y == 0 {
                        text.push(' ');
                        text.push_str(GUTTER);
                        text.push_str(NONE_FOUND);
                    }
                    writeln!(out, "{text}")?;
                }
            }
        }
        Ok(())
    }

    fn render_footer(&self, out: &mut dyn Write, _id: Option<&str>) -> io::Result<()> {
        writeln!(out)
    }

    fn render_preformatted(
        &self,
        out: &mut dyn Write,
        text: &str,
        delimited: bool,
    ) -> io::Result<()> {
        if delimited {
            writeln!(out, "{BEGIN_DELIMITER}")?;
            write_line(out, text)?;
            write!(out, "{END_DELIMITER}\n\n")
        } else {
            write_line(out, text)
        }
    }

    fn end_document(&self, _out: &mut dyn Write, _report: &Report) -> io::Result<()> {
        Ok(())
    }
}
