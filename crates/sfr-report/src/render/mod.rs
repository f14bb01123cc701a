//! Output encoders.
//!
//! Every format implements [`Renderer`]. The assembler picks one renderer when
//! it is constructed and then drives it without looking at the format again.
//! Renderers are stateless: they write straight to the sink they are handed,
//! and the JSON renderer reads the finished [`Report`] at the end.

mod html;
mod json;
mod minimal;
mod text;

pub use html::{html_escape, HtmlRenderer};
pub use json::JsonRenderer;
pub use minimal::MinimalRenderer;
pub use text::TextRenderer;

use crate::report::{Report, ReportMetadata, Section, SectionBody};
use crate::table::Table;
use sfr_common::OutputFormat;
use std::io::{self, Write};

/// Common contract of the four output encoders.
pub trait Renderer {
    /// The format this renderer produces.
    fn format(&self) -> OutputFormat;

    /// Write whatever precedes the first section.
    fn begin_document(&self, out: &mut dyn Write, meta: &ReportMetadata) -> io::Result<()>;

    /// Write a section heading. `collapsed` only matters when `id` is set.
    fn render_heading(
        &self,
        out: &mut dyn Write,
        text: &str,
        id: Option<&str>,
        collapsed: bool,
    ) -> io::Result<()>;

    /// Write a table body.
    fn render_table(&self, out: &mut dyn Write, table: &Table) -> io::Result<()>;

    /// Close a section opened by [`Renderer::render_heading`].
    fn render_footer(&self, out: &mut dyn Write, id: Option<&str>) -> io::Result<()>;

    /// Write a block of free text.
    fn render_preformatted(&self, out: &mut dyn Write, text: &str, delimited: bool)
        -> io::Result<()>;

    /// Write whatever follows the last section.
    fn end_document(&self, out: &mut dyn Write, report: &Report) -> io::Result<()>;

    /// Write one section: heading, body, footer.
    fn render_section(&self, out: &mut dyn Write, section: &Section) -> io::Result<()> {
        self.render_heading(out, section.title(), section.id(), section.is_collapsed())?;
        match section.body() {
            SectionBody::Table(table) => self.render_table(out, table)?,
            SectionBody::Summary(summary) => self.render_table(out, &summary.to_table())?,
            SectionBody::Text {
                text, delimited, ..
            } => self.render_preformatted(out, text, *delimited)?,
        }
        self.render_footer(out, section.id())
    }
}

/// Select the renderer for a format.
pub fn renderer_for(format: OutputFormat) -> Box<dyn Renderer> {
    match format {
        OutputFormat::Text => Box::new(TextRenderer),
        OutputFormat::Html => Box::new(HtmlRenderer),
        OutputFormat::Minimal => Box::new(MinimalRenderer),
        OutputFormat::Json => Box::new(JsonRenderer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renderer_for_matches_format() {
        for format in [
            OutputFormat::Text,
            OutputFormat::Html,
            OutputFormat::Minimal,
            OutputFormat::Json,
        ] {
            assert_eq!(renderer_for(format).format(), format);
        }
    }
}
