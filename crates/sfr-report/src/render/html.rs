//! Standalone HTML page with collapsible sections.

use super::Renderer;
use crate::report::{Report, ReportMetadata};
use crate::table::{Orientation, Table, ValueFormat, NONE_FOUND};
use sfr_common::OutputFormat;
use std::io::{self, Write};

const STYLE: &str = r#"    <style type="text/css">
      table { border-collapse: collapse; }
      th, td { text-align: left; border: 1px solid black; }
      table.vert th { text-align: right; }
      td > pre { margin: 0; }
    </style>
"#;

const TOGGLE_SCRIPT: &str = r#"    <script>
    function toggle(id) {
      var obj = document.getElementById(id+'_c');
      var lnk = document.getElementById(id+'_l');
      if ( obj ) {
        if ( obj.style.display == 'block' ) {
          obj.style.display = 'none';
          lnk.innerHTML = ' ...Show';
        } else {
          obj.style.display = 'block';
          lnk.innerHTML = ' Hide...';
        }
      }
    }
    </script>
"#;

/// HTML renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

/// Escape the five HTML-reserved characters.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

impl Renderer for HtmlRenderer {
    fn format(&self) -> OutputFormat {
        OutputFormat::Html
    }

    fn begin_document(&self, out: &mut dyn Write, meta: &ReportMetadata) -> io::Result<()> {
        writeln!(
            out,
            r#"<!DOCTYPE HTML PUBLIC "-//W3C//DTD HTML 4.01//EN" "http://www.w3.org/TR/html4/strict.dtd">"#
        )?;
        writeln!(out, "<html>\n  <head>")?;
        writeln!(out, "    <title>{}</title>", html_escape(&meta.title))?;
        writeln!(out, r#"    <meta name="generator" content="sfreport">"#)?;
        out.write_all(STYLE.as_bytes())?;
        out.write_all(TOGGLE_SCRIPT.as_bytes())?;
        writeln!(out, "  </head>\n  <body>")?;
        writeln!(out, "    <h1>{}</h1>", html_escape(&meta.banner()))?;
        writeln!(
            out,
            "    {} ({})",
            html_escape(&meta.date),
            html_escape(&meta.user)
        )?;
        writeln!(out, "    <hr>")
    }

    fn render_heading(
        &self,
        out: &mut dyn Write,
        text: &str,
        id: Option<&str>,
        collapsed: bool,
    ) -> io::Result<()> {
        let text = html_escape(text);
        let Some(id) = id else {
            return writeln!(out, "    <h2>{text}</h2>");
        };

        let id = html_escape(id);
        let (display, link) = if collapsed {
            ("none", " ...Show")
        } else {
            ("block", " Hide...")
        };
        write!(
            out,
            "<table rows=1 cols=2 style='border:none;'>\n\
             <tr style='border:none;'>\n\
             <td style='border:none;'>\n\
             <a name='{id}'><h2>{text}</h2></a></td>\n\
             <td style='border:none;'>\n\
             <a id='{id}_l' href='#{id}' onclick='toggle(\"{id}\"); return false;'>{link}</a>\n\
             </td></tr></table>\n\
             <div style='display:{display}' id='{id}_c'>\n"
        )
    }

    fn render_table(&self, out: &mut dyn Write, table: &Table) -> io::Result<()> {
        let layout = table.layout();
        let attribute_count = table.attributes().len();
        let preformatted = table.value_format() == ValueFormat::Preformatted;

        writeln!(
            out,
            "    <table class=\"{}\">",
            table.orientation().css_class()
        )?;
        for (y, line) in layout.lines().iter().enumerate() {
            writeln!(out, "      <tr>")?;
            for cell in line {
                let tag = if cell.header { "th" } else { "td" };
                let text = html_escape(&cell.text);
                if !cell.header && preformatted {
                    writeln!(out, "        <{tag}><pre>{text}</pre></{tag}>")?;
                } else {
                    writeln!(out, "        <{tag}>{text}</{tag}>")?;
                }
            }
            if table.orientation() == Orientation::Vertical && table.is_empty() && y == 0 {
                writeln!(
                    out,
                    "        <td rowspan=\"{attribute_count}\"><em>{NONE_FOUND}</em></td>"
                )?;
            }
            writeln!(out, "      </tr>")?;
        }

        if table.is_empty() {
            if attribute_count == 0 {
                writeln!(out, "      <tr><td><em>{NONE_FOUND}</em></td></tr>")?;
            } else if table.orientation() == Orientation::Horizontal {
                writeln!(
                    out,
                    "      <tr>\n        <td colspan=\"{attribute_count}\"><em>{NONE_FOUND}</em></td>\n      </tr>"
                )?;
            }
        }
        writeln!(out, "    </table>")
    }

    fn render_footer(&self, out: &mut dyn Write, id: Option<&str>) -> io::Result<()> {
        if let Some(id) = id {
            let id = html_escape(id);
            writeln!(
                out,
                "<a href='#{id}' onclick='toggle(\"{id}\");'>Hide {id}</a><br>"
            )?;
            writeln!(out, "</div>")?;
        }
        Ok(())
    }

    fn render_preformatted(
        &self,
        out: &mut dyn Write,
        text: &str,
        _delimited: bool,
    ) -> io::Result<()> {
        writeln!(out, "    <pre>{}</pre>", html_escape(text))
    }

    fn end_document(&self, out: &mut dyn Write, _report: &Report) -> io::Result<()> {
        write!(out, "  </body>\n</html>\n")
    }
}
