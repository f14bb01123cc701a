//! The accumulated report: metadata plus an append-only section list.

use crate::sections::SystemSummary;
use crate::table::{slugify, Table};
use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;
use serde_json::{json, Map, Value};

/// Date layout of the report header (locale-style, like `date`).
pub const REPORT_DATE_FORMAT: &str = "%c";

/// Who generated the report, where and when.
///
/// Serializes as the `report_info` JSON object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportMetadata {
    /// Banner title.
    #[serde(skip)]
    pub title: String,
    pub version: String,
    /// Human-readable generation time.
    pub date: String,
    pub hostname: String,
    /// `ROOT USER` or `NON-ROOT USER`.
    pub user: String,
    #[serde(skip)]
    pub generated_at: DateTime<Utc>,
}

impl ReportMetadata {
    pub fn new<Tz>(
        title: impl Into<String>,
        version: impl Into<String>,
        hostname: impl Into<String>,
        user: impl Into<String>,
        generated_at: &DateTime<Tz>,
    ) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        ReportMetadata {
            title: title.into(),
            version: version.into(),
            date: generated_at.format(REPORT_DATE_FORMAT).to_string(),
            hostname: hostname.into(),
            user: user.into(),
            generated_at: generated_at.with_timezone(&Utc),
        }
    }

    /// `<title> (version <v>)`.
    pub fn banner(&self) -> String {
        format!("{} (version {})", self.title, self.version)
    }
}

/// What a section holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionBody {
    Table(Table),
    Summary(SystemSummary),
    Text {
        title: String,
        id: Option<String>,
        text: String,
        /// Wrap in BEGIN/END markers in text output.
        delimited: bool,
    },
}

/// One named report section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    body: SectionBody,
    collapsed: bool,
}

impl Section {
    pub fn table(table: Table) -> Self {
        Self::from_body(SectionBody::Table(table))
    }

    pub fn summary(summary: SystemSummary) -> Self {
        Self::from_body(SectionBody::Summary(summary))
    }

    pub fn text(
        title: impl Into<String>,
        id: Option<&str>,
        text: impl Into<String>,
        delimited: bool,
    ) -> Self {
        Self::from_body(SectionBody::Text {
            title: title.into(),
            id: id.map(str::to_string),
            text: text.into(),
            delimited,
        })
    }

    fn from_body(body: SectionBody) -> Self {
        Section {
            body,
            collapsed: false,
        }
    }

    /// Start the HTML body hidden.
    pub fn with_collapsed(mut self, collapsed: bool) -> Self {
        self.collapsed = collapsed;
        self
    }

    pub fn body(&self) -> &SectionBody {
        &self.body
    }

    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    pub fn title(&self) -> &str {
        match &self.body {
            SectionBody::Table(table) => table.title(),
            SectionBody::Summary(_) => SystemSummary::TITLE,
            SectionBody::Text { title, .. } => title,
        }
    }

    pub fn id(&self) -> Option<&str> {
        match &self.body {
            SectionBody::Table(table) => table.id(),
            SectionBody::Summary(_) => None,
            SectionBody::Text { id, .. } => id.as_deref(),
        }
    }

    /// Top-level JSON key.
    pub fn key(&self) -> String {
        match &self.body {
            SectionBody::Table(table) => table.section_key(),
            SectionBody::Summary(_) => SystemSummary::KEY.to_string(),
            SectionBody::Text { title, id, .. } => {
                id.clone().unwrap_or_else(|| slugify(title))
            }
        }
    }

    /// JSON value stored under [`Section::key`].
    pub fn to_json(&self) -> serde_json::Result<Value> {
        match &self.body {
            SectionBody::Table(table) => table_to_json(table),
            SectionBody::Summary(summary) => serde_json::to_value(summary),
            SectionBody::Text { title, text, .. } => Ok(json!({
                "title": title,
                "text": text,
            })),
        }
    }
}

fn table_to_json(table: &Table) -> serde_json::Result<Value> {
    let mut data = Vec::with_capacity(table.rows().len());
    for row in table.rows() {
        let mut record = Map::new();
        for attr in table.attributes() {
            record.insert(attr.clone(), serde_json::to_value(row.get(attr))?);
        }
        data.push(Value::Object(record));
    }
    Ok(json!({
        "title": table.title(),
        "data": data,
    }))
}

/// Metadata plus sections in collection order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    metadata: ReportMetadata,
    sections: Vec<Section>,
}

impl Report {
    pub fn new(metadata: ReportMetadata) -> Self {
        Report {
            metadata,
            sections: Vec::new(),
        }
    }

    pub fn metadata(&self) -> &ReportMetadata {
        &self.metadata
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub(crate) fn push(&mut self, section: Section) {
        self.sections.push(section);
    }

    /// The JSON document: `report_info` followed by one key per section.
    ///
    /// A repeated key keeps its first position and takes the later value.
    pub fn to_json(&self) -> serde_json::Result<Value> {
        let mut document = Map::new();
        document.insert("report_info".into(), serde_json::to_value(&self.metadata)?);
        for section in &self.sections {
            document.insert(section.key(), section.to_json()?);
        }
        Ok(Value::Object(document))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Row;

    fn metadata() -> ReportMetadata {
        let ts = Utc.with_ymd_and_hms(2024, 3, 5, 7, 8, 9).unwrap();
        ReportMetadata::new("Report", "1.2.3", "node1", "ROOT USER", &ts)
    }

    #[test]
    fn test_metadata_json() {
        let json = serde_json::to_value(metadata()).unwrap();
        let keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["version", "date", "hostname", "user"]);
        assert_eq!(json["date"], "Tue Mar  5 07:08:09 2024");
        assert_eq!(metadata().banner(), "Report (version 1.2.3)");
    }

    #[test]
    fn test_section_keys() {
        let table = Section::table(Table::new("Some Table", &["a"]));
        assert_eq!(table.key(), "some_table");
        assert_eq!(Section::summary(SystemSummary::default()).key(), "system_summary");
        assert_eq!(Section::text("System Uptime", Some("uptime"), "x", false).key(), "uptime");
        assert_eq!(Section::text("Free Text", None, "x", false).key(), "free_text");
    }

    #[test]
    fn test_table_json_nulls_absent() {
        let table = Table::new("T", &["a", "b"]).with_rows(vec![Row::new().with("a", 1i64)]);
        let json = Section::table(table).to_json().unwrap();
        assert_eq!(json, json!({"title": "T", "data": [{"a": 1, "b": null}]}));
    }

    #[test]
    fn test_document_order_and_replacement() {
        let mut report = Report::new(metadata());
        report.push(Section::table(Table::new("First", &["a"]).with_id("dup")));
        report.push(Section::text("Middle", None, "m", false));
        report.push(Section::table(Table::new("Second", &["a"]).with_id("dup")));

        let doc = report.to_json().unwrap();
        let keys: Vec<_> = doc.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["report_info", "dup", "middle"]);
        assert_eq!(doc["dup"]["title"], "Second");
    }
}
