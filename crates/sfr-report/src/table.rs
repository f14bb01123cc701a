//! Orientation-agnostic tabular data model.
//!
//! A [`Table`] is an ordered attribute list plus ordered rows. It does not
//! know how it will be drawn: [`Table::layout`] transposes the data into the
//! grid that the text and HTML renderers walk, so both encoders agree on
//! which cells are headers and how wide each column is.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Placeholder rendered for an absent value.
pub const NOT_AVAILABLE: &str = "<N/A>";

/// Marker rendered for a table with no rows.
pub const NONE_FOUND: &str = "none found";

static ABSENT: Cell = Cell::Absent;

/// A single scalar value in a table.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    /// Free text.
    Text(String),
    /// Integer value.
    Number(i64),
    /// No value was collected.
    #[default]
    Absent,
}

impl Cell {
    /// Whether the value is missing.
    pub fn is_absent(&self) -> bool {
        matches!(self, Cell::Absent)
    }

    /// The value's text, or `None` when absent.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Cell::Text(s) => Some(Cow::Borrowed(s.as_str())),
            Cell::Number(n) => Some(Cow::Owned(n.to_string())),
            Cell::Absent => None,
        }
    }

    /// The value's text, with absent values shown as [`NOT_AVAILABLE`].
    pub fn display_text(&self) -> Cow<'_, str> {
        self.as_text().unwrap_or(Cow::Borrowed(NOT_AVAILABLE))
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<&String> for Cell {
    fn from(s: &String) -> Self {
        Cell::Text(s.clone())
    }
}

impl From<i64> for Cell {
    fn from(n: i64) -> Self {
        Cell::Number(n)
    }
}

impl From<u32> for Cell {
    fn from(n: u32) -> Self {
        Cell::Number(i64::from(n))
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Cell::Absent)
    }
}

/// One record: attribute name to value.
///
/// Attributes that were never set read back as [`Cell::Absent`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Row {
    values: BTreeMap<String, Cell>,
}

impl Row {
    /// Create an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a row positionally: the i-th value belongs to the i-th attribute.
    ///
    /// Extra values are ignored; missing values stay absent.
    pub fn from_values<A, V>(attributes: &[A], values: impl IntoIterator<Item = V>) -> Self
    where
        A: AsRef<str>,
        V: Into<Cell>,
    {
        attributes
            .iter()
            .zip(values)
            .map(|(attr, value)| (attr.as_ref().to_string(), value.into()))
            .collect()
    }

    /// Set a value, builder style.
    pub fn with(mut self, attribute: impl Into<String>, value: impl Into<Cell>) -> Self {
        self.set(attribute, value);
        self
    }

    /// Set a value in place.
    pub fn set(&mut self, attribute: impl Into<String>, value: impl Into<Cell>) {
        self.values.insert(attribute.into(), value.into());
    }

    /// Look up a value; unknown attributes are absent.
    pub fn get(&self, attribute: &str) -> &Cell {
        self.values.get(attribute).unwrap_or(&ABSENT)
    }
}

impl<K: Into<String>, V: Into<Cell>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Row {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// How attributes map onto the drawn table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Attributes are column headers, one line per record.
    #[default]
    Horizontal,
    /// Attributes are row headers, one column per record.
    Vertical,
}

impl Orientation {
    /// CSS class used by the HTML renderer.
    pub fn css_class(&self) -> &'static str {
        match self {
            Orientation::Horizontal => "horiz",
            Orientation::Vertical => "vert",
        }
    }
}

/// How data cells are presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueFormat {
    /// Plain values.
    #[default]
    Default,
    /// Values are preformatted blocks (command output and the like).
    Preformatted,
}

/// A titled table of records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    title: String,
    id: Option<String>,
    attributes: Vec<String>,
    rows: Vec<Row>,
    orientation: Orientation,
    value_format: ValueFormat,
}

impl Table {
    /// Build a table from all of its parts.
    ///
    /// Rows are not validated against the attribute list: missing attributes
    /// read as absent and unknown ones are never rendered.
    pub fn build<A>(
        title: impl Into<String>,
        id: Option<&str>,
        attributes: &[A],
        rows: Vec<Row>,
        orientation: Orientation,
        value_format: ValueFormat,
    ) -> Self
    where
        A: AsRef<str>,
    {
        Table {
            title: title.into(),
            id: id.map(str::to_string),
            attributes: attributes.iter().map(|a| a.as_ref().to_string()).collect(),
            rows,
            orientation,
            value_format,
        }
    }

    /// Start a horizontal, default-format table with no rows.
    pub fn new<A: AsRef<str>>(title: impl Into<String>, attributes: &[A]) -> Self {
        Self::build(
            title,
            None,
            attributes,
            Vec::new(),
            Orientation::default(),
            ValueFormat::default(),
        )
    }

    /// Set the anchor / JSON key.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Replace the rows.
    pub fn with_rows(mut self, rows: impl IntoIterator<Item = Row>) -> Self {
        self.rows = rows.into_iter().collect();
        self
    }

    /// Set the orientation.
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Set the value format.
    pub fn with_value_format(mut self, value_format: ValueFormat) -> Self {
        self.value_format = value_format;
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn value_format(&self) -> ValueFormat {
        self.value_format
    }

    /// Whether the table has no records.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Key identifying this table across formats.
    pub fn section_key(&self) -> String {
        match &self.id {
            Some(id) => id.clone(),
            None => slugify(&self.title),
        }
    }

    /// Transpose the table into its drawn grid.
    pub fn layout(&self) -> TableLayout {
        TableLayout::new(self)
    }
}

/// Lowercase a title and replace spaces with underscores.
pub fn slugify(title: &str) -> String {
    title.to_lowercase().replace(' ', "_")
}

/// A cell of the drawn grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridCell {
    pub text: String,
    pub header: bool,
}

impl GridCell {
    fn header(text: &str) -> Self {
        GridCell {
            text: text.to_string(),
            header: true,
        }
    }

    fn data(cell: &Cell) -> Self {
        GridCell {
            text: cell.display_text().into_owned(),
            header: false,
        }
    }

    /// Display width in characters.
    pub fn width(&self) -> usize {
        self.text.chars().count()
    }
}

/// A table transposed into drawn lines and columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableLayout {
    lines: Vec<Vec<GridCell>>,
    widths: Vec<usize>,
}

impl TableLayout {
    fn new(table: &Table) -> Self {
        let lines = match table.orientation {
            Orientation::Horizontal => {
                let mut lines = Vec::with_capacity(table.rows.len() + 1);
                if !table.attributes.is_empty() {
                    lines.push(table.attributes.iter().map(|a| GridCell::header(a)).collect());
                    for row in &table.rows {
                        lines.push(
                            table
                                .attributes
                                .iter()
                                .map(|a| GridCell::data(row.get(a)))
                                .collect(),
                        );
                    }
                }
                lines
            }
            Orientation::Vertical => table
                .attributes
                .iter()
                .map(|attr| {
                    std::iter::once(GridCell::header(attr))
                        .chain(table.rows.iter().map(|row| GridCell::data(row.get(attr))))
                        .collect()
                })
                .collect(),
        };

        let columns = lines.iter().map(Vec::len).max().unwrap_or(0);
        let mut widths = vec![0; columns];
        for line in &lines {
            for (x, cell) in line.iter().enumerate() {
                widths[x] = widths[x].max(cell.width());
            }
        }

        TableLayout { lines, widths }
    }

    /// Grid lines in drawing order.
    pub fn lines(&self) -> &[Vec<GridCell>] {
        &self.lines
    }

    /// Column widths in characters.
    pub fn widths(&self) -> &[usize] {
        &self.widths
    }

    /// Width of the whole table with `gutter` characters between columns.
    pub fn total_width(&self, gutter: usize) -> usize {
        let columns = self.widths.len();
        self.widths.iter().sum::<usize>() + gutter * columns.saturating_sub(1)
    }
}
