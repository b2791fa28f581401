//! Tabular source models.
//!
//! A [`RawTable`] is what a source reader hands over: rows of optional,
//! already-stringified cells with the header row first. A [`SourceTable`]
//! is the normalized form consumed by the rest of the engine.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Rows of a tabular source exactly as read, header row first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    /// The source name (usually the file name).
    pub name: String,
    /// All rows, including the header row. `None` marks an absent cell.
    pub rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    /// Creates a raw table from borrowed string rows. Empty strings are kept
    /// as present-but-blank cells.
    pub fn from_rows(name: impl Into<String>, rows: &[&[&str]]) -> Self {
        Self {
            name: name.into(),
            rows: rows
                .iter()
                .map(|row| row.iter().map(|cell| Some(cell.to_string())).collect())
                .collect(),
        }
    }
}

/// One data row, as an ordered list of `(header, value)` pairs.
///
/// Column order is preserved and repeated headers are kept, so field scans
/// see the fields exactly as they appear in the source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    fields: Vec<(String, String)>,
}

impl RawRecord {
    /// Creates a record from ordered fields.
    pub fn new(fields: Vec<(String, String)>) -> Self {
        Self { fields }
    }

    /// Returns the fields in column order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(h, v)| (h.as_str(), v.as_str()))
    }

    /// Returns the value of the first field with exactly this header.
    pub fn get(&self, header: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(h, _)| h == header)
            .map(|(_, v)| v.as_str())
    }

    /// Returns true if at least one value is non-blank.
    pub fn has_content(&self) -> bool {
        self.fields.iter().any(|(_, v)| !v.trim().is_empty())
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for RawRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (header, value) in &self.fields {
            map.serialize_entry(header, value)?;
        }
        map.end()
    }
}

/// A normalized tabular source: headers plus non-blank records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SourceTable {
    /// The source name.
    pub name: String,
    /// Column headers in order; blank headers are replaced by `Col_<index>`.
    pub headers: Vec<String>,
    /// Data records in source row order.
    pub records: Vec<RawRecord>,
}

impl SourceTable {
    /// Creates an empty table carrying only a name.
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            headers: Vec::new(),
            records: Vec::new(),
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the table holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
