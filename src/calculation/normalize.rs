//! Source normalization.
//!
//! Turns a [`RawTable`] into a [`SourceTable`]: the first row becomes the
//! headers, cells are trimmed, and rows with no non-blank cell are dropped.

use tracing::debug;

use crate::models::{RawRecord, RawTable, SourceTable};

/// The outcome of normalizing one raw table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalized {
    /// The table had a header row and at least one more row.
    Table(SourceTable),
    /// The table had fewer than two rows.
    Empty {
        /// The source name.
        name: String,
    },
}

impl Normalized {
    /// Returns the table, substituting an empty one for `Empty`.
    pub fn into_table(self) -> SourceTable {
        match self {
            Normalized::Table(table) => table,
            Normalized::Empty { name } => SourceTable::empty(name),
        }
    }

    /// Returns true for `Empty`.
    pub fn is_empty_source(&self) -> bool {
        matches!(self, Normalized::Empty { .. })
    }
}

/// Header used for a column with no header text.
fn placeholder_header(index: usize) -> String {
    format!("Col_{}", index)
}

/// Normalizes a raw table.
///
/// - Fewer than two rows yields [`Normalized::Empty`] carrying the source name.
/// - Blank or absent header cells become `Col_<index>`.
/// - Every record carries one field per column; absent cells become `""`.
///   Cells beyond the header row get placeholder headers.
/// - A row is kept only if at least one cell is non-blank after trimming.
///
/// # Example
///
/// ```
/// use benefit_engine::calculation::{normalize, Normalized};
/// use benefit_engine::models::RawTable;
///
/// let raw = RawTable::from_rows("ATIVOS", &[&["MATRICULA", ""], &[" ID001 ", "x"], &["", " "]]);
/// let Normalized::Table(table) = normalize(raw) else { panic!() };
///
/// assert_eq!(table.headers, vec!["MATRICULA", "Col_1"]);
/// assert_eq!(table.records.len(), 1);
/// assert_eq!(table.records[0].get("MATRICULA"), Some("ID001"));
/// ```
pub fn normalize(raw: RawTable) -> Normalized {
    if raw.rows.len() < 2 {
        debug!(source = %raw.name, rows = raw.rows.len(), "Source has no data rows");
        return Normalized::Empty { name: raw.name };
    }

    let mut rows = raw.rows.into_iter();
    let header_row = rows.next().unwrap_or_default();

    let mut headers: Vec<String> = header_row
        .iter()
        .enumerate()
        .map(|(i, cell)| match cell.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => text.to_string(),
            _ => placeholder_header(i),
        })
        .collect();

    let mut records = Vec::new();
    for row in rows {
        if row.len() > headers.len() {
            for i in headers.len()..row.len() {
                headers.push(placeholder_header(i));
            }
        }

        let fields: Vec<(String, String)> = headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                let value = row
                    .get(i)
                    .and_then(|cell| cell.as_deref())
                    .map(|text| text.trim().to_string())
                    .unwrap_or_default();
                (header.clone(), value)
            })
            .collect();

        let record = RawRecord::new(fields);
        if record.has_content() {
            records.push(record);
        }
    }

    debug!(source = %raw.name, records = records.len(), "Normalized source");

    Normalized::Table(SourceTable {
        name: raw.name,
        headers,
        records,
    })
}
