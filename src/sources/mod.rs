//! Tabular source readers.
//!
//! A [`SourceReader`] turns a source name into a [`RawTable`]. The directory
//! reader dispatches on the file extension: `.csv` goes through the `csv`
//! crate, anything else is opened as a workbook with `calamine`.
//!
//! [`load_bundle`] reads and normalizes every configured source. Only the
//! active roster is required; any other source that is missing, unreadable
//! or empty is replaced by an empty table with a warning.

mod csv_reader;
mod workbook;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::calculation::{ExclusionSource, Normalized, SourceBundle, normalize};
use crate::config::SourcesConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{RawTable, SourceTable};

pub use csv_reader::read_csv;
pub use workbook::read_workbook;

/// Reads a named tabular source.
pub trait SourceReader: Send + Sync {
    /// Reads all rows of the source, header row first.
    ///
    /// A source that does not exist is [`EngineError::SourceNotFound`].
    fn read(&self, name: &str) -> EngineResult<RawTable>;
}

/// Reads sources from files in one directory.
#[derive(Debug, Clone)]
pub struct DirectorySourceReader {
    directory: PathBuf,
}

impl DirectorySourceReader {
    /// Creates a reader rooted at `directory`.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// The directory sources are read from.
    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

impl SourceReader for DirectorySourceReader {
    fn read(&self, name: &str) -> EngineResult<RawTable> {
        let path = self.directory.join(name);
        if !path.is_file() {
            return Err(EngineError::SourceNotFound {
                name: path.display().to_string(),
            });
        }

        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

        let rows = if is_csv {
            read_csv(&path)
        } else {
            read_workbook(&path)
        }
        .map_err(|message| EngineError::SourceReadError {
            name: name.to_string(),
            message,
        })?;

        Ok(RawTable {
            name: name.to_string(),
            rows,
        })
    }
}

/// Serves sources from memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySourceReader {
    tables: HashMap<String, RawTable>,
}

impl MemorySourceReader {
    /// Creates an empty reader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a table under its own name.
    pub fn with_table(mut self, table: RawTable) -> Self {
        self.tables.insert(table.name.clone(), table);
        self
    }
}

impl SourceReader for MemorySourceReader {
    fn read(&self, name: &str) -> EngineResult<RawTable> {
        self.tables
            .get(name)
            .cloned()
            .ok_or_else(|| EngineError::SourceNotFound {
                name: name.to_string(),
            })
    }
}

fn into_table(normalized: Normalized) -> SourceTable {
    if let Normalized::Empty { name } = &normalized {
        warn!(source = %name, "Source is empty, continuing without it");
    }
    normalized.into_table()
}

/// Reads an optional source, substituting an empty table on any failure.
fn read_optional(reader: &dyn SourceReader, name: &str) -> SourceTable {
    match reader.read(name) {
        Ok(raw) => into_table(normalize(raw)),
        Err(e) => {
            warn!(source = %name, error = %e, "Optional source unavailable");
            SourceTable::empty(name)
        }
    }
}

/// Reads and normalizes every configured source.
///
/// # Example
///
/// ```
/// use benefit_engine::config::SourcesConfig;
/// use benefit_engine::models::RawTable;
/// use benefit_engine::sources::{load_bundle, MemorySourceReader};
///
/// let reader = MemorySourceReader::new().with_table(RawTable::from_rows(
///     "ATIVOS.xlsx",
///     &[&["MATRICULA"], &["ID001"]],
/// ));
/// let bundle = load_bundle(&reader, &SourcesConfig::default()).unwrap();
///
/// assert_eq!(bundle.active.len(), 1);
/// assert!(bundle.vacation.is_empty());
/// ```
pub fn load_bundle(reader: &dyn SourceReader, sources: &SourcesConfig) -> EngineResult<SourceBundle> {
    let active = into_table(normalize(reader.read(&sources.active)?));

    let bundle = SourceBundle {
        active,
        vacation: read_optional(reader, &sources.vacation),
        terminations: read_optional(reader, &sources.terminations),
        admissions: read_optional(reader, &sources.admissions),
        exclusions: sources
            .exclusions
            .iter()
            .map(|e| ExclusionSource::new(e.category.clone(), read_optional(reader, &e.file)))
            .collect(),
        working_days: read_optional(reader, &sources.working_days),
        daily_rates: read_optional(reader, &sources.daily_rates),
    };

    info!(counts = ?bundle.source_counts(), "Loaded sources");
    Ok(bundle)
}
