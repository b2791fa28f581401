//! Admission dates.

use std::collections::HashMap;
use std::slice;

use tracing::debug;

use crate::models::{RawRecord, SourceTable};

use super::resolver::{Resolver, header_matches, normalize_identifier};

/// The admission-date value in a record, without its time part.
///
/// Tokens are ranked: the first token with a non-empty matching column wins,
/// and within a token the leftmost column.
///
/// # Example
///
/// ```
/// use benefit_engine::calculation::admission_date_of;
/// use benefit_engine::models::RawRecord;
///
/// let record = RawRecord::new(vec![("Admissão".to_string(), "2025-04-10 00:00:00".to_string())]);
/// let tokens = vec!["admissão".to_string()];
///
/// assert_eq!(admission_date_of(&record, &tokens), Some("2025-04-10".to_string()));
/// ```
pub fn admission_date_of(record: &RawRecord, tokens: &[String]) -> Option<String> {
    tokens
        .iter()
        .find_map(|token| {
            record.fields().find(|(header, value)| {
                !value.is_empty() && header_matches(header, slice::from_ref(token))
            })
        })
        .map(|(_, value)| {
            let end = value.find([' ', 'T']).unwrap_or(value.len());
            value[..end].to_string()
        })
        .filter(|date| !date.is_empty())
}

/// Admission dates keyed by normalized identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdmissionIndex {
    dates: HashMap<String, String>,
}

impl AdmissionIndex {
    /// Builds the index from the admissions source. The first row for an
    /// identifier wins.
    pub fn build(source: &SourceTable, resolver: &Resolver, tokens: &[String]) -> Self {
        let mut dates = HashMap::new();
        for record in &source.records {
            let Some(identifier) = resolver.resolve_identifier(record) else {
                continue;
            };
            if let Some(date) = admission_date_of(record, tokens) {
                dates.entry(normalize_identifier(&identifier)).or_insert(date);
            }
        }
        debug!(source = %source.name, entries = dates.len(), "Built admission index");
        Self { dates }
    }

    /// The admission date for an identifier.
    pub fn get(&self, identifier: &str) -> Option<&str> {
        self.dates
            .get(&normalize_identifier(identifier))
            .map(String::as_str)
    }

    /// Number of indexed identifiers.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Returns true if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// The date for an active record: the index first, then the record's own
    /// admission field.
    pub fn resolve(&self, identifier: &str, record: &RawRecord, tokens: &[String]) -> Option<String> {
        self.get(identifier)
            .map(str::to_string)
            .or_else(|| admission_date_of(record, tokens))
    }
}
