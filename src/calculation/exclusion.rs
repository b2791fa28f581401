//! Exclusion set building.
//!
//! Several exclusion lists (apprentices, interns, leaves of absence,
//! employees abroad) are merged into one flat set of normalized identifiers.
//! The set does not keep provenance per identifier; per-category counts are
//! kept alongside it for logging and summaries.

use std::collections::{BTreeMap, HashSet};

use tracing::{debug, info};

use crate::models::{RawRecord, SourceTable};

use super::resolver::{header_matches, normalize_identifier, resolve_with_tokens};

/// One exclusion list tagged with its category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionSource {
    /// The category label, e.g. `aprendiz`.
    pub category: String,
    /// The normalized list.
    pub table: SourceTable,
}

impl ExclusionSource {
    /// Creates an exclusion source.
    pub fn new(category: impl Into<String>, table: SourceTable) -> Self {
        Self {
            category: category.into(),
            table,
        }
    }
}

/// Normalized identifiers that must never receive the benefit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    identifiers: HashSet<String>,
    category_counts: BTreeMap<String, usize>,
}

impl ExclusionSet {
    /// Returns true if the identifier is excluded. The identifier is
    /// normalized before the lookup.
    pub fn contains(&self, identifier: &str) -> bool {
        self.identifiers.contains(&normalize_identifier(identifier))
    }

    /// Number of distinct excluded identifiers.
    pub fn len(&self) -> usize {
        self.identifiers.len()
    }

    /// Returns true if nothing is excluded.
    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
    }

    /// Identifiers harvested per category, before de-duplication.
    pub fn category_counts(&self) -> &BTreeMap<String, usize> {
        &self.category_counts
    }

    /// Adds one identifier under a category.
    pub fn insert(&mut self, category: &str, identifier: &str) -> bool {
        let normalized = normalize_identifier(identifier);
        if normalized.is_empty() {
            return false;
        }
        *self.category_counts.entry(category.to_string()).or_default() += 1;
        self.identifiers.insert(normalized)
    }
}

/// Identifiers of one exclusion record.
///
/// Every non-blank field under an exclusion header contributes. When no
/// field carries an exclusion header, the roster identifier scan is used.
fn harvest_identifiers(
    record: &RawRecord,
    exclusion_tokens: &[String],
    identifier_tokens: &[String],
) -> Vec<String> {
    let harvested: Vec<String> = record
        .fields()
        .filter(|(header, value)| {
            !value.trim().is_empty() && header_matches(header, exclusion_tokens)
        })
        .map(|(_, value)| value.trim().to_string())
        .collect();

    if !harvested.is_empty() {
        return harvested;
    }

    resolve_with_tokens(record, identifier_tokens)
        .into_iter()
        .collect()
}

/// Merges exclusion lists into one normalized identifier set.
///
/// # Example
///
/// ```
/// use benefit_engine::calculation::{build_exclusion_set, ExclusionSource};
/// use benefit_engine::models::{RawRecord, SourceTable};
///
/// let table = SourceTable {
///     name: "EXTERIOR.xlsx".to_string(),
///     headers: vec!["MATRICULA".to_string()],
///     records: vec![RawRecord::new(vec![("MATRICULA".to_string(), " id002 ".to_string())])],
/// };
/// let tokens = vec!["matricula".to_string()];
/// let set = build_exclusion_set(&[ExclusionSource::new("exterior", table)], &tokens, &tokens);
///
/// assert!(set.contains("ID002"));
/// ```
pub fn build_exclusion_set(
    sources: &[ExclusionSource],
    exclusion_tokens: &[String],
    identifier_tokens: &[String],
) -> ExclusionSet {
    let mut set = ExclusionSet::default();

    for source in sources {
        let mut added = 0usize;
        for record in &source.table.records {
            for identifier in harvest_identifiers(record, exclusion_tokens, identifier_tokens) {
                if set.insert(&source.category, &identifier) {
                    added += 1;
                }
            }
        }
        debug!(
            category = %source.category,
            source = %source.table.name,
            records = source.table.len(),
            added,
            "Harvested exclusion identifiers"
        );
    }

    info!(
        excluded = set.len(),
        categories = ?set.category_counts(),
        "Built exclusion set"
    );

    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MatchingConfig;

    fn table(name: &str, headers: &[&str], rows: &[&[&str]]) -> SourceTable {
        SourceTable {
            name: name.to_string(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            records: rows
                .iter()
                .map(|row| {
                    RawRecord::new(
                        headers
                            .iter()
                            .zip(row.iter())
                            .map(|(h, v)| (h.to_string(), v.to_string()))
                            .collect(),
                    )
                })
                .collect(),
        }
    }

    fn build(sources: &[ExclusionSource]) -> ExclusionSet {
        let matching = MatchingConfig::default();
        build_exclusion_set(sources, &matching.exclusion_tokens, &matching.identifier_tokens)
    }

    #[test]
    fn test_identifiers_are_normalized() {
        let set = build(&[ExclusionSource::new(
            "aprendiz",
            table("APRENDIZ.xlsx", &["MATRICULA", "Cargo"], &[&[" ab12 ", "APRENDIZ"]]),
        )]);

        assert!(set.contains("AB12"));
        assert!(set.contains("ab12"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_multiple_categories_merge_into_one_set() {
        let set = build(&[
            ExclusionSource::new(
                "aprendiz",
                table("APRENDIZ.xlsx", &["MATRICULA"], &[&["1"], &["2"]]),
            ),
            ExclusionSource::new(
                "exterior",
                table("EXTERIOR.xlsx", &["Matrícula"], &[&["2"], &["3"]]),
            ),
        ]);

        assert_eq!(set.len(), 3);
        assert_eq!(set.category_counts().get("aprendiz"), Some(&2));
        assert_eq!(set.category_counts().get("exterior"), Some(&2));
    }

    #[test]
    fn test_every_exclusion_column_contributes() {
        let set = build(&[ExclusionSource::new(
            "afastamentos",
            table(
                "AFASTAMENTOS.xlsx",
                &["MATRICULA", "MATRICULA ANTIGA"],
                &[&["10", "OLD-10"]],
            ),
        )]);

        assert!(set.contains("10"));
        assert!(set.contains("OLD-10"));
    }

    #[test]
    fn test_falls_back_to_identifier_scan() {
        let set = build(&[ExclusionSource::new(
            "estagio",
            table("ESTÁGIO.xlsx", &["Nome", "ID"], &[&["Ana", "ID002"]]),
        )]);

        assert!(set.contains("ID002"));
    }

    #[test]
    fn test_blank_identifiers_are_ignored() {
        let set = build(&[ExclusionSource::new(
            "exterior",
            table("EXTERIOR.xlsx", &["MATRICULA", "Nome"], &[&["", "Ana"]]),
        )]);

        assert!(set.is_empty());
    }

    #[test]
    fn test_no_sources_yields_empty_set() {
        assert!(build(&[]).is_empty());
    }
}
