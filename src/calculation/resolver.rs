//! Identifier and affiliation resolution.
//!
//! Records arrive with no fixed schema, so both the employee identifier and the
//! union affiliation are found by scanning fields. The token lists and region
//! priority come from [`MatchingConfig`] so they can be reviewed and tested
//! independently of the scanning code.

use regex::Regex;

use crate::config::MatchingConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{AffiliationCode, RawRecord};

/// Trims and upper-cases an identifier for comparison.
///
/// # Example
///
/// ```
/// use benefit_engine::calculation::normalize_identifier;
///
/// assert_eq!(normalize_identifier("  id001 "), "ID001");
/// ```
pub fn normalize_identifier(identifier: &str) -> String {
    identifier.trim().to_uppercase()
}

/// Returns true if the header contains any token, ignoring case.
pub fn header_matches(header: &str, tokens: &[String]) -> bool {
    let header = header.to_lowercase();
    tokens.iter().any(|t| header.contains(&t.to_lowercase()))
}

struct RegionRule {
    code: AffiliationCode,
    aliases: Vec<String>,
    bare_code: Regex,
}

/// Resolves identifiers and affiliations from noisy records.
pub struct Resolver {
    identifier_tokens: Vec<String>,
    regions: Vec<RegionRule>,
}

impl Resolver {
    /// Builds a resolver from matching rules.
    pub fn new(matching: &MatchingConfig) -> EngineResult<Self> {
        let regions = matching
            .regions
            .iter()
            .map(|region| {
                let pattern = format!(r"\b{}\b", regex::escape(region.code.as_str()));
                let bare_code = Regex::new(&pattern).map_err(|e| EngineError::ConfigParseError {
                    path: "matching.yaml".to_string(),
                    message: e.to_string(),
                })?;
                Ok(RegionRule {
                    code: region.code,
                    aliases: region.aliases.iter().map(|a| a.to_uppercase()).collect(),
                    bare_code,
                })
            })
            .collect::<EngineResult<Vec<_>>>()?;

        Ok(Self {
            identifier_tokens: matching.identifier_tokens.clone(),
            regions,
        })
    }

    /// The identifier header tokens this resolver scans for.
    pub fn identifier_tokens(&self) -> &[String] {
        &self.identifier_tokens
    }

    /// Finds the employee identifier in a record.
    ///
    /// Fields are scanned in column order; the first field whose header
    /// contains an identifier token and whose value is non-blank wins. The
    /// trimmed value is returned as-is; use [`normalize_identifier`] before
    /// comparing.
    pub fn resolve_identifier(&self, record: &RawRecord) -> Option<String> {
        resolve_with_tokens(record, &self.identifier_tokens)
    }

    /// Resolves the affiliation of a record from all of its field values.
    ///
    /// Phase 1 looks for full alias phrases, region by region in priority
    /// order. Phase 2 runs only if phase 1 finds nothing and looks for the
    /// bare two-letter code as a whole word, again in priority order.
    pub fn resolve_affiliation(&self, record: &RawRecord) -> AffiliationCode {
        let values: Vec<String> = record
            .fields()
            .map(|(_, v)| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_uppercase)
            .collect();
        self.resolve_values(&values)
    }

    /// Resolves the affiliation of a single piece of text.
    pub fn resolve_affiliation_text(&self, text: &str) -> AffiliationCode {
        let text = text.trim();
        if text.is_empty() {
            return AffiliationCode::Unknown;
        }
        self.resolve_values(&[text.to_uppercase()])
    }

    fn resolve_values(&self, values: &[String]) -> AffiliationCode {
        for region in &self.regions {
            let alias_hit = region
                .aliases
                .iter()
                .any(|alias| values.iter().any(|v| v.contains(alias.as_str())));
            if alias_hit {
                return region.code;
            }
        }

        for region in &self.regions {
            if values.iter().any(|v| region.bare_code.is_match(v)) {
                return region.code;
            }
        }

        AffiliationCode::Unknown
    }
}

/// First non-blank value, in column order, under a header containing a token.
pub(crate) fn resolve_with_tokens(record: &RawRecord, tokens: &[String]) -> Option<String> {
    record
        .fields()
        .find(|(header, value)| !value.trim().is_empty() && header_matches(header, tokens))
        .map(|(_, value)| value.trim().to_string())
}
