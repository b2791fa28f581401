//! Eligibility classification of active-roster records.
//!
//! Rules are applied in a fixed order: identifier, disqualifying role,
//! exclusion. The first rule that rejects a record decides the reason.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::MatchingConfig;
use crate::models::{AffiliationCode, AuditStep, RawRecord};

use super::exclusion::ExclusionSet;
use super::resolver::{Resolver, header_matches, normalize_identifier};

/// Why a record did not enter the result. Rejections are skipped, never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum RejectionReason {
    /// No identifier-like field had a value.
    NoIdentifier,
    /// A role field held a disqualifying title.
    DisqualifyingRole {
        /// The normalized identifier.
        identifier: String,
        /// The role value that matched.
        title: String,
    },
    /// The identifier is in the exclusion set.
    Excluded {
        /// The normalized identifier.
        identifier: String,
    },
}

impl RejectionReason {
    /// Stable code for logs and audit steps.
    pub fn code(&self) -> &'static str {
        match self {
            RejectionReason::NoIdentifier => "NO_IDENTIFIER",
            RejectionReason::DisqualifyingRole { .. } => "DISQUALIFYING_ROLE",
            RejectionReason::Excluded { .. } => "EXCLUDED",
        }
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectionReason::NoIdentifier => write!(f, "no identifier field"),
            RejectionReason::DisqualifyingRole { identifier, title } => {
                write!(f, "{} holds disqualifying role '{}'", identifier, title)
            }
            RejectionReason::Excluded { identifier } => {
                write!(f, "{} is in an exclusion list", identifier)
            }
        }
    }
}

/// The outcome of classifying one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// The employee is counted.
    Accepted {
        /// The normalized identifier.
        identifier: String,
        /// The resolved affiliation.
        affiliation: AffiliationCode,
    },
    /// The employee is skipped.
    Rejected(RejectionReason),
}

impl Classification {
    /// Returns true for `Accepted`.
    pub fn is_accepted(&self) -> bool {
        matches!(self, Classification::Accepted { .. })
    }
}

/// The classification of a record with its audit step.
#[derive(Debug, Clone)]
pub struct EligibilityResult {
    /// The classification.
    pub classification: Classification,
    /// The audit step recording the decision.
    pub audit_step: AuditStep,
}

/// The first role field holding a disqualifying title, if any.
fn disqualifying_title(record: &RawRecord, matching: &MatchingConfig) -> Option<String> {
    record
        .fields()
        .filter(|(header, value)| !value.is_empty() && header_matches(header, &matching.role_tokens))
        .find(|(_, value)| {
            let upper = value.to_uppercase();
            matching
                .disqualifying_titles
                .iter()
                .any(|title| upper.contains(&title.to_uppercase()))
        })
        .map(|(_, value)| value.to_string())
}

/// Classifies one active-roster record.
///
/// # Example
///
/// ```
/// use benefit_engine::calculation::{classify, Classification, ExclusionSet, Resolver};
/// use benefit_engine::config::MatchingConfig;
/// use benefit_engine::models::{AffiliationCode, RawRecord};
///
/// let matching = MatchingConfig::default();
/// let resolver = Resolver::new(&matching).unwrap();
/// let record = RawRecord::new(vec![
///     ("MATRICULA".to_string(), "id001".to_string()),
///     ("Sindicato".to_string(), "SINDPD SP".to_string()),
/// ]);
///
/// let result = classify(&record, &ExclusionSet::default(), &resolver, &matching, 1);
/// assert_eq!(
///     result.classification,
///     Classification::Accepted {
///         identifier: "ID001".to_string(),
///         affiliation: AffiliationCode::Sp,
///     }
/// );
/// ```
pub fn classify(
    record: &RawRecord,
    exclusions: &ExclusionSet,
    resolver: &Resolver,
    matching: &MatchingConfig,
    step_number: u32,
) -> EligibilityResult {
    let raw_identifier = resolver.resolve_identifier(record);
    let identifier = raw_identifier.as_deref().map(normalize_identifier);

    let classification = match identifier.clone() {
        None => Classification::Rejected(RejectionReason::NoIdentifier),
        Some(identifier) => {
            if let Some(title) = disqualifying_title(record, matching) {
                Classification::Rejected(RejectionReason::DisqualifyingRole { identifier, title })
            } else if exclusions.contains(&identifier) {
                Classification::Rejected(RejectionReason::Excluded { identifier })
            } else {
                Classification::Accepted {
                    affiliation: resolver.resolve_affiliation(record),
                    identifier,
                }
            }
        }
    };

    let (output, reasoning) = match &classification {
        Classification::Accepted {
            identifier,
            affiliation,
        } => (
            serde_json::json!({
                "accepted": true,
                "affiliation": affiliation.as_str()
            }),
            format!("{} accepted with affiliation {}", identifier, affiliation),
        ),
        Classification::Rejected(reason) => (
            serde_json::json!({
                "accepted": false,
                "reason": reason.code()
            }),
            format!("Rejected: {}", reason),
        ),
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "eligibility".to_string(),
        rule_name: "Eligibility Classification".to_string(),
        input: serde_json::json!({
            "identifier": identifier,
            "fields": record.len()
        }),
        output,
        reasoning,
    };

    EligibilityResult {
        classification,
        audit_step,
    }
}
