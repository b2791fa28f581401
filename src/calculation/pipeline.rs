//! The deterministic consolidation pipeline.
//!
//! Resolver, exclusion builder, classifier, calculator and aggregator run in
//! sequence over the normalized sources. The pipeline is a pure function of
//! its inputs: the same bundle and configuration always give the same result.

use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::models::{
    AuditTrace, AuditWarning, CanonicalEmployee, ConsolidationResult, PolicyTable, SourceTable,
};

use super::admission::AdmissionIndex;
use super::aggregate::aggregate;
use super::benefit::calculate_benefit;
use super::eligibility::{Classification, RejectionReason, classify};
use super::exclusion::{ExclusionSource, build_exclusion_set};
use super::resolver::Resolver;

/// Note written on every locally calculated employee.
pub const LOCAL_NOTE: &str = "Processado localmente";

/// Every normalized source one consolidation reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceBundle {
    /// Active roster.
    pub active: SourceTable,
    /// Employees on vacation. Informational only.
    pub vacation: SourceTable,
    /// Terminations. Informational only.
    pub terminations: SourceTable,
    /// Admissions in the period, used for admission dates.
    pub admissions: SourceTable,
    /// Exclusion lists by category.
    pub exclusions: Vec<ExclusionSource>,
    /// Working days per region.
    pub working_days: SourceTable,
    /// Daily rate per region.
    pub daily_rates: SourceTable,
}

impl SourceBundle {
    /// A bundle with only an active roster; every other source is empty.
    pub fn with_active(active: SourceTable) -> Self {
        Self {
            active,
            ..Self::default()
        }
    }

    /// Record counts per source, in a fixed order, for summaries.
    pub fn source_counts(&self) -> Vec<(String, usize)> {
        let mut counts = vec![
            ("ativos".to_string(), self.active.len()),
            ("ferias".to_string(), self.vacation.len()),
            ("desligados".to_string(), self.terminations.len()),
            ("admissoes".to_string(), self.admissions.len()),
        ];
        counts.extend(
            self.exclusions
                .iter()
                .map(|e| (e.category.clone(), e.table.len())),
        );
        counts
    }
}

/// The deterministic result with everything recorded on the way.
#[derive(Debug, Clone)]
pub struct DeterministicOutcome {
    /// The consolidated result.
    pub result: ConsolidationResult,
    /// Classification and calculation steps.
    pub audit: AuditTrace,
    /// Skipped records, in source order.
    pub rejections: Vec<RejectionReason>,
}

fn note_for(unknown_affiliation: bool, used_defaults: bool) -> String {
    if unknown_affiliation {
        format!("{}; sindicato não identificado, valores padrão aplicados", LOCAL_NOTE)
    } else if used_defaults {
        format!("{}; valores padrão aplicados", LOCAL_NOTE)
    } else {
        LOCAL_NOTE.to_string()
    }
}

/// Runs the deterministic pipeline.
///
/// Per-record rejections are recorded and skipped. The only error is a
/// matching configuration that cannot be compiled.
///
/// # Example
///
/// ```
/// use benefit_engine::calculation::{normalize, run_deterministic, SourceBundle};
/// use benefit_engine::config::EngineConfig;
/// use benefit_engine::models::RawTable;
///
/// let active = normalize(RawTable::from_rows(
///     "ATIVOS.xlsx",
///     &[&["MATRICULA", "Sindicato"], &["ID001", "SINDPD SP"]],
/// ))
/// .into_table();
///
/// let outcome = run_deterministic(&SourceBundle::with_active(active), &EngineConfig::default()).unwrap();
/// assert_eq!(outcome.result.totals.count, 1);
/// assert_eq!(outcome.result.totals.total_benefit.to_string(), "440.00");
/// ```
pub fn run_deterministic(
    bundle: &SourceBundle,
    config: &EngineConfig,
) -> EngineResult<DeterministicOutcome> {
    let matching = &config.matching;
    let resolver = Resolver::new(matching)?;
    let mut audit = AuditTrace::default();

    if bundle.active.is_empty() {
        warn!(source = %bundle.active.name, "Active roster has no records");
        audit.warnings.push(AuditWarning::new(
            "EMPTY_ACTIVE_ROSTER",
            format!("Source '{}' has no records", bundle.active.name),
        ));
    }

    let policy = PolicyTable::from_sources(
        config.policy.to_policy_table(),
        &bundle.working_days,
        &bundle.daily_rates,
        &resolver,
    );
    let exclusions = build_exclusion_set(
        &bundle.exclusions,
        &matching.exclusion_tokens,
        &matching.identifier_tokens,
    );
    let admissions =
        AdmissionIndex::build(&bundle.admissions, &resolver, &matching.admission_date_tokens);

    let mut employees = Vec::new();
    let mut rejections = Vec::new();
    let mut priced_with_defaults = 0usize;

    for record in &bundle.active.records {
        let eligibility = classify(record, &exclusions, &resolver, matching, audit.next_step_number());
        audit.steps.push(eligibility.audit_step);

        let (identifier, affiliation) = match eligibility.classification {
            Classification::Accepted {
                identifier,
                affiliation,
            } => (identifier, affiliation),
            Classification::Rejected(reason) => {
                debug!(reason = %reason, "Record skipped");
                rejections.push(reason);
                continue;
            }
        };

        let calculation = calculate_benefit(affiliation, &policy, audit.next_step_number());
        let used_defaults = calculation.used_defaults();
        audit.steps.push(calculation.audit_step);
        if used_defaults {
            priced_with_defaults += 1;
        }

        let admission_date =
            admissions.resolve(&identifier, record, &matching.admission_date_tokens);
        employees.push(CanonicalEmployee::new(
            identifier,
            affiliation,
            admission_date,
            calculation.amounts,
            note_for(affiliation.is_unknown(), used_defaults),
        ));
    }

    if priced_with_defaults > 0 {
        audit.warnings.push(AuditWarning::new(
            "POLICY_DEFAULTS_APPLIED",
            format!(
                "{} employee(s) priced with default working days or daily rate",
                priced_with_defaults
            ),
        ));
    }

    let result = aggregate(config.policy.period.clone(), employees)?;

    info!(
        accepted = result.totals.count,
        rejected = rejections.len(),
        total_benefit = %result.totals.total_benefit,
        "Deterministic consolidation complete"
    );

    Ok(DeterministicOutcome {
        result,
        audit,
        rejections,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AffiliationCode, RawRecord};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

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

    fn scenario() -> SourceBundle {
        let active = table(
            "ATIVOS.xlsx",
            &["MATRICULA", "TITULO DO CARGO", "Sindicato"],
            &[
                &["ID001", "ANALISTA", "SINDPD SP - SIND.TRAB.EM PROC DADOS"],
                &["ID002", "ANALISTA", "RJ"],
                &["ID003", "ANALISTA", "OUTRO"],
            ],
        );
        let mut bundle = SourceBundle::with_active(active);
        bundle.exclusions = vec![ExclusionSource::new(
            "exterior",
            table("EXTERIOR.xlsx", &["MATRICULA"], &[&["ID002"]]),
        )];
        bundle
    }

    #[test]
    fn test_end_to_end_scenario() {
        let outcome = run_deterministic(&scenario(), &EngineConfig::default()).unwrap();
        let result = &outcome.result;

        let ids: Vec<&str> = result.employees.iter().map(|e| e.identifier()).collect();
        assert_eq!(ids, vec!["ID001", "ID003"]);

        let id003 = result.find("ID003").unwrap();
        assert_eq!(id003.affiliation(), AffiliationCode::Unknown);
        assert_eq!(id003.total_benefit(), dec("440.00"));
        assert!(id003.notes().contains("valores padrão"));

        assert_eq!(result.totals.count, 2);
        assert_eq!(result.totals.total_benefit, dec("880.00"));
        assert_eq!(result.totals.total_employer_share, dec("704.00"));
        assert_eq!(
            outcome.rejections,
            vec![RejectionReason::Excluded {
                identifier: "ID002".to_string()
            }]
        );
    }

    #[test]
    fn test_policy_lookup_sources_override_config() {
        let mut bundle = scenario();
        bundle.daily_rates = table(
            "Base sindicato x valor.xlsx",
            &["SINDICATO", "VALOR"],
            &[&["SINDPD SP", "37,50"]],
        );

        let outcome = run_deterministic(&bundle, &EngineConfig::default()).unwrap();
        let id001 = outcome.result.find("ID001").unwrap();
        assert_eq!(id001.daily_rate(), dec("37.50"));
        assert_eq!(id001.total_benefit(), dec("825.00"));
        assert_eq!(id001.notes(), LOCAL_NOTE);
    }

    #[test]
    fn test_admission_dates_from_index() {
        let mut bundle = scenario();
        bundle.admissions = table(
            "ADMISSÃO ABRIL.xlsx",
            &["MATRICULA", "Admissão"],
            &[&["id001", "2025-04-14 00:00:00"]],
        );

        let outcome = run_deterministic(&bundle, &EngineConfig::default()).unwrap();
        assert_eq!(
            outcome.result.find("ID001").unwrap().admission_date(),
            Some("2025-04-14")
        );
        assert_eq!(outcome.result.find("ID003").unwrap().admission_date(), None);
    }

    #[test]
    fn test_audit_trace_has_eligibility_and_benefit_steps() {
        let outcome = run_deterministic(&scenario(), &EngineConfig::default()).unwrap();

        assert_eq!(outcome.audit.steps_for("eligibility").count(), 3);
        assert_eq!(outcome.audit.steps_for("benefit").count(), 2);
        let numbers: Vec<u32> = outcome.audit.steps.iter().map(|s| s.step_number).collect();
        assert_eq!(numbers, (1..=5).collect::<Vec<_>>());
        assert!(
            outcome
                .audit
                .warnings
                .iter()
                .any(|w| w.code == "POLICY_DEFAULTS_APPLIED")
        );
    }

    #[test]
    fn test_empty_roster_warns_and_yields_empty_result() {
        let bundle = SourceBundle::with_active(SourceTable::empty("ATIVOS.xlsx"));
        let outcome = run_deterministic(&bundle, &EngineConfig::default()).unwrap();

        assert!(outcome.result.is_empty());
        assert_eq!(outcome.audit.warnings[0].code, "EMPTY_ACTIVE_ROSTER");
    }

    #[test]
    fn test_source_counts_include_exclusion_categories() {
        let counts = scenario().source_counts();
        assert_eq!(counts[0], ("ativos".to_string(), 3));
        assert!(counts.contains(&("exterior".to_string(), 1)));
    }
}
