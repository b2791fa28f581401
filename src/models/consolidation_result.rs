//! Consolidation result models.
//!
//! This module contains the [`ConsolidationResult`] type returned by both
//! execution paths, plus the audit types that record how each record was
//! classified and calculated.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::CanonicalEmployee;

/// Running totals over the consolidated employees.
///
/// Totals are sums of the already-rounded per-employee values, so they may
/// differ by a cent from rounding the unrounded grand total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsolidationTotals {
    /// Number of employees in the result.
    pub count: usize,
    /// Sum of every employee's total benefit.
    pub total_benefit: Decimal,
    /// Sum of every employee's employer share.
    pub total_employer_share: Decimal,
}

impl ConsolidationTotals {
    /// The employees' deduction, shown in summaries as `total - employer`.
    pub fn total_employee_deduction(&self) -> Decimal {
        self.total_benefit - self.total_employer_share
    }
}

/// The consolidated benefit sheet for one period.
///
/// `employees` is in source row order. Nothing in this type depends on the
/// time of the run, so identical inputs produce identical results.
///
/// # Example
///
/// ```
/// use benefit_engine::models::{ConsolidationResult, ConsolidationTotals};
/// use rust_decimal::Decimal;
///
/// let result = ConsolidationResult {
///     period: "05/2025".to_string(),
///     employees: vec![],
///     totals: ConsolidationTotals {
///         count: 0,
///         total_benefit: Decimal::ZERO,
///         total_employer_share: Decimal::ZERO,
///     },
/// };
/// assert!(result.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsolidationResult {
    /// The competence period, e.g. `05/2025`.
    pub period: String,
    /// Consolidated employees in acceptance order.
    pub employees: Vec<CanonicalEmployee>,
    /// Totals over `employees`.
    pub totals: ConsolidationTotals,
}

impl ConsolidationResult {
    /// Returns true if no employee was consolidated.
    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }

    /// Finds an employee by identifier, ignoring case and surrounding spaces.
    pub fn find(&self, identifier: &str) -> Option<&CanonicalEmployee> {
        let wanted = identifier.trim().to_uppercase();
        self.employees
            .iter()
            .find(|e| e.identifier().trim().to_uppercase() == wanted)
    }
}

/// A single step in the audit trace recording a classification or
/// calculation decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during consolidation.
///
/// Warnings indicate conditions that don't stop the run but may require
/// attention, such as an empty optional source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
}

impl AuditWarning {
    /// Creates a warning.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// The complete audit trace of a deterministic run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated.
    pub warnings: Vec<AuditWarning>,
}

impl AuditTrace {
    /// The number the next pushed step should carry.
    pub fn next_step_number(&self) -> u32 {
        self.steps.len() as u32 + 1
    }

    /// Steps recorded for one rule.
    pub fn steps_for(&self, rule_id: &str) -> impl Iterator<Item = &AuditStep> {
        self.steps.iter().filter(move |s| s.rule_id == rule_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AffiliationCode, BenefitAmounts};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_sample_employee(id: &str) -> CanonicalEmployee {
        CanonicalEmployee::new(
            id,
            AffiliationCode::Sp,
            None,
            BenefitAmounts {
                working_days: dec("22"),
                daily_rate: dec("20.00"),
                total: dec("440.00"),
                employer_share: dec("352.00"),
                employee_share: dec("88.00"),
            },
            "",
        )
    }

    #[test]
    fn test_find_ignores_case_and_spaces() {
        let result = ConsolidationResult {
            period: "05/2025".to_string(),
            employees: vec![create_sample_employee("ABC1")],
            totals: ConsolidationTotals {
                count: 1,
                total_benefit: dec("440.00"),
                total_employer_share: dec("352.00"),
            },
        };

        assert!(result.find(" abc1 ").is_some());
        assert!(result.find("ABC2").is_none());
    }

    #[test]
    fn test_employee_deduction_is_remainder() {
        let totals = ConsolidationTotals {
            count: 2,
            total_benefit: dec("782.93"),
            total_employer_share: dec("626.34"),
        };
        assert_eq!(totals.total_employee_deduction(), dec("156.59"));
    }

    #[test]
    fn test_totals_serialization() {
        let totals = ConsolidationTotals {
            count: 1,
            total_benefit: dec("440.00"),
            total_employer_share: dec("352.00"),
        };
        let json = serde_json::to_string(&totals).unwrap();
        assert!(json.contains("\"count\":1"));
        assert!(json.contains("\"total_benefit\":\"440.00\""));
    }

    #[test]
    fn test_audit_trace_step_numbering() {
        let mut trace = AuditTrace::default();
        assert_eq!(trace.next_step_number(), 1);
        trace.steps.push(AuditStep {
            step_number: 1,
            rule_id: "eligibility".to_string(),
            rule_name: "Eligibility".to_string(),
            input: serde_json::json!({}),
            output: serde_json::json!({}),
            reasoning: String::new(),
        });
        assert_eq!(trace.next_step_number(), 2);
        assert_eq!(trace.steps_for("eligibility").count(), 1);
        assert_eq!(trace.steps_for("benefit").count(), 0);
    }
}
