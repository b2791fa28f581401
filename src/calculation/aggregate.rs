//! Aggregation of consolidated employees.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{CanonicalEmployee, ConsolidationResult, ConsolidationTotals};

use super::benefit::round_money;

/// Builds totals over already-rounded employee values.
///
/// Fails with `CalculationError` when a sum leaves the decimal range.
pub fn totals_for(employees: &[CanonicalEmployee]) -> EngineResult<ConsolidationTotals> {
    let mut total_benefit = Decimal::ZERO;
    let mut total_employer_share = Decimal::ZERO;

    for e in employees {
        total_benefit = total_benefit
            .checked_add(e.total_benefit())
            .ok_or_else(|| overflow("total benefit", e))?;
        total_employer_share = total_employer_share
            .checked_add(e.employer_share())
            .ok_or_else(|| overflow("employer share", e))?;
    }

    Ok(ConsolidationTotals {
        count: employees.len(),
        total_benefit: round_money(total_benefit),
        total_employer_share: round_money(total_employer_share),
    })
}

fn overflow(what: &str, employee: &CanonicalEmployee) -> EngineError {
    EngineError::CalculationError {
        message: format!("{} overflows when adding employee {}", what, employee.identifier()),
    }
}

/// Assembles the result in acceptance order.
///
/// Employees are kept in the order given, which is source row order when
/// called from the pipeline. Totals sum the per-employee rounded values and
/// round once more for display.
///
/// # Example
///
/// ```
/// use benefit_engine::calculation::aggregate;
///
/// let result = aggregate("05/2025", vec![]).unwrap();
/// assert_eq!(result.totals.count, 0);
/// assert!(result.is_empty());
/// ```
pub fn aggregate(
    period: impl Into<String>,
    employees: Vec<CanonicalEmployee>,
) -> EngineResult<ConsolidationResult> {
    let totals = totals_for(&employees)?;
    Ok(ConsolidationResult {
        period: period.into(),
        employees,
        totals,
    })
}
