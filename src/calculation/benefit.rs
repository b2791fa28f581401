//! Benefit calculation.
//!
//! Looks up working days and the daily rate for an affiliation and splits the
//! total between employer and employee. Every monetary value is rounded to
//! cents at the step that produces it.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::{AffiliationCode, AuditStep, BenefitAmounts, PolicySource, PolicyTable};

/// The employer's share of the benefit (80%).
pub fn employer_share_rate() -> Decimal {
    Decimal::new(80, 2)
}

/// The employee's share of the benefit (20%).
pub fn employee_share_rate() -> Decimal {
    Decimal::new(20, 2)
}

/// Rounds a monetary value to cents, halves away from zero.
///
/// # Example
///
/// ```
/// use benefit_engine::calculation::round_money;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round_money(Decimal::from_str("68.586").unwrap()), Decimal::from_str("68.59").unwrap());
/// assert_eq!(round_money(Decimal::from_str("0.125").unwrap()), Decimal::from_str("0.13").unwrap());
/// ```
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// The result of a benefit calculation, including the amounts and audit step.
#[derive(Debug, Clone)]
pub struct BenefitCalculation {
    /// The calculated amounts.
    pub amounts: BenefitAmounts,
    /// Whether the working days came from the table or the default.
    pub working_days_source: PolicySource,
    /// Whether the daily rate came from the table or the default.
    pub daily_rate_source: PolicySource,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

impl BenefitCalculation {
    /// Returns true if either lookup fell back to its default.
    pub fn used_defaults(&self) -> bool {
        self.working_days_source == PolicySource::Default
            || self.daily_rate_source == PolicySource::Default
    }
}

fn source_label(source: PolicySource) -> &'static str {
    match source {
        PolicySource::Table => "table",
        PolicySource::Default => "default",
    }
}

/// Calculates the benefit for one affiliation.
///
/// `total = round(days × rate)`, `employer = round(total × 0.80)` and
/// `employee = round(total × 0.20)`. The employee share is rounded on its own,
/// not taken as `total - employer`.
///
/// # Example
///
/// ```
/// use benefit_engine::calculation::calculate_benefit;
/// use benefit_engine::models::{AffiliationCode, PolicyTable};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let policy = PolicyTable::new(22, Decimal::from_str("20.00").unwrap());
/// let result = calculate_benefit(AffiliationCode::Sp, &policy, 1);
///
/// assert_eq!(result.amounts.total, Decimal::from_str("440.00").unwrap());
/// assert_eq!(result.amounts.employer_share, Decimal::from_str("352.00").unwrap());
/// assert_eq!(result.amounts.employee_share, Decimal::from_str("88.00").unwrap());
/// ```
pub fn calculate_benefit(
    affiliation: AffiliationCode,
    policy: &PolicyTable,
    step_number: u32,
) -> BenefitCalculation {
    let (days, working_days_source) = policy.working_days(affiliation);
    let (daily_rate, daily_rate_source) = policy.daily_rate(affiliation);

    let working_days = Decimal::from(days);
    let total = round_money(working_days * daily_rate);
    let employer_share = round_money(total * employer_share_rate());
    let employee_share = round_money(total * employee_share_rate());

    let audit_step = AuditStep {
        step_number,
        rule_id: "benefit".to_string(),
        rule_name: "Benefit Calculation".to_string(),
        input: serde_json::json!({
            "affiliation": affiliation.as_str(),
            "working_days": days,
            "working_days_source": source_label(working_days_source),
            "daily_rate": daily_rate.to_string(),
            "daily_rate_source": source_label(daily_rate_source)
        }),
        output: serde_json::json!({
            "total": total.to_string(),
            "employer_share": employer_share.to_string(),
            "employee_share": employee_share.to_string()
        }),
        reasoning: format!(
            "{} days x R${} = R${}; employer 80% = R${}; employee 20% = R${}",
            days, daily_rate, total, employer_share, employee_share
        ),
    };

    BenefitCalculation {
        amounts: BenefitAmounts {
            working_days,
            daily_rate,
            total,
            employer_share,
            employee_share,
        },
        working_days_source,
        daily_rate_source,
        audit_step,
    }
}
