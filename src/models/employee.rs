//! Canonical employee model.
//!
//! A [`CanonicalEmployee`] is the resolved, calculated representation of one
//! eligible active-roster record. It is built once and never mutated.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::AffiliationCode;

/// One eligible employee with the benefit calculated for the period.
///
/// # Example
///
/// ```
/// use benefit_engine::models::{AffiliationCode, BenefitAmounts, CanonicalEmployee};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let employee = CanonicalEmployee::new(
///     "ID001",
///     AffiliationCode::Sp,
///     Some("2025-04-10".to_string()),
///     BenefitAmounts {
///         working_days: Decimal::from(22),
///         daily_rate: Decimal::from_str("20.00").unwrap(),
///         total: Decimal::from_str("440.00").unwrap(),
///         employer_share: Decimal::from_str("352.00").unwrap(),
///         employee_share: Decimal::from_str("88.00").unwrap(),
///     },
///     "Processado localmente",
/// );
/// assert_eq!(employee.identifier(), "ID001");
/// assert_eq!(employee.total_benefit(), Decimal::from_str("440.00").unwrap());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalEmployee {
    identifier: String,
    affiliation: AffiliationCode,
    admission_date: Option<String>,
    working_days: Decimal,
    daily_rate: Decimal,
    total_benefit: Decimal,
    employer_share: Decimal,
    employee_share: Decimal,
    notes: String,
}

/// The monetary values of one employee's benefit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenefitAmounts {
    /// Working days in the period.
    pub working_days: Decimal,
    /// Benefit value per working day.
    pub daily_rate: Decimal,
    /// `working_days × daily_rate`, rounded to cents.
    pub total: Decimal,
    /// The employer's 80% share, rounded to cents.
    pub employer_share: Decimal,
    /// The employee's 20% share, rounded to cents independently.
    pub employee_share: Decimal,
}

impl CanonicalEmployee {
    /// Creates a canonical employee.
    pub fn new(
        identifier: impl Into<String>,
        affiliation: AffiliationCode,
        admission_date: Option<String>,
        amounts: BenefitAmounts,
        notes: impl Into<String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            affiliation,
            admission_date,
            working_days: amounts.working_days,
            daily_rate: amounts.daily_rate,
            total_benefit: amounts.total,
            employer_share: amounts.employer_share,
            employee_share: amounts.employee_share,
            notes: notes.into(),
        }
    }

    /// The normalized employee identifier.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// The resolved affiliation.
    pub fn affiliation(&self) -> AffiliationCode {
        self.affiliation
    }

    /// The admission date, if one was found.
    pub fn admission_date(&self) -> Option<&str> {
        self.admission_date.as_deref()
    }

    /// Working days in the period.
    pub fn working_days(&self) -> Decimal {
        self.working_days
    }

    /// Benefit value per working day.
    pub fn daily_rate(&self) -> Decimal {
        self.daily_rate
    }

    /// Total benefit for the period.
    pub fn total_benefit(&self) -> Decimal {
        self.total_benefit
    }

    /// The employer's share.
    pub fn employer_share(&self) -> Decimal {
        self.employer_share
    }

    /// The employee's share.
    pub fn employee_share(&self) -> Decimal {
        self.employee_share
    }

    /// Free-text notes for the report.
    pub fn notes(&self) -> &str {
        &self.notes
    }
}
