//! Per-affiliation benefit policy.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::AffiliationCode;

/// Where a policy value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicySource {
    /// An explicit entry for the affiliation.
    Table,
    /// The table default, used when the affiliation has no entry.
    Default,
}

/// The working-days and daily-rate lookups used by the benefit calculator.
///
/// Both lookups carry their own default, so a lookup never fails: an absent
/// entry resolves to the default and is reported as [`PolicySource::Default`].
///
/// # Example
///
/// ```
/// use benefit_engine::models::{AffiliationCode, PolicySource, PolicyTable};
/// use rust_decimal::Decimal;
///
/// let policy = PolicyTable::new(22, Decimal::new(2000, 2))
///     .with_working_days(AffiliationCode::Rj, 21);
///
/// assert_eq!(policy.working_days(AffiliationCode::Rj), (21, PolicySource::Table));
/// assert_eq!(policy.working_days(AffiliationCode::Unknown), (22, PolicySource::Default));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyTable {
    working_days: HashMap<AffiliationCode, u32>,
    default_working_days: u32,
    daily_rates: HashMap<AffiliationCode, Decimal>,
    default_daily_rate: Decimal,
}

impl PolicyTable {
    /// Creates an empty policy table with the given defaults.
    pub fn new(default_working_days: u32, default_daily_rate: Decimal) -> Self {
        Self {
            working_days: HashMap::new(),
            default_working_days,
            daily_rates: HashMap::new(),
            default_daily_rate,
        }
    }

    /// Returns a copy with a working-days entry set.
    pub fn with_working_days(mut self, code: AffiliationCode, days: u32) -> Self {
        self.working_days.insert(code, days);
        self
    }

    /// Returns a copy with a daily-rate entry set.
    pub fn with_daily_rate(mut self, code: AffiliationCode, rate: Decimal) -> Self {
        self.daily_rates.insert(code, rate);
        self
    }

    /// Looks up the working days for an affiliation.
    pub fn working_days(&self, code: AffiliationCode) -> (u32, PolicySource) {
        match self.working_days.get(&code) {
            Some(days) => (*days, PolicySource::Table),
            None => (self.default_working_days, PolicySource::Default),
        }
    }

    /// Looks up the daily rate for an affiliation.
    pub fn daily_rate(&self, code: AffiliationCode) -> (Decimal, PolicySource) {
        match self.daily_rates.get(&code) {
            Some(rate) => (*rate, PolicySource::Table),
            None => (self.default_daily_rate, PolicySource::Default),
        }
    }

    /// The working-days default.
    pub fn default_working_days(&self) -> u32 {
        self.default_working_days
    }

    /// The daily-rate default.
    pub fn default_daily_rate(&self) -> Decimal {
        self.default_daily_rate
    }

    /// Working-days entries ordered by affiliation code.
    pub fn working_days_entries(&self) -> Vec<(AffiliationCode, u32)> {
        let mut entries: Vec<_> = self.working_days.iter().map(|(k, v)| (*k, *v)).collect();
        entries.sort_by_key(|(code, _)| *code);
        entries
    }

    /// Daily-rate entries ordered by affiliation code.
    pub fn daily_rate_entries(&self) -> Vec<(AffiliationCode, Decimal)> {
        let mut entries: Vec<_> = self.daily_rates.iter().map(|(k, v)| (*k, *v)).collect();
        entries.sort_by_key(|(code, _)| *code);
        entries
    }
}
