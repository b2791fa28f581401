//! Policy values read from the lookup tables.
//!
//! The working-days and daily-rate sources are small tables with one row per
//! region. Entries found there override the configured values; anything that
//! cannot be read leaves the configured value in place.

use std::str::FromStr;

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::models::{AffiliationCode, PolicyTable, RawRecord, SourceTable};

use super::resolver::Resolver;

/// Index of the first field naming a region, with that region.
fn region_field(record: &RawRecord, resolver: &Resolver) -> Option<(usize, AffiliationCode)> {
    record
        .fields()
        .enumerate()
        .map(|(i, (_, value))| (i, resolver.resolve_affiliation_text(value)))
        .find(|(_, code)| !code.is_unknown())
}

/// Parses a working-days cell. Only plain digit strings count.
fn parse_days(value: &str) -> Option<u32> {
    let value = value.trim();
    if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}

/// Parses a rate cell, accepting a currency prefix and a decimal comma.
pub(crate) fn parse_rate(value: &str) -> Option<Decimal> {
    let cleaned = value.trim().trim_start_matches("R$").trim().replace(',', ".");
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(&cleaned).ok()
}

impl PolicyTable {
    /// Overlays entries read from the working-days and daily-rate sources.
    ///
    /// For each row, the first field whose value names a region decides the
    /// region. The working days are the first other field holding only
    /// digits; the rate is the first other field that parses as a decimal.
    /// Rows naming no region are skipped.
    ///
    /// # Example
    ///
    /// ```
    /// use benefit_engine::calculation::Resolver;
    /// use benefit_engine::config::MatchingConfig;
    /// use benefit_engine::models::{AffiliationCode, PolicySource, PolicyTable, SourceTable};
    /// use rust_decimal::Decimal;
    ///
    /// let resolver = Resolver::new(&MatchingConfig::default()).unwrap();
    /// let days = SourceTable::empty("Base dias uteis.xlsx");
    /// let rates = SourceTable::empty("Base sindicato x valor.xlsx");
    ///
    /// let policy = PolicyTable::from_sources(
    ///     PolicyTable::new(22, Decimal::new(2000, 2)),
    ///     &days,
    ///     &rates,
    ///     &resolver,
    /// );
    /// assert_eq!(policy.working_days(AffiliationCode::Sp), (22, PolicySource::Default));
    /// ```
    pub fn from_sources(
        base: PolicyTable,
        working_days: &SourceTable,
        daily_rates: &SourceTable,
        resolver: &Resolver,
    ) -> PolicyTable {
        let mut table = base;

        for record in &working_days.records {
            let Some((index, code)) = region_field(record, resolver) else {
                continue;
            };
            let days = record
                .fields()
                .enumerate()
                .filter(|(i, _)| *i != index)
                .find_map(|(_, (_, value))| parse_days(value));
            match days {
                Some(days) => {
                    debug!(region = %code, days, "Working days from lookup source");
                    table = table.with_working_days(code, days);
                }
                None => warn!(
                    region = %code,
                    source = %working_days.name,
                    "No working-days value for region, keeping configured value"
                ),
            }
        }

        for record in &daily_rates.records {
            let Some((index, code)) = region_field(record, resolver) else {
                continue;
            };
            let rate = record
                .fields()
                .enumerate()
                .filter(|(i, _)| *i != index)
                .find_map(|(_, (_, value))| parse_rate(value));
            match rate {
                Some(rate) => {
                    debug!(region = %code, rate = %rate, "Daily rate from lookup source");
                    table = table.with_daily_rate(code, rate);
                }
                None => warn!(
                    region = %code,
                    source = %daily_rates.name,
                    "No daily rate for region, keeping configured value"
                ),
            }
        }

        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MatchingConfig;
    use crate::models::PolicySource;

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

    fn resolver() -> Resolver {
        Resolver::new(&MatchingConfig::default()).unwrap()
    }

    fn base() -> PolicyTable {
        PolicyTable::new(22, dec("20.00"))
    }

    #[test]
    fn test_working_days_from_source() {
        let days = table(
            "Base dias uteis.xlsx",
            &["SINDICATO", "DIAS UTEIS"],
            &[
                &["SINDPPD RS - SIND. PROFISSIONAIS", "21"],
                &["SITEPD PR - SIND DOS TRAB", "20"],
            ],
        );
        let policy = PolicyTable::from_sources(base(), &days, &SourceTable::empty("r"), &resolver());

        assert_eq!(policy.working_days(AffiliationCode::Rs), (21, PolicySource::Table));
        assert_eq!(policy.working_days(AffiliationCode::Pr), (20, PolicySource::Table));
        assert_eq!(policy.working_days(AffiliationCode::Sp), (22, PolicySource::Default));
    }

    #[test]
    fn test_rates_accept_decimal_comma_and_currency() {
        let rates = table(
            "Base sindicato x valor.xlsx",
            &["ESTADO", "VALOR"],
            &[&["Rio de Janeiro", "R$ 35,00"], &["São Paulo", "37.5"]],
        );
        let policy = PolicyTable::from_sources(base(), &SourceTable::empty("d"), &rates, &resolver());

        assert_eq!(policy.daily_rate(AffiliationCode::Rj), (dec("35.00"), PolicySource::Table));
        assert_eq!(policy.daily_rate(AffiliationCode::Sp), (dec("37.5"), PolicySource::Table));
    }

    #[test]
    fn test_unparseable_values_keep_base() {
        let base = base().with_daily_rate(AffiliationCode::Rs, dec("16.00"));
        let rates = table(
            "Base sindicato x valor.xlsx",
            &["SINDICATO", "VALOR"],
            &[&["SINDPPD RS", "a combinar"]],
        );
        let policy = PolicyTable::from_sources(base, &SourceTable::empty("d"), &rates, &resolver());

        assert_eq!(policy.daily_rate(AffiliationCode::Rs), (dec("16.00"), PolicySource::Table));
    }

    #[test]
    fn test_rows_without_region_are_ignored() {
        let days = table("Base dias uteis.xlsx", &["SINDICATO", "DIAS"], &[&["OUTRO", "30"]]);
        let policy = PolicyTable::from_sources(base(), &days, &SourceTable::empty("r"), &resolver());

        assert!(policy.working_days_entries().is_empty());
    }

    #[test]
    fn test_parse_rate() {
        assert_eq!(parse_rate("22,50"), Some(dec("22.50")));
        assert_eq!(parse_rate("R$20"), Some(dec("20")));
        assert_eq!(parse_rate(""), None);
        assert_eq!(parse_rate("n/a"), None);
    }

    #[test]
    fn test_parse_days_rejects_non_digits() {
        assert_eq!(parse_days(" 21 "), Some(21));
        assert_eq!(parse_days("21.5"), None);
        assert_eq!(parse_days("-1"), None);
    }
}
