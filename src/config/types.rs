//! Configuration types for benefit consolidation.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files. Every structure has a
//! `Default` that reproduces the shipped `config/default` values, so the
//! engine can run without a configuration directory.

use std::collections::HashMap;
use std::path::PathBuf;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{AffiliationCode, PolicyTable};

/// Policy values from `policy.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// The competence period, e.g. `05/2025`.
    pub period: String,
    /// Working days used when an affiliation has no entry.
    pub default_working_days: u32,
    /// Daily rate used when an affiliation has no entry.
    pub default_daily_rate: Decimal,
    /// Working days per affiliation.
    pub working_days: HashMap<AffiliationCode, u32>,
    /// Daily rate per affiliation.
    pub daily_rates: HashMap<AffiliationCode, Decimal>,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            period: "05/2025".to_string(),
            default_working_days: 22,
            default_daily_rate: Decimal::new(2000, 2),
            working_days: HashMap::from([
                (AffiliationCode::Sp, 22),
                (AffiliationCode::Rj, 21),
                (AffiliationCode::Rs, 21),
                (AffiliationCode::Pr, 22),
            ]),
            daily_rates: HashMap::from([
                (AffiliationCode::Sp, Decimal::new(2000, 2)),
                (AffiliationCode::Rj, Decimal::new(1800, 2)),
                (AffiliationCode::Rs, Decimal::new(1600, 2)),
                (AffiliationCode::Pr, Decimal::new(1900, 2)),
            ]),
        }
    }
}

impl PolicyConfig {
    /// Builds the immutable policy table handed to the calculator.
    pub fn to_policy_table(&self) -> PolicyTable {
        let mut table = PolicyTable::new(self.default_working_days, self.default_daily_rate);
        for (code, days) in &self.working_days {
            table = table.with_working_days(*code, *days);
        }
        for (code, rate) in &self.daily_rates {
            table = table.with_daily_rate(*code, *rate);
        }
        table
    }
}

/// Alias phrases that identify one region in free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionAliases {
    /// The region these aliases resolve to.
    pub code: AffiliationCode,
    /// Full alias phrases, matched as case-insensitive substrings.
    pub aliases: Vec<String>,
}

/// Field-matching rules from `matching.yaml`.
///
/// Token lists are matched case-insensitively against headers; the order of
/// `regions` is the resolution priority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Header tokens marking an identifier column on roster records.
    pub identifier_tokens: Vec<String>,
    /// Header tokens marking identifier columns on exclusion records.
    pub exclusion_tokens: Vec<String>,
    /// Header tokens marking a role or job-title column.
    pub role_tokens: Vec<String>,
    /// Titles that disqualify an employee from the benefit.
    pub disqualifying_titles: Vec<String>,
    /// Header tokens marking an admission-date column.
    pub admission_date_tokens: Vec<String>,
    /// Regions in priority order with their alias phrases.
    pub regions: Vec<RegionAliases>,
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            identifier_tokens: strings(&[
                "matricula",
                "matrícula",
                "codigo",
                "código",
                "id",
                "cod",
                "cadastro",
            ]),
            exclusion_tokens: strings(&["matricula", "matrícula"]),
            role_tokens: strings(&["cargo", "funcao", "função", "titulo", "título"]),
            disqualifying_titles: strings(&["DIRETOR", "DIRETORA", "PRESIDENTE", "CEO"]),
            admission_date_tokens: strings(&["admissão", "admissao", "admission"]),
            regions: vec![
                RegionAliases {
                    code: AffiliationCode::Sp,
                    aliases: strings(&[
                        "SINDPD SP",
                        "SINDPD-SP",
                        "SINDPDSP",
                        "SÃO PAULO",
                        "SAO PAULO",
                        "SINDICATO SP",
                        "SITEPD SP",
                        "SITEPD-SP",
                        "SITEPDSP",
                    ]),
                },
                RegionAliases {
                    code: AffiliationCode::Rj,
                    aliases: strings(&[
                        "SINDPD RJ",
                        "SINDPD-RJ",
                        "SINDPDRJ",
                        "RIO DE JANEIRO",
                        "SINDICATO RJ",
                        "SITEPD RJ",
                        "SITEPD-RJ",
                        "SITEPDRJ",
                    ]),
                },
                RegionAliases {
                    code: AffiliationCode::Rs,
                    aliases: strings(&[
                        "SINDPPD RS",
                        "SINDPPD-RS",
                        "SINDPPDRS",
                        "RIO GRANDE DO SUL",
                        "SINDICATO RS",
                        "SITEPD RS",
                        "SITEPD-RS",
                        "SITEPDRS",
                    ]),
                },
                RegionAliases {
                    code: AffiliationCode::Pr,
                    aliases: strings(&[
                        "SITEPD PR",
                        "SITEPD-PR",
                        "SITEPDPR",
                        "PARANÁ",
                        "PARANA",
                        "SINDICATO PR",
                    ]),
                },
            ],
        }
    }
}

/// One exclusion list and the category it is tagged with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionSourceConfig {
    /// The category label, e.g. `aprendiz`.
    pub category: String,
    /// The source file name.
    pub file: String,
}

/// Source locations from `sources.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    /// Directory holding the source files.
    pub directory: PathBuf,
    /// Directory the report artifact is written to.
    pub output_directory: PathBuf,
    /// Active roster.
    pub active: String,
    /// Employees on vacation.
    pub vacation: String,
    /// Terminations.
    pub terminations: String,
    /// Admissions in the period.
    pub admissions: String,
    /// Working days per affiliation.
    pub working_days: String,
    /// Daily rate per affiliation.
    pub daily_rates: String,
    /// Exclusion lists.
    pub exclusions: Vec<ExclusionSourceConfig>,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        let exclusion = |category: &str, file: &str| ExclusionSourceConfig {
            category: category.to_string(),
            file: file.to_string(),
        };
        Self {
            directory: PathBuf::from("./bases"),
            output_directory: PathBuf::from("./data"),
            active: "ATIVOS.xlsx".to_string(),
            vacation: "FÉRIAS.xlsx".to_string(),
            terminations: "DESLIGADOS.xlsx".to_string(),
            admissions: "ADMISSÃO ABRIL.xlsx".to_string(),
            working_days: "Base dias uteis.xlsx".to_string(),
            daily_rates: "Base sindicato x valor.xlsx".to_string(),
            exclusions: vec![
                exclusion("aprendiz", "APRENDIZ.xlsx"),
                exclusion("estagio", "ESTÁGIO.xlsx"),
                exclusion("afastamentos", "AFASTAMENTOS.xlsx"),
                exclusion("exterior", "EXTERIOR.xlsx"),
            ],
        }
    }
}

/// Language-model settings from `ai.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Whether the AI path is attempted at all.
    pub enabled: bool,
    /// Model name.
    pub model: String,
    /// Base URL of the generative-language API.
    pub base_url: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// Per-attempt timeout.
    pub timeout_seconds: u64,
    /// Fewest employees an AI result may list and still be accepted.
    pub min_employees: usize,
    /// Extra attempts after a transport failure or timeout.
    pub max_retries: u32,
    /// Active records embedded in the prompt as samples.
    pub sample_size: usize,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            model: "gemini-1.5-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta/models".to_string(),
            api_key_env: "GOOGLE_API_KEY".to_string(),
            timeout_seconds: 60,
            min_employees: 5,
            max_retries: 1,
            sample_size: 3,
        }
    }
}

/// The complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineConfig {
    /// Policy values.
    pub policy: PolicyConfig,
    /// Field-matching rules.
    pub matching: MatchingConfig,
    /// Source locations.
    pub sources: SourcesConfig,
    /// Language-model settings.
    pub ai: AiConfig,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PolicySource;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_default_policy_table_has_region_rates() {
        let table = PolicyConfig::default().to_policy_table();
        assert_eq!(
            table.daily_rate(AffiliationCode::Rj),
            (dec("18.00"), PolicySource::Table)
        );
        assert_eq!(
            table.working_days(AffiliationCode::Rs),
            (21, PolicySource::Table)
        );
        assert_eq!(
            table.daily_rate(AffiliationCode::Unknown),
            (dec("20.00"), PolicySource::Default)
        );
    }

    #[test]
    fn test_default_region_priority() {
        let codes: Vec<AffiliationCode> = MatchingConfig::default()
            .regions
            .iter()
            .map(|r| r.code)
            .collect();
        assert_eq!(codes, AffiliationCode::REGIONS.to_vec());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let policy: PolicyConfig = serde_yaml::from_str("period: \"06/2025\"\n").unwrap();
        assert_eq!(policy.period, "06/2025");
        assert_eq!(policy.default_working_days, 22);
    }

    #[test]
    fn test_ai_defaults() {
        let ai = AiConfig::default();
        assert_eq!(ai.min_employees, 5);
        assert_eq!(ai.max_retries, 1);
        assert_eq!(ai.sample_size, 3);
    }
}
