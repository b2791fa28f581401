//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading engine
//! configuration from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};
use crate::models::PolicyTable;

use super::types::{AiConfig, EngineConfig, MatchingConfig, PolicyConfig, SourcesConfig};

/// Loads and provides access to engine configuration.
///
/// # Directory Structure
///
/// The configuration directory should have the following structure:
/// ```text
/// config/default/
/// ├── policy.yaml    # Period, working days and daily rates per region
/// ├── matching.yaml  # Header tokens, title lexicon, region aliases
/// ├── sources.yaml   # Source file names and directories
/// └── ai.yaml        # Language-model settings
/// ```
///
/// # Example
///
/// ```no_run
/// use benefit_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
/// println!("Period: {}", loader.period());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config: EngineConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns an error if any of the four files is missing or is not valid
    /// YAML for its section. Fields absent from a file take their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let policy = Self::load_yaml::<PolicyConfig>(&path.join("policy.yaml"))?;
        let matching = Self::load_yaml::<MatchingConfig>(&path.join("matching.yaml"))?;
        let sources = Self::load_yaml::<SourcesConfig>(&path.join("sources.yaml"))?;
        let ai = Self::load_yaml::<AiConfig>(&path.join("ai.yaml"))?;

        let config = EngineConfig {
            policy,
            matching,
            sources,
            ai,
        };

        Self::validate(&config)?;

        Ok(Self { config })
    }

    /// Wraps an already-built configuration.
    pub fn from_config(config: EngineConfig) -> EngineResult<Self> {
        Self::validate(&config)?;
        Ok(Self { config })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    fn validate(config: &EngineConfig) -> EngineResult<()> {
        if config.matching.identifier_tokens.is_empty() {
            return Err(EngineError::ConfigParseError {
                path: "matching.yaml".to_string(),
                message: "identifier_tokens must not be empty".to_string(),
            });
        }
        if config.matching.regions.iter().any(|r| r.code.is_unknown()) {
            return Err(EngineError::ConfigParseError {
                path: "matching.yaml".to_string(),
                message: "regions cannot list UNKNOWN".to_string(),
            });
        }
        if config.ai.min_employees == 0 {
            return Err(EngineError::ConfigParseError {
                path: "ai.yaml".to_string(),
                message: "min_employees must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the competence period.
    pub fn period(&self) -> &str {
        &self.config.policy.period
    }

    /// Builds the configured policy table (before any lookup-source overrides).
    pub fn policy_table(&self) -> PolicyTable {
        self.config.policy.to_policy_table()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AffiliationCode, PolicySource};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn config_path() -> &'static str {
        "./config/default"
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert_eq!(loader.period(), "05/2025");
    }

    #[test]
    fn test_shipped_configuration_matches_defaults() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let defaults = EngineConfig::default();

        assert_eq!(loader.config().policy, defaults.policy);
        assert_eq!(loader.config().matching, defaults.matching);
        assert_eq!(loader.config().ai, defaults.ai);
    }

    #[test]
    fn test_policy_table_from_configuration() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let table = loader.policy_table();

        assert_eq!(
            table.daily_rate(AffiliationCode::Pr),
            (dec("19.00"), PolicySource::Table)
        );
        assert_eq!(
            table.working_days(AffiliationCode::Sp),
            (22, PolicySource::Table)
        );
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        let result = ConfigLoader::load("/nonexistent/path");
        assert!(result.is_err());

        match result {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("policy.yaml"));
            }
            _ => panic!("Expected ConfigNotFound error"),
        }
    }

    #[test]
    fn test_load_invalid_yaml_returns_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("policy.yaml"), "default_working_days: [not a number").unwrap();

        match ConfigLoader::load(dir.path()) {
            Err(EngineError::ConfigParseError { path, .. }) => {
                assert!(path.contains("policy.yaml"));
            }
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_region_is_rejected() {
        let mut config = EngineConfig::default();
        config.matching.regions[0].code = AffiliationCode::Unknown;

        assert!(matches!(
            ConfigLoader::from_config(config),
            Err(EngineError::ConfigParseError { .. })
        ));
    }
}
