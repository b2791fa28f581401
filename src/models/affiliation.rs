//! Affiliation (union region) codes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The union region an employee is affiliated with.
///
/// The set is closed: four supported regions plus [`AffiliationCode::Unknown`]
/// for records where no region could be resolved.
///
/// # Example
///
/// ```
/// use benefit_engine::models::AffiliationCode;
///
/// assert_eq!("sp".parse::<AffiliationCode>().unwrap(), AffiliationCode::Sp);
/// assert_eq!(AffiliationCode::Rj.to_string(), "RJ");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AffiliationCode {
    /// São Paulo.
    #[serde(rename = "SP")]
    Sp,
    /// Rio de Janeiro.
    #[serde(rename = "RJ")]
    Rj,
    /// Rio Grande do Sul.
    #[serde(rename = "RS")]
    Rs,
    /// Paraná.
    #[serde(rename = "PR")]
    Pr,
    /// No region could be resolved.
    #[serde(rename = "UNKNOWN")]
    Unknown,
}

impl AffiliationCode {
    /// The supported regions, excluding `Unknown`.
    pub const REGIONS: [AffiliationCode; 4] = [
        AffiliationCode::Sp,
        AffiliationCode::Rj,
        AffiliationCode::Rs,
        AffiliationCode::Pr,
    ];

    /// Returns the two-letter code, or `UNKNOWN`.
    pub fn as_str(&self) -> &'static str {
        match self {
            AffiliationCode::Sp => "SP",
            AffiliationCode::Rj => "RJ",
            AffiliationCode::Rs => "RS",
            AffiliationCode::Pr => "PR",
            AffiliationCode::Unknown => "UNKNOWN",
        }
    }

    /// Returns true for the `Unknown` sentinel.
    pub fn is_unknown(&self) -> bool {
        *self == AffiliationCode::Unknown
    }
}

impl fmt::Display for AffiliationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AffiliationCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "SP" => Ok(AffiliationCode::Sp),
            "RJ" => Ok(AffiliationCode::Rj),
            "RS" => Ok(AffiliationCode::Rs),
            "PR" => Ok(AffiliationCode::Pr),
            "UNKNOWN" | "" => Ok(AffiliationCode::Unknown),
            other => Err(format!("Unknown affiliation code: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("rs".parse::<AffiliationCode>(), Ok(AffiliationCode::Rs));
        assert_eq!(" PR ".parse::<AffiliationCode>(), Ok(AffiliationCode::Pr));
    }

    #[test]
    fn test_parse_blank_is_unknown() {
        assert_eq!("".parse::<AffiliationCode>(), Ok(AffiliationCode::Unknown));
    }

    #[test]
    fn test_parse_rejects_unsupported_region() {
        assert!("MG".parse::<AffiliationCode>().is_err());
    }

    #[test]
    fn test_serde_uses_two_letter_codes() {
        let json = serde_json::to_string(&AffiliationCode::Sp).unwrap();
        assert_eq!(json, "\"SP\"");
        let code: AffiliationCode = serde_json::from_str("\"UNKNOWN\"").unwrap();
        assert!(code.is_unknown());
    }

    #[test]
    fn test_regions_excludes_unknown() {
        assert!(!AffiliationCode::REGIONS.contains(&AffiliationCode::Unknown));
    }
}
