//! Validation of language-model answers.
//!
//! The answer is untrusted text. It must contain one JSON object with a
//! `funcionarios` array and a `totais` object carrying `total_funcionarios`
//! and `total_vr`, and list at least the minimum number of employees.
//! Anything else discards the whole answer.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::calculation::{Resolver, aggregate, normalize_identifier, round_money};
use crate::error::{EngineError, EngineResult};
use crate::models::{BenefitAmounts, CanonicalEmployee, ConsolidationResult};

/// Note used when the model gives none.
pub const AI_NOTE: &str = "Processado pela IA";

#[derive(Debug, Deserialize)]
struct AiConsolidation {
    funcionarios: Vec<AiEmployee>,
    totais: AiTotals,
}

#[derive(Debug, Deserialize)]
struct AiTotals {
    #[serde(default)]
    total_funcionarios: Value,
    #[serde(default)]
    total_vr: Value,
}

#[derive(Debug, Deserialize)]
struct AiEmployee {
    #[serde(default)]
    matricula: Value,
    #[serde(default)]
    sindicato: Option<String>,
    #[serde(default)]
    admissao: Option<String>,
    #[serde(default)]
    dias_uteis: Value,
    #[serde(default)]
    valor_diario_vr: Value,
    #[serde(default)]
    valor_vr_total: Value,
    #[serde(default)]
    valor_empresa: Value,
    #[serde(default)]
    valor_funcionario: Value,
    #[serde(default)]
    observacoes: Option<String>,
}

/// The text between the first `{` and the last `}`.
///
/// Strips code fences and any prose the model wrapped around the object.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

fn identifier_of(value: &Value) -> Option<String> {
    let raw = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    let normalized = normalize_identifier(&raw);
    (!normalized.is_empty()).then_some(normalized)
}

fn decimal_of(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => {
            let text = n.to_string();
            Decimal::from_str(&text)
                .or_else(|_| Decimal::from_scientific(&text))
                .ok()
        }
        Value::String(s) => {
            let cleaned = s.trim().trim_start_matches("R$").trim().replace(',', ".");
            Decimal::from_str(&cleaned).ok()
        }
        _ => None,
    }
}

fn malformed(message: String) -> EngineError {
    EngineError::AiResponseMalformed { message }
}

/// A non-negative number under `field`.
fn required(value: &Value, field: &str, owner: &str) -> EngineResult<Decimal> {
    match decimal_of(value) {
        Some(number) if number.is_sign_negative() && !number.is_zero() => Err(malformed(format!(
            "{} has negative '{}': {}",
            owner, field, number
        ))),
        Some(number) => Ok(number),
        None => Err(malformed(format!("{} has no numeric '{}'", owner, field))),
    }
}

fn to_employee(entry: AiEmployee, identifier: String, resolver: &Resolver) -> EngineResult<CanonicalEmployee> {
    let owner = format!("employee {}", identifier);
    let working_days = required(&entry.dias_uteis, "dias_uteis", &owner)?;
    let total = round_money(required(&entry.valor_vr_total, "valor_vr_total", &owner)?);
    let employer_share = round_money(required(&entry.valor_empresa, "valor_empresa", &owner)?);
    let employee_share = round_money(required(&entry.valor_funcionario, "valor_funcionario", &owner)?);

    // The published schema example omits the daily rate; derive it for display.
    let daily_rate = match decimal_of(&entry.valor_diario_vr) {
        Some(rate) => round_money(rate),
        None if !working_days.is_zero() => total
            .checked_div(working_days)
            .map(round_money)
            .ok_or_else(|| {
                malformed(format!(
                    "{} daily rate {} / {} is out of range",
                    owner, total, working_days
                ))
            })?,
        None => Decimal::ZERO,
    };

    let affiliation = resolver.resolve_affiliation_text(entry.sindicato.as_deref().unwrap_or(""));
    let notes = entry
        .observacoes
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| AI_NOTE.to_string());
    let admission_date = entry.admissao.filter(|d| !d.trim().is_empty());

    Ok(CanonicalEmployee::new(
        identifier,
        affiliation,
        admission_date,
        BenefitAmounts {
            working_days,
            daily_rate,
            total,
            employer_share,
            employee_share,
        },
        notes,
    ))
}

/// Parses and validates a model answer.
///
/// Entries without an identifier are dropped before counting. Monetary
/// values are rounded to cents as given, never recalculated, and totals are
/// rebuilt from the employees. The reported `totais` must be numeric; a
/// disagreement with the rebuilt totals is logged, not rejected.
///
/// # Example
///
/// ```
/// use benefit_engine::calculation::Resolver;
/// use benefit_engine::config::MatchingConfig;
/// use benefit_engine::error::EngineError;
/// use benefit_engine::orchestrator::validate_ai_response;
///
/// let resolver = Resolver::new(&MatchingConfig::default()).unwrap();
/// let answer = r#"{"funcionarios": [], "totais": {"total_funcionarios": 0, "total_vr": 0}}"#;
///
/// match validate_ai_response(answer, &resolver, "05/2025", 5) {
///     Err(EngineError::AiResponseInsufficient { count, minimum }) => {
///         assert_eq!((count, minimum), (0, 5));
///     }
///     other => panic!("unexpected: {:?}", other),
/// }
/// ```
pub fn validate_ai_response(
    text: &str,
    resolver: &Resolver,
    period: &str,
    min_employees: usize,
) -> EngineResult<ConsolidationResult> {
    let json = extract_json_object(text).ok_or_else(|| EngineError::AiResponseMalformed {
        message: "no JSON object in response".to_string(),
    })?;

    let parsed: AiConsolidation =
        serde_json::from_str(json).map_err(|e| EngineError::AiResponseMalformed {
            message: e.to_string(),
        })?;

    let totals = &parsed.totais;
    let reported_count = required(&totals.total_funcionarios, "total_funcionarios", "totais")?;
    let reported_total = required(&totals.total_vr, "total_vr", "totais")?;

    let entries: Vec<(String, AiEmployee)> = parsed
        .funcionarios
        .into_iter()
        .filter_map(|entry| identifier_of(&entry.matricula).map(|id| (id, entry)))
        .collect();

    if entries.len() < min_employees {
        return Err(EngineError::AiResponseInsufficient {
            count: entries.len(),
            minimum: min_employees,
        });
    }

    let employees = entries
        .into_iter()
        .map(|(identifier, entry)| to_employee(entry, identifier, resolver))
        .collect::<EngineResult<Vec<_>>>()?;

    let result = aggregate(period, employees).map_err(|e| malformed(e.to_string()))?;

    if reported_count != Decimal::from(result.totals.count)
        || round_money(reported_total) != result.totals.total_benefit
    {
        warn!(
            reported_count = %reported_count,
            reported_total = %reported_total,
            count = result.totals.count,
            total_benefit = %result.totals.total_benefit,
            "Model totals disagree with its employees; keeping the employee sums"
        );
    }

    Ok(result)
}
