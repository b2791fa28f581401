//! Execution summary text.

use std::fmt::Write;
use std::path::Path;

use rust_decimal::Decimal;

use crate::calculation::round_money;
use crate::orchestrator::{ConsolidationOutcome, ExecutionPath, FallbackReason};

/// Formats money with a comma thousands separator and two decimals.
///
/// # Example
///
/// ```
/// use benefit_engine::report::format_money;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_money(Decimal::new(123456789, 2)), "1,234,567.89");
/// assert_eq!(format_money(Decimal::new(-5, 1)), "-0.50");
/// ```
pub fn format_money(value: Decimal) -> String {
    let rounded = round_money(value);
    let text = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::new();
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, frac_part)
}

fn describe_path(path: &ExecutionPath) -> String {
    match path {
        ExecutionPath::Ai => "IA (resposta validada)".to_string(),
        ExecutionPath::Deterministic { reason } => {
            let why = match reason {
                FallbackReason::AiNotConfigured => "IA não configurada".to_string(),
                FallbackReason::Transport { message } => format!("falha na IA: {}", message),
                FallbackReason::Timeout { seconds } => format!("IA excedeu {}s", seconds),
                FallbackReason::Malformed { .. } => "resposta da IA inválida".to_string(),
                FallbackReason::Insufficient { count, minimum } => {
                    format!("IA retornou {} funcionários, mínimo {}", count, minimum)
                }
            };
            format!("processamento local ({})", why)
        }
    }
}

/// Builds the text shown after a consolidation.
///
/// Lists the artifact path, employee count, total benefit, employer cost,
/// the employees' deduction (total minus employer cost) and how many records
/// each source held.
pub fn execution_summary(
    outcome: &ConsolidationOutcome,
    artifact: &Path,
    source_counts: &[(String, usize)],
) -> String {
    let totals = &outcome.result.totals;
    let mut out = String::new();

    out.push_str("Planilha consolidada VR gerada!\n");
    let _ = writeln!(out, "Arquivo salvo em: {}", artifact.display());
    let _ = writeln!(out, "Competência: {}", outcome.result.period);
    let _ = writeln!(out, "Funcionários processados: {}", totals.count);
    let _ = writeln!(out, "Valor total VR: R$ {}", format_money(totals.total_benefit));
    let _ = writeln!(
        out,
        "Custo empresa (80%): R$ {}",
        format_money(totals.total_employer_share)
    );
    let _ = writeln!(
        out,
        "Desconto funcionários (20%): R$ {}",
        format_money(totals.total_employee_deduction())
    );
    let _ = writeln!(out, "Origem: {}", describe_path(&outcome.path));

    out.push_str("\nBase de dados processada:\n");
    for (source, count) in source_counts {
        let _ = writeln!(out, "- {}: {} registros", source, count);
    }
    if !outcome.rejections.is_empty() {
        let _ = writeln!(out, "- Registros desconsiderados: {}", outcome.rejections.len());
    }

    out
}
