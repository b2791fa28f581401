//! Prompt construction for the AI path.
//!
//! The prompt carries the period, headers and a few sample rows of the active
//! and vacation rosters, the full rate table, the exclusion counts, the
//! business rules and the JSON shape the answer must follow.

use std::fmt::Write;

use crate::calculation::SourceBundle;
use crate::models::{PolicyTable, RawRecord, SourceTable};

const RESPONSE_SCHEMA: &str = r#"{
  "funcionarios": [
    {
      "matricula": "EXTRAIR_DOS_DADOS_REAIS",
      "sindicato": "DETERMINAR_BASEADO_NOS_DADOS",
      "dias_uteis": 22,
      "valor_diario_vr": 20.00,
      "valor_vr_total": 440.00,
      "valor_empresa": 352.00,
      "valor_funcionario": 88.00,
      "status": "ATIVO",
      "observacoes": "Processado com dados reais"
    }
  ],
  "totais": {
    "total_funcionarios": 0,
    "total_vr": 0.00,
    "total_empresa": 0.00,
    "total_funcionarios_pagos": 0
  }
}"#;

fn samples(records: &[RawRecord], sample_size: usize) -> String {
    let sample: Vec<&RawRecord> = records.iter().take(sample_size).collect();
    serde_json::to_string_pretty(&sample).unwrap_or_else(|_| "[]".to_string())
}

fn section(out: &mut String, title: &str, table: &SourceTable, sample_size: usize) {
    let _ = writeln!(out, "**{} ({} registros):**", title, table.len());
    let _ = writeln!(out, "Headers: {:?}", table.headers);
    let _ = writeln!(out, "Amostra: {}", samples(&table.records, sample_size));
    out.push('\n');
}

/// Builds the consolidation prompt.
///
/// # Example
///
/// ```
/// use benefit_engine::calculation::SourceBundle;
/// use benefit_engine::models::PolicyTable;
/// use benefit_engine::orchestrator::build_prompt;
/// use rust_decimal::Decimal;
///
/// let prompt = build_prompt(
///     &SourceBundle::default(),
///     &PolicyTable::new(22, Decimal::new(2000, 2)),
///     "05/2025",
///     3,
/// );
/// assert!(prompt.contains("COMPETÊNCIA: 05/2025"));
/// ```
pub fn build_prompt(
    bundle: &SourceBundle,
    policy: &PolicyTable,
    period: &str,
    sample_size: usize,
) -> String {
    let mut out = String::new();

    out.push_str(
        "Você é um especialista em RH e processamento de folha de pagamento. \
         Processe os dados REAIS fornecidos para gerar a planilha consolidada de Vale Refeição.\n\n",
    );
    let _ = writeln!(out, "COMPETÊNCIA: {}\n", period);
    out.push_str("DADOS REAIS DISPONÍVEIS:\n\n");

    section(&mut out, "FUNCIONÁRIOS ATIVOS", &bundle.active, sample_size);
    section(&mut out, "FUNCIONÁRIOS EM FÉRIAS", &bundle.vacation, sample_size);

    out.push_str("**BASE SINDICATO X VALOR:**\n");
    let _ = writeln!(out, "Headers: {:?}", bundle.daily_rates.headers);
    let _ = writeln!(
        out,
        "Dados completos: {}\n",
        samples(&bundle.daily_rates.records, bundle.daily_rates.len())
    );

    out.push_str("**EXCLUSÕES APLICADAS:**\n");
    for exclusion in &bundle.exclusions {
        let _ = writeln!(out, "- {}: {} registros", exclusion.category, exclusion.table.len());
    }
    out.push('\n');

    out.push_str("REGRAS DE NEGÓCIO A APLICAR:\n\n");
    out.push_str("1. FUNCIONÁRIOS ELEGÍVEIS:\n");
    out.push_str("   - Incluir todos os funcionários ativos com matrícula\n");
    out.push_str("   - Excluir: Diretores, Estagiários, Aprendizes, Afastados, Exterior\n");
    out.push_str("   - Considerar funcionários em férias como elegíveis\n\n");

    out.push_str("2. DIAS ÚTEIS POR SINDICATO:\n");
    for (code, days) in policy.working_days_entries() {
        let _ = writeln!(out, "   - {}: {} dias úteis", code, days);
    }
    let _ = writeln!(out, "   - Demais: {} dias úteis\n", policy.default_working_days());

    out.push_str("3. VALORES POR SINDICATO:\n");
    for (code, rate) in policy.daily_rate_entries() {
        let _ = writeln!(out, "   - {}: R$ {}/dia útil", code, rate);
    }
    let _ = writeln!(out, "   - Demais: R$ {}/dia útil\n", policy.default_daily_rate());

    out.push_str("4. CÁLCULO FINAL:\n");
    out.push_str("   - VR Total = dias_uteis × valor_diario_vr, arredondado em centavos\n");
    out.push_str("   - Empresa paga 80%\n");
    out.push_str("   - Funcionário paga 20%\n\n");

    out.push_str(
        "TAREFA: Com base nos dados reais fornecidos, gere um JSON com os funcionários \
         processados seguindo exatamente esta estrutura:\n\n",
    );
    out.push_str(RESPONSE_SCHEMA);
    out.push_str("\n\nRESPONDA APENAS COM JSON VÁLIDO.\n");

    out
}
