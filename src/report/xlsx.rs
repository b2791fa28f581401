//! Spreadsheet report through rust_xlsxwriter.

use std::fs;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Color, Format, FormatAlign, Workbook, XlsxError};
use tracing::info;

use crate::error::{EngineError, EngineResult};
use crate::models::ConsolidationResult;

use super::{ReportWriter, artifact_file_name};

/// Column headers, in order.
pub const REPORT_HEADERS: [&str; 10] = [
    "Matricula",
    "Admissão",
    "Sindicato do Colaborador",
    "Competência",
    "Dias",
    "VALOR DIÁRIO VR",
    "TOTAL",
    "Custo empresa",
    "Desconto profissional",
    "OBS GERAL",
];

const SHEET_NAME: &str = "VR MENSAL";
const MONEY_FORMAT: &str = "#,##0.00";

/// Writes `VR MENSAL <period>.xlsx` into an output directory.
#[derive(Debug, Clone)]
pub struct XlsxReportWriter {
    output_directory: PathBuf,
}

impl XlsxReportWriter {
    /// Creates a writer. The directory is created on first write if needed.
    pub fn new(output_directory: impl Into<PathBuf>) -> Self {
        Self {
            output_directory: output_directory.into(),
        }
    }

    /// Where the artifact for a period will be written.
    pub fn artifact_path(&self, period: &str) -> PathBuf {
        self.output_directory.join(artifact_file_name(period))
    }
}

/// One employee row with its amounts already converted for the sheet.
struct ReportRow<'a> {
    identifier: &'a str,
    admission: &'a str,
    affiliation: &'static str,
    // working days, daily rate, total, employer, employee
    numbers: [f64; 5],
    notes: &'a str,
}

fn to_number(value: Decimal) -> EngineResult<f64> {
    value.to_f64().ok_or_else(|| EngineError::CalculationError {
        message: format!("{} cannot be written as a spreadsheet number", value),
    })
}

fn report_rows(result: &ConsolidationResult) -> EngineResult<Vec<ReportRow<'_>>> {
    result
        .employees
        .iter()
        .map(|employee| {
            Ok(ReportRow {
                identifier: employee.identifier(),
                admission: employee.admission_date().unwrap_or(""),
                affiliation: employee.affiliation().as_str(),
                numbers: [
                    to_number(employee.working_days())?,
                    to_number(employee.daily_rate())?,
                    to_number(employee.total_benefit())?,
                    to_number(employee.employer_share())?,
                    to_number(employee.employee_share())?,
                ],
                notes: employee.notes(),
            })
        })
        .collect()
}

fn build_workbook(
    period: &str,
    rows: &[ReportRow<'_>],
    totals: [f64; 3],
    path: &Path,
) -> Result<(), XlsxError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet().set_name(SHEET_NAME)?;

    let header_format = Format::new()
        .set_bold()
        .set_font_color(Color::White)
        .set_background_color(Color::RGB(0x366092))
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter);
    let money_format = Format::new().set_num_format(MONEY_FORMAT);
    let total_label_format = Format::new().set_bold();
    let total_money_format = Format::new().set_bold().set_num_format(MONEY_FORMAT);

    let mut widths: Vec<usize> = REPORT_HEADERS.iter().map(|h| h.chars().count()).collect();

    for (col, header) in REPORT_HEADERS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }

    let mut row: u32 = 1;
    for entry in rows {
        let [days, rate, total, employer, employee] = entry.numbers;

        sheet.write_string(row, 0, entry.identifier)?;
        sheet.write_string(row, 1, entry.admission)?;
        sheet.write_string(row, 2, entry.affiliation)?;
        sheet.write_string(row, 3, period)?;
        sheet.write_number(row, 4, days)?;
        sheet.write_number_with_format(row, 5, rate, &money_format)?;
        sheet.write_number_with_format(row, 6, total, &money_format)?;
        sheet.write_number_with_format(row, 7, employer, &money_format)?;
        sheet.write_number_with_format(row, 8, employee, &money_format)?;
        sheet.write_string(row, 9, entry.notes)?;

        for (col, text) in [(0, entry.identifier), (1, entry.admission), (9, entry.notes)] {
            widths[col] = widths[col].max(text.chars().count());
        }
        row += 1;
    }

    let [total, employer, employee] = totals;
    sheet.write_string_with_format(row, 0, "TOTAL", &total_label_format)?;
    sheet.write_number_with_format(row, 6, total, &total_money_format)?;
    sheet.write_number_with_format(row, 7, employer, &total_money_format)?;
    sheet.write_number_with_format(row, 8, employee, &total_money_format)?;

    for (col, width) in widths.iter().enumerate() {
        sheet.set_column_width(col as u16, (*width as f64 + 2.0) * 1.2)?;
    }

    workbook.save(path)
}

impl ReportWriter for XlsxReportWriter {
    fn write(&self, result: &ConsolidationResult) -> EngineResult<PathBuf> {
        let path = self.artifact_path(&result.period);
        let write_error = |message: String| EngineError::ReportWriteError {
            path: path.display().to_string(),
            message,
        };

        let rows = report_rows(result)?;
        let totals = &result.totals;
        let totals = [
            to_number(totals.total_benefit)?,
            to_number(totals.total_employer_share)?,
            to_number(totals.total_employee_deduction())?,
        ];

        fs::create_dir_all(&self.output_directory).map_err(|e| write_error(e.to_string()))?;
        build_workbook(&result.period, &rows, totals, &path)
            .map_err(|e| write_error(e.to_string()))?;

        info!(path = %path.display(), employees = result.totals.count, "Report written");
        Ok(path)
    }
}
