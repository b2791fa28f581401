//! Report artifact and execution summary.
//!
//! The report is one spreadsheet row per consolidated employee plus a totals
//! row. The summary is the text shown to the user after a run.

mod summary;
mod xlsx;

use std::path::PathBuf;

use crate::error::EngineResult;
use crate::models::ConsolidationResult;

pub use summary::{execution_summary, format_money};
pub use xlsx::{REPORT_HEADERS, XlsxReportWriter};

/// Writes a consolidation result to an artifact.
pub trait ReportWriter: Send + Sync {
    /// Writes the report and returns where it was written.
    fn write(&self, result: &ConsolidationResult) -> EngineResult<PathBuf>;
}

/// The artifact file name for a period: `VR MENSAL 05-2025.xlsx`.
///
/// # Example
///
/// ```
/// use benefit_engine::report::artifact_file_name;
///
/// assert_eq!(artifact_file_name("05/2025"), "VR MENSAL 05-2025.xlsx");
/// ```
pub fn artifact_file_name(period: &str) -> String {
    format!("VR MENSAL {}.xlsx", period.replace('/', "-"))
}
