//! Workbook sources (xlsx, xls, xlsb, ods) through calamine.
//!
//! Only the first sheet is read. Cells are stringified the way a spreadsheet
//! shows them: whole floats without decimals, dates as `YYYY-MM-DD HH:MM:SS`.

use std::path::Path;

use calamine::{Data, Reader, Sheets, open_workbook_auto};
use chrono::{Duration, NaiveDate};

/// Formats an Excel serial date (1900 system).
fn serial_to_datetime(serial: f64) -> Option<String> {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let seconds = (serial * 86_400.0).round() as i64;
    let datetime = epoch.checked_add_signed(Duration::seconds(seconds))?;
    Some(datetime.format("%Y-%m-%d %H:%M:%S").to_string())
}

/// Stringifies one cell. `None` means the cell is empty.
fn cell_to_string(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) => Some(s.clone()),
        Data::Float(n) => {
            // Format nicely: integers without decimals
            if n.fract() == 0.0 && n.abs() < 1e15 {
                Some(format!("{}", *n as i64))
            } else {
                Some(format!("{}", n))
            }
        }
        Data::Int(n) => Some(n.to_string()),
        Data::Bool(b) => Some(if *b { "TRUE" } else { "FALSE" }.to_string()),
        Data::Error(e) => Some(format!("#{:?}", e)),
        Data::DateTime(dt) => {
            let serial = dt.as_f64();
            serial_to_datetime(serial).or_else(|| Some(serial.to_string()))
        }
        Data::DateTimeIso(s) => Some(s.clone()),
        Data::DurationIso(s) => Some(s.clone()),
    }
}

/// Reads the first sheet of a workbook, header row first.
pub fn read_workbook(path: &Path) -> Result<Vec<Vec<Option<String>>>, String> {
    let mut workbook: Sheets<_> =
        open_workbook_auto(path).map_err(|e| format!("Failed to open workbook: {}", e))?;

    let Some(sheet_name) = workbook.sheet_names().first().cloned() else {
        return Err("Workbook contains no sheets".to_string());
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| format!("Failed to read sheet '{}': {}", sheet_name, e))?;

    Ok(range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect())
}
