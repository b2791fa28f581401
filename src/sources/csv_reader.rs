//! CSV sources.

use std::path::Path;

/// Picks `;` or `,` by counting both in the first line.
fn sniff_delimiter(content: &str) -> u8 {
    let first_line = content.lines().next().unwrap_or("");
    let semicolons = first_line.matches(';').count();
    let commas = first_line.matches(',').count();
    if semicolons > commas { b';' } else { b',' }
}

/// Parses CSV text into rows. Blank cells are kept as present but blank.
pub(crate) fn parse_csv(content: &str) -> Result<Vec<Vec<Option<String>>>, String> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(sniff_delimiter(content))
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut rows = Vec::new();
    for (row_idx, result) in reader.records().enumerate() {
        let record = result.map_err(|e| format!("CSV parse error at row {}: {}", row_idx + 1, e))?;
        rows.push(record.iter().map(|field| Some(field.to_string())).collect());
    }
    Ok(rows)
}

/// Reads a CSV file, header row first.
pub fn read_csv(path: &Path) -> Result<Vec<Vec<Option<String>>>, String> {
    let bytes = std::fs::read(path).map_err(|e| format!("Failed to read file: {}", e))?;
    let content = String::from_utf8_lossy(&bytes);
    let content = content.strip_prefix('\u{feff}').unwrap_or(&content);
    parse_csv(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comma_delimited() {
        let rows = parse_csv("MATRICULA,Cargo\nID001,ANALISTA\n").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1][1].as_deref(), Some("ANALISTA"));
    }

    #[test]
    fn test_semicolon_delimited_with_decimal_comma() {
        let rows = parse_csv("SINDICATO;VALOR\nSINDPD SP;\"37,50\"\n").unwrap();
        assert_eq!(rows[1][1].as_deref(), Some("37,50"));
    }

    #[test]
    fn test_ragged_rows_are_accepted() {
        let rows = parse_csv("A,B,C\n1\n1,2,3,4\n").unwrap();
        assert_eq!(rows[1].len(), 1);
        assert_eq!(rows[2].len(), 4);
    }

    #[test]
    fn test_byte_order_mark_is_stripped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ATIVOS.csv");
        std::fs::write(&path, "\u{feff}MATRICULA\nID001\n").unwrap();

        let rows = read_csv(&path).unwrap();
        assert_eq!(rows[0][0].as_deref(), Some("MATRICULA"));
    }
}
