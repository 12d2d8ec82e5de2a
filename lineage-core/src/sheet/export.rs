// Spreadsheet CSV export -> Sheet
//
// The host fetches the export text (`.../export?format=csv`) and hands it to
// us. The first non-blank record is the header row; every following record
// becomes a row keyed by header.
//
// Rules:
// - Cells are trimmed.
// - Records shorter than the header fill the missing cells with "".
// - Extra cells beyond the header are dropped.
// - Records whose cells are all empty are skipped.
// - Duplicate headers: the later cell wins.

use std::collections::HashMap;

use csv::{ReaderBuilder, Trim};

use crate::error::Result;

/// One data row, keyed by header.
pub type SheetRow = HashMap<String, String>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    pub headers: Vec<String>,
    pub rows: Vec<SheetRow>,
}

pub fn parse_sheet(text: &str) -> Result<Sheet> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let mut headers: Option<Vec<String>> = None;
    let mut rows = Vec::new();

    for record in reader.records() {
        let record = record?;
        if record.iter().all(|cell| cell.is_empty()) {
            continue;
        }

        match &headers {
            None => headers = Some(record.iter().map(str::to_string).collect()),
            Some(cols) => {
                let row: SheetRow = cols
                    .iter()
                    .enumerate()
                    .map(|(i, h)| (h.clone(), record.get(i).unwrap_or("").to_string()))
                    .collect();
                rows.push(row);
            }
        }
    }

    let sheet = Sheet { headers: headers.unwrap_or_default(), rows };
    log::debug!("parsed sheet: {} columns, {} rows", sheet.headers.len(), sheet.rows.len());
    Ok(sheet)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_sheet() {
        let sheet = parse_sheet("Name,PhD Students\nAda,Bob;Cy\nBob,\n").unwrap();
        assert_eq!(sheet.headers, vec!["Name", "PhD Students"]);
        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(sheet.rows[0]["Name"], "Ada");
        assert_eq!(sheet.rows[0]["PhD Students"], "Bob;Cy");
        assert_eq!(sheet.rows[1]["PhD Students"], "");
    }

    #[test]
    fn test_quoted_cells_and_escaped_quotes() {
        let text = "Name,Role\n\"Doe, Jane\",\"Says \"\"hi\"\", then leaves\"\n";
        let sheet = parse_sheet(text).unwrap();
        assert_eq!(sheet.rows[0]["Name"], "Doe, Jane");
        assert_eq!(sheet.rows[0]["Role"], "Says \"hi\", then leaves");
    }

    #[test]
    fn test_blank_lines_and_short_rows() {
        let text = "\nName, Email ,Role\n\n  Ada  \n,,\nBob,bob@x.org,Prof,extra\n";
        let sheet = parse_sheet(text).unwrap();
        assert_eq!(sheet.headers, vec!["Name", "Email", "Role"]);
        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(sheet.rows[0]["Name"], "Ada");
        assert_eq!(sheet.rows[0]["Email"], "");
        assert_eq!(sheet.rows[0]["Role"], "");
        assert_eq!(sheet.rows[1]["Role"], "Prof");
        assert_eq!(sheet.rows[1].len(), 3);
    }

    #[test]
    fn test_empty_input() {
        let sheet = parse_sheet("").unwrap();
        assert!(sheet.headers.is_empty());
        assert!(sheet.rows.is_empty());
    }

    #[test]
    fn test_crlf_line_endings() {
        let sheet = parse_sheet("Name,Role\r\nAda,Prof\r\n").unwrap();
        assert_eq!(sheet.rows[0]["Role"], "Prof");
    }
}
