// Column resolution.
//
// Sheets are edited by hand, so headers drift ("PhD Students", "PhDStudents",
// "phd_student list"). Each semantic column is found by substring match on a
// normalized header; the first header that matches any keyword wins.

use crate::config::ColumnKeywords;
use crate::sheet::SheetRow;

/// Lowercase and drop spaces, `_` and `-`.
pub fn normalize_header(header: &str) -> String {
    header
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Resolved header names for each semantic column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Columns {
    /// None only when the sheet has no headers at all.
    pub name: Option<String>,
    pub advisees: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub start_year: Option<String>,
    pub end_year: Option<String>,
}

fn find_column(headers: &[String], keywords: &[String]) -> Option<String> {
    let keys: Vec<String> = keywords
        .iter()
        .map(|k| normalize_header(k))
        .filter(|k| !k.is_empty())
        .collect();
    headers
        .iter()
        .find(|h| {
            let norm = normalize_header(h);
            keys.iter().any(|k| norm.contains(k.as_str()))
        })
        .cloned()
}

impl Columns {
    pub fn resolve(headers: &[String], keywords: &ColumnKeywords) -> Self {
        let name = find_column(headers, &keywords.name).or_else(|| headers.first().cloned());
        Self {
            name,
            advisees: find_column(headers, &keywords.advisees),
            email: find_column(headers, &keywords.email),
            role: find_column(headers, &keywords.role),
            start_year: find_column(headers, &keywords.start_year),
            end_year: find_column(headers, &keywords.end_year),
        }
    }

    /// Trimmed, non-empty name of a row.
    pub fn row_name<'a>(&self, row: &'a SheetRow) -> Option<&'a str> {
        cell(row, &self.name).map(str::trim).filter(|n| !n.is_empty())
    }

    /// Advisee names listed in a row, trimmed, empties dropped.
    pub fn row_advisees<'a>(&self, row: &'a SheetRow, separator: char) -> Vec<&'a str> {
        cell(row, &self.advisees)
            .map(|c| {
                c.split(separator)
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Raw optional field. A missing column always yields None; a present
    /// column yields the cell as written (possibly empty).
    pub fn field(&self, row: &SheetRow, column: &Option<String>) -> Option<String> {
        column.as_ref().map(|c| row.get(c).cloned().unwrap_or_default())
    }
}

fn cell<'a>(row: &'a SheetRow, column: &Option<String>) -> Option<&'a str> {
    column.as_ref().and_then(|c| row.get(c)).map(String::as_str)
}
