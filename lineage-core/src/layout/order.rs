// Deterministic sibling ordering.
//
// Siblings with a completion year come first, oldest first. Siblings without
// one follow, biggest subtree first. Equal keys keep their listing order
// (the sort is stable), which the rule itself does not require.

use std::cmp::Ordering;

/// Parse a year the way the sheet front end always did: optional whitespace,
/// optional sign, then leading decimal digits. Trailing junk is ignored
/// ("2019 (expected)" -> 2019); no leading digit means no year.
pub fn parse_year(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (sign, rest) = match s.as_bytes().first() {
        Some(b'-') => (-1, &s[1..]),
        Some(b'+') => (1, &s[1..]),
        _ => (1, s),
    };
    let digits: &str = {
        let end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
        &rest[..end]
    };
    if digits.is_empty() {
        return None;
    }
    digits.parse::<i64>().ok().map(|v| sign * v)
}

/// Sort key inputs for one sibling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SiblingKey {
    pub end_year: Option<i64>,
    pub value: Option<f64>,
}

pub fn compare_siblings(a: &SiblingKey, b: &SiblingKey) -> Ordering {
    match (a.end_year, b.end_year) {
        (Some(ya), Some(yb)) => ya.cmp(&yb),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => {
            let va = a.value.unwrap_or(0.0);
            let vb = b.value.unwrap_or(0.0);
            vb.total_cmp(&va)
        }
    }
}
