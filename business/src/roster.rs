//! CSV roster loading for the batch tool.
//!
//! A roster is a comma-separated file with at least the columns `Link`,
//! `Name` and `Amount`. Header names are trimmed before matching and a
//! leading UTF-8 byte order mark is ignored; other columns are skipped.

use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::error::{Result, StampError};

pub const LINK_COLUMN: &str = "Link";
pub const NAME_COLUMN: &str = "Name";
pub const AMOUNT_COLUMN: &str = "Amount";

const REQUIRED_COLUMNS: [&str; 3] = [LINK_COLUMN, NAME_COLUMN, AMOUNT_COLUMN];
const BOM: char = '\u{feff}';

/// One roster line: the QR payload, the label stamped beside it and how many
/// pages to produce.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RosterRow {
    pub link: String,
    pub name: String,
    pub amount: u32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Roster {
    rows: Vec<RosterRow>,
}

impl Roster {
    pub fn new(rows: Vec<RosterRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[RosterRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of pages a batch run will produce.
    pub fn total_pages(&self) -> u64 {
        self.rows.iter().map(|r| u64::from(r.amount)).sum()
    }
}

pub fn load_roster(path: &Path) -> Result<Roster> {
    log::debug!("Loading roster from {:?}", path);
    let file = std::fs::File::open(path)?;
    let roster = parse_roster(file)?;
    log::info!(
        "Loaded roster {:?}: {} rows, {} pages",
        path,
        roster.len(),
        roster.total_pages()
    );
    Ok(roster)
}

pub fn parse_roster(reader: impl Read) -> Result<Roster> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::Headers)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let columns = ColumnIndex::resolve(&headers)?;

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        rows.push(columns.row(&record, i + 1)?);
    }

    Ok(Roster::new(rows))
}

struct ColumnIndex {
    link: usize,
    name: usize,
    amount: usize,
}

impl ColumnIndex {
    fn resolve(headers: &StringRecord) -> Result<Self> {
        let names: Vec<&str> = headers
            .iter()
            .map(|h| h.trim_start_matches(BOM).trim())
            .collect();
        let find = |col: &str| names.iter().position(|h| *h == col);

        match (find(LINK_COLUMN), find(NAME_COLUMN), find(AMOUNT_COLUMN)) {
            (Some(link), Some(name), Some(amount)) => Ok(Self { link, name, amount }),
            _ => {
                let missing = REQUIRED_COLUMNS
                    .iter()
                    .filter(|col| find(col).is_none())
                    .map(|col| (*col).to_string())
                    .collect();
                Err(StampError::MissingColumns { missing })
            }
        }
    }

    /// `row` is the 1-based data row number used in error messages.
    fn row(&self, record: &StringRecord, row: usize) -> Result<RosterRow> {
        let field = |i: usize| record.get(i).unwrap_or_default();

        let link = field(self.link);
        if link.trim().is_empty() {
            return Err(StampError::EmptyLink { row });
        }

        let raw_amount = field(self.amount);
        let amount =
            parse_amount(raw_amount).ok_or_else(|| StampError::invalid_amount(row, raw_amount))?;

        Ok(RosterRow {
            link: link.to_string(),
            name: field(self.name).to_string(),
            amount,
        })
    }
}

/// Accepts whole numbers, including spreadsheet exports such as `2.0`.
fn parse_amount(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    if let Ok(n) = raw.parse::<u32>() {
        return Some(n);
    }
    let f = raw.parse::<f64>().ok()?;
    (f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= f64::from(u32::MAX)).then_some(f as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<Roster> {
        parse_roster(text.as_bytes())
    }

    #[test]
    fn test_parse_basic_roster() {
        let roster = parse("Link,Name,Amount\nhttps://example.com,Alice,2\nhttps://b.test,Bob,0\n")
            .unwrap();
        assert_eq!(roster.len(), 2);
        assert_eq!(
            roster.rows()[0],
            RosterRow {
                link: "https://example.com".to_string(),
                name: "Alice".to_string(),
                amount: 2,
            }
        );
        assert_eq!(roster.rows()[1].amount, 0);
        assert_eq!(roster.total_pages(), 2);
    }

    #[test]
    fn test_headers_are_trimmed_and_bom_ignored() {
        let roster = parse("\u{feff} Link , Name,Amount \nhttps://a.test,Ann,1\n").unwrap();
        assert_eq!(roster.rows()[0].name, "Ann");
    }

    #[test]
    fn test_column_order_and_extra_columns() {
        let roster = parse("Amount,Extra,Name,Link\n3,x,Carl,https://c.test\n").unwrap();
        assert_eq!(
            roster.rows()[0],
            RosterRow {
                link: "https://c.test".to_string(),
                name: "Carl".to_string(),
                amount: 3,
            }
        );
    }

    #[test]
    fn test_missing_amount_column_is_rejected() {
        let err = parse("Link,Name\nhttps://a.test,Ann\n").unwrap_err();
        match err {
            StampError::MissingColumns { missing } => assert_eq!(missing, vec!["Amount"]),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_column_names_are_case_sensitive() {
        let err = parse("link,name,amount\nhttps://a.test,Ann,1\n").unwrap_err();
        match err {
            StampError::MissingColumns { missing } => {
                assert_eq!(missing, vec!["Link", "Name", "Amount"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_non_numeric_amount_is_rejected() {
        let err = parse("Link,Name,Amount\nhttps://a.test,Ann,1\nhttps://b.test,Bob,two\n")
            .unwrap_err();
        match err {
            StampError::InvalidAmount { row, value } => {
                assert_eq!(row, 2);
                assert_eq!(value, "two");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_negative_amount_is_rejected() {
        assert!(matches!(
            parse("Link,Name,Amount\nhttps://a.test,Ann,-1\n"),
            Err(StampError::InvalidAmount { .. })
        ));
    }

    #[test]
    fn test_empty_link_is_rejected() {
        assert!(matches!(
            parse("Link,Name,Amount\n,Ann,1\n"),
            Err(StampError::EmptyLink { row: 1 })
        ));
    }

    #[test]
    fn test_ragged_rows_fail_to_parse() {
        assert!(matches!(
            parse("Link,Name,Amount\nhttps://a.test,Ann\n"),
            Err(StampError::Csv(_))
        ));
    }

    #[test]
    fn test_quoted_names_keep_commas() {
        let roster = parse("Link,Name,Amount\nhttps://a.test,\"Doe, Jane\",1\n").unwrap();
        assert_eq!(roster.rows()[0].name, "Doe, Jane");
    }

    #[test]
    fn test_parse_amount_variants() {
        assert_eq!(parse_amount("2"), Some(2));
        assert_eq!(parse_amount(" 4 "), Some(4));
        assert_eq!(parse_amount("2.0"), Some(2));
        assert_eq!(parse_amount("2.5"), None);
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("NaN"), None);
    }

    #[test]
    fn test_load_roster_from_file() {
        use std::io::Write as _;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "Link,Name,Amount\r\nhttps://a.test,Ann,1\r\n").unwrap();
        let roster = load_roster(file.path()).unwrap();
        assert_eq!(roster.len(), 1);
    }
}
