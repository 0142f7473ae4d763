//! Record parsing into positionally aligned rows.

use std::path::Path;

use lmv_model::RawRow;
use tracing::debug;

use crate::error::{IngestError, Result};

use super::header::Delimiter;

/// Parsed content of one file.
#[derive(Debug, Clone)]
pub struct ParsedCsv {
    pub delimiter: Delimiter,
    /// First non-blank record.
    pub header: Vec<String>,
    /// Data rows numbered from 2 in file order.
    pub rows: Vec<RawRow>,
}

impl ParsedCsv {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Parse every record of `text`.
///
/// Quoted fields are honoured, field counts may vary between records, and
/// values are kept untrimmed. Records whose fields are all blank are skipped
/// and do not consume a row number.
pub fn parse_csv(path: &Path, text: &str, delimiter: Delimiter) -> Result<ParsedCsv> {
    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter.as_byte())
        .from_reader(text.as_bytes());

    let mut header: Option<Vec<String>> = None;
    let mut rows = Vec::new();

    for record in reader.records() {
        let record = record.map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            source: e,
        })?;
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }

        let fields: Vec<String> = record.iter().map(str::to_string).collect();
        if header.is_none() {
            header = Some(fields);
            continue;
        }
        let number = rows.len() + 2;
        rows.push(RawRow::with_delimiter(number, fields, delimiter.as_char()));
    }

    debug!(
        path = %path.display(),
        rows = rows.len(),
        delimiter = %delimiter,
        "Parsed CSV records"
    );

    Ok(ParsedCsv {
        delimiter,
        header: header.unwrap_or_default(),
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str, delimiter: Delimiter) -> ParsedCsv {
        parse_csv(Path::new("test.csv"), text, delimiter).unwrap()
    }

    #[test]
    fn test_rows_numbered_from_two() {
        let parsed = parse("a,b\n1,2\n3,4\n", Delimiter::Comma);
        assert_eq!(parsed.header, vec!["a", "b"]);
        assert_eq!(parsed.row_count(), 2);
        assert_eq!(parsed.rows[0].number, 2);
        assert_eq!(parsed.rows[1].number, 3);
        assert_eq!(parsed.rows[1].raw, "3,4");
    }

    #[test]
    fn test_quoted_comma_stays_in_field() {
        let parsed = parse("a,b\n\"x, y\",2\n", Delimiter::Comma);
        assert_eq!(parsed.rows[0].fields, vec!["x, y", "2"]);
        assert_eq!(parsed.rows[0].raw, "\"x, y\",2");
    }

    #[test]
    fn test_uneven_records_kept() {
        let parsed = parse("a,b,c\n1,2\n1,2,3,4\n", Delimiter::Comma);
        assert_eq!(parsed.rows[0].len(), 2);
        assert_eq!(parsed.rows[1].len(), 4);
    }

    #[test]
    fn test_blank_records_skipped() {
        let parsed = parse("a,b\n\n1,2\n,\n3,4\n", Delimiter::Comma);
        let numbers: Vec<usize> = parsed.rows.iter().map(|r| r.number).collect();
        assert_eq!(numbers, vec![2, 3]);
    }

    #[test]
    fn test_semicolon_rows() {
        let parsed = parse("a;b\n1;x,y\n", Delimiter::Semicolon);
        assert_eq!(parsed.rows[0].fields, vec!["1", "x,y"]);
        assert_eq!(parsed.rows[0].raw, "1;x,y");
    }

    #[test]
    fn test_empty_text() {
        let parsed = parse("", Delimiter::Comma);
        assert!(parsed.header.is_empty());
        assert!(parsed.rows.is_empty());
    }
}
