//! Header detection and delimiter repair.

use std::fmt;

use lmv_model::Schema;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Field delimiter of a migration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Delimiter {
    /// The only accepted delimiter.
    #[default]
    Comma,
    /// Tolerated for parsing but always reported.
    Semicolon,
}

impl Delimiter {
    pub fn as_byte(self) -> u8 {
        match self {
            Self::Comma => b',',
            Self::Semicolon => b';',
        }
    }

    pub fn as_char(self) -> char {
        char::from(self.as_byte())
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Comma => f.write_str("comma (,)"),
            Self::Semicolon => f.write_str("semicolon (;)"),
        }
    }
}

/// Header of a file and how it was classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvLayout {
    /// Delimiter rows must be parsed with.
    pub delimiter: Delimiter,
    /// Header fields as found, untrimmed.
    pub header: Vec<String>,
    /// Matched layout, if any.
    pub schema: Option<Schema>,
}

impl CsvLayout {
    /// True when the header only matched after switching to semicolons.
    pub fn has_wrong_delimiter(&self) -> bool {
        self.delimiter != Delimiter::Comma && self.schema.is_some()
    }
}

/// First non-blank record of `text`, split with `delimiter`.
///
/// Returns an empty list for empty input.
pub fn read_header(text: &str, delimiter: Delimiter) -> Vec<String> {
    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter.as_byte())
        .from_reader(text.as_bytes());

    for record in reader.records() {
        let Ok(record) = record else {
            break;
        };
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        return record.iter().map(str::to_string).collect();
    }
    Vec::new()
}

/// Classify the header, retrying with semicolons when commas fail.
///
/// The semicolon result is only used when it matches a layout exactly;
/// otherwise the comma split is kept for the mismatch diagnostic.
pub fn detect_layout(text: &str) -> CsvLayout {
    let header = read_header(text, Delimiter::Comma);
    if let Some(schema) = Schema::classify(&header) {
        return CsvLayout {
            delimiter: Delimiter::Comma,
            header,
            schema: Some(schema),
        };
    }

    let semicolon_header = read_header(text, Delimiter::Semicolon);
    if let Some(schema) = Schema::classify(&semicolon_header) {
        debug!(schema = %schema, "Header matched after switching to semicolon delimiter");
        return CsvLayout {
            delimiter: Delimiter::Semicolon,
            header: semicolon_header,
            schema: Some(schema),
        };
    }

    CsvLayout {
        delimiter: Delimiter::Comma,
        header,
        schema: None,
    }
}
