//! CSV reading utilities.

mod header;
mod reader;

pub use header::{CsvLayout, Delimiter, detect_layout, read_header};
pub use reader::{ParsedCsv, parse_csv};
