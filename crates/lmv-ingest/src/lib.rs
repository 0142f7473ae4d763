//! File intake for loyalty migration files.
//!
//! Everything that happens to a file before its rows are validated lives
//! here: spotting arrivals in the watched folder, waiting for transfers to
//! finish, gating on size, decoding bytes to text, and splitting records.
//! Routing moves into `success/` and `error/` are here as well.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use lmv_ingest::{decode_bytes, detect_layout, parse_csv, read_file_bytes};
//!
//! let path = Path::new("watch_folder/vouchers.csv");
//! let bytes = read_file_bytes(path)?;
//! let decoded = decode_bytes(path, &bytes)?;
//! let layout = detect_layout(&decoded.text);
//! let parsed = parse_csv(path, &decoded.text, layout.delimiter)?;
//! ```

mod csv;
mod decode;
mod discovery;
mod error;
mod layout;
mod size;
mod stability;

// === Error Types ===
pub use error::{IngestError, Result};

// === CSV Reading ===
pub use csv::{CsvLayout, Delimiter, ParsedCsv, detect_layout, parse_csv, read_header};

// === Decoding ===
pub use decode::{
    DecodedText, TextEncoding, UTF8_BOM, decode_bytes, read_file_bytes, strip_utf8_bom,
    validate_encoding,
};

// === Arrival Detection ===
pub use discovery::{DirectorySnapshot, is_csv, is_skipped, list_csv_files};
pub use stability::{Stability, has_stopped_growing, wait_until_stable};

// === Size Gating ===
pub use size::{MAX_FILE_SIZE, SizeClass, SizeLimits, check_file_size, format_file_size};

// === Routing ===
pub use layout::{
    Destination, ERROR_DIR, LOGS_DIR, SUCCESS_DIR, WatchLayout, file_stem, unique_file_name,
    write_bom_free_copy,
};
