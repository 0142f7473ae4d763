//! Validation logs for loyalty migration files.
//!
//! Every rejected file gets a summary log in `logs/` with one labeled
//! section per defect category and a suggested fix. When rows failed, an
//! itemized detail log lists each failing row with its violations and raw
//! content.

mod assessment;
mod error;
mod render;
mod writer;

// === Error Types ===
pub use error::{ReportError, Result};

// === Assessment ===
pub use assessment::{FileAssessment, Finding};

// === Rendering ===
pub use render::{render_details, render_summary};

// === Writing ===
pub use writer::{WrittenLogs, write_reports};
