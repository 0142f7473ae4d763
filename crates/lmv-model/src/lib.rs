//! Data model for loyalty migration file validation.
//!
//! Defines the three fixed CSV layouts accepted by the migration tooling
//! (contacts, points, vouchers) and the per-row types that flow between the
//! ingest, validation and reporting crates.

mod outcome;
mod schema;

pub use outcome::{ErrorKind, FieldError, RawRow, RowOutcome};
pub use schema::{
    CONTACTS_COLUMNS, POINTS_COLUMNS, Schema, VOUCHERS_COLUMNS, header_mismatch_message,
};
