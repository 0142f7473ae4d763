//! The three fixed migration file layouts.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Column order for contact migration files.
pub const CONTACTS_COLUMNS: &[&str] = &[
    "userId",
    "shouldJoin",
    "joinDate",
    "tierName",
    "tierEntryAt",
    "tierCalcAt",
    "shouldReward",
];

/// Column order for point grant files.
pub const POINTS_COLUMNS: &[&str] = &[
    "userId",
    "pointsToSpend",
    "statusPoints",
    "cashback",
    "allocatedAt",
    "expireAt",
    "setPlanExpiration",
    "reason",
    "title",
    "description",
];

/// Column order for voucher files.
pub const VOUCHERS_COLUMNS: &[&str] = &[
    "userId",
    "externalId",
    "voucherType",
    "voucherName",
    "iconName",
    "code",
    "expiration",
];

/// A migration file layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Schema {
    Contacts,
    Points,
    Vouchers,
}

impl Schema {
    /// All known layouts, in classification order.
    pub const fn all() -> &'static [Self] {
        &[Self::Contacts, Self::Points, Self::Vouchers]
    }

    /// Expected header, in order.
    pub const fn columns(&self) -> &'static [&'static str] {
        match self {
            Self::Contacts => CONTACTS_COLUMNS,
            Self::Points => POINTS_COLUMNS,
            Self::Vouchers => VOUCHERS_COLUMNS,
        }
    }

    /// Number of columns every row must have.
    pub const fn column_count(&self) -> usize {
        self.columns().len()
    }

    /// Position of a column in this layout.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns().iter().position(|column| *column == name)
    }

    /// Human-readable label.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Contacts => "Contacts",
            Self::Points => "Points",
            Self::Vouchers => "Vouchers",
        }
    }

    /// Upper-case code used in reports.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Contacts => "CONTACTS",
            Self::Points => "POINTS",
            Self::Vouchers => "VOUCHERS",
        }
    }

    /// Classify a header by exact, order-sensitive comparison.
    ///
    /// Returns `None` when the header matches none of the layouts. There is
    /// no fuzzy acceptance: a header with the right names in the wrong order
    /// is unknown.
    pub fn classify<S: AsRef<str>>(header: &[S]) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|schema| matches_exactly(schema.columns(), header))
    }

    /// Best-effort guess of the intended layout by column-name overlap.
    ///
    /// Only used to make the header-mismatch diagnostic more specific. Ties
    /// resolve in classification order.
    pub fn closest<S: AsRef<str>>(header: &[S]) -> Option<Self> {
        let found: BTreeSet<&str> = header.iter().map(AsRef::as_ref).collect();
        let mut best: Option<(Self, usize)> = None;

        for schema in Self::all() {
            let overlap = schema
                .columns()
                .iter()
                .filter(|column| found.contains(*column))
                .count();
            if overlap == 0 {
                continue;
            }
            match best {
                Some((_, best_overlap)) if best_overlap >= overlap => {}
                _ => best = Some((*schema, overlap)),
            }
        }

        best.map(|(schema, _)| schema)
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn matches_exactly<S: AsRef<str>>(expected: &[&str], header: &[S]) -> bool {
    expected.len() == header.len()
        && expected
            .iter()
            .zip(header)
            .all(|(expected, found)| *expected == found.as_ref())
}

/// Diagnostic for a header that matched no layout.
///
/// Names the closest layout when the columns overlap one, otherwise lists
/// all three accepted layouts.
pub fn header_mismatch_message<S: AsRef<str>>(file_name: &str, header: &[S]) -> String {
    let found = if header.iter().all(|column| column.as_ref().is_empty()) {
        "No headers found or file is empty".to_string()
    } else {
        join_columns(header.iter().map(AsRef::as_ref))
    };

    match Schema::closest(header) {
        Some(schema) => format!(
            "The header in file {file_name} does not match the expected {} format:\n\n\
             Found:       {found}\n\
             Expected:    {}",
            schema.code(),
            join_columns(schema.columns().iter().copied()),
        ),
        None => format!(
            "The header in file {file_name} does not match any of the expected formats:\n\n\
             Found:       {found}\n\
             Contacts:    {}\n\
             Points:      {}\n\
             Vouchers:    {}",
            join_columns(CONTACTS_COLUMNS.iter().copied()),
            join_columns(POINTS_COLUMNS.iter().copied()),
            join_columns(VOUCHERS_COLUMNS.iter().copied()),
        ),
    }
}

fn join_columns<'a>(columns: impl Iterator<Item = &'a str>) -> String {
    columns.collect::<Vec<_>>().join(", ")
}
