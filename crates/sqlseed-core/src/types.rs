use serde::{Deserialize, Serialize};

/// Scalar kind a column's values are coerced to.
///
/// Derived from the declared type by uppercase substring matching, so
/// `INTEGER`, `BIGINT` and `INT` all classify as [`ValueKind::Integer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Integer,
    Decimal,
    Text,
}

const DECIMAL_MARKERS: &[&str] = &["REAL", "FLOAT", "DOUBLE"];

impl ValueKind {
    pub fn from_declared(declared_type: &str) -> Self {
        let upper = declared_type.to_uppercase();
        if upper.contains("INT") {
            ValueKind::Integer
        } else if DECIMAL_MARKERS.iter().any(|marker| upper.contains(marker)) {
            ValueKind::Decimal
        } else {
            ValueKind::Text
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Integer => "integer",
            ValueKind::Decimal => "decimal",
            ValueKind::Text => "text",
        }
    }
}

/// True when the declared type mentions `DATE` (this includes `DATETIME`).
pub fn declares_date(declared_type: &str) -> bool {
    declared_type.to_uppercase().contains("DATE")
}
