use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::types::ValueKind;

/// Table extracted from a single `CREATE TABLE` statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TableSchema {
    pub name: String,
    /// Columns in declaration order.
    pub columns: Vec<ColumnDescriptor>,
}

impl TableSchema {
    pub fn column(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|column| column.name.as_str())
    }
}

/// Column metadata as reported by the relational engine.
///
/// The declared type is kept verbatim; semantic typing is inferred from it by
/// substring matching (see [`ValueKind::from_declared`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ColumnDescriptor {
    pub ordinal_position: i32,
    pub name: String,
    pub declared_type: String,
    pub is_primary_key: bool,
    /// Informational only; the synthesizer never produces nulls.
    pub is_not_null: bool,
    pub default: Option<String>,
}

impl ColumnDescriptor {
    pub fn value_kind(&self) -> ValueKind {
        ValueKind::from_declared(&self.declared_type)
    }

    /// Integer primary keys are numbered from the row index instead of being
    /// synthesized.
    pub fn is_integer_primary_key(&self) -> bool {
        self.is_primary_key && self.value_kind() == ValueKind::Integer
    }
}
