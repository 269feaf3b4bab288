use std::collections::BTreeSet;

use crate::error::{Error, Result};
use crate::schema::TableSchema;

/// Validate internal consistency of an extracted table.
///
/// This checks:
/// - the table has a name and at least one column
/// - column names are non-empty and unique
/// - ordinal positions are strictly increasing
pub fn validate_table(table: &TableSchema) -> Result<()> {
    if table.name.trim().is_empty() {
        return Err(Error::InvalidSchema("table name is empty".to_string()));
    }

    if table.columns.is_empty() {
        return Err(Error::InvalidSchema(format!(
            "table has no columns: {}",
            table.name
        )));
    }

    let mut names = BTreeSet::new();
    let mut last_position = None;
    for column in &table.columns {
        if column.name.is_empty() {
            return Err(Error::InvalidSchema(format!(
                "column with empty name in table: {}",
                table.name
            )));
        }

        if !names.insert(column.name.as_str()) {
            return Err(Error::InvalidSchema(format!(
                "duplicate column name: {}.{}",
                table.name, column.name
            )));
        }

        if let Some(previous) = last_position {
            if column.ordinal_position <= previous {
                return Err(Error::InvalidSchema(format!(
                    "columns out of declaration order at: {}.{}",
                    table.name, column.name
                )));
            }
        }
        last_position = Some(column.ordinal_position);
    }

    Ok(())
}
