use sqlseed_core::ColumnDescriptor;

use super::queries::RawColumn;

pub fn map_columns(raw: Vec<RawColumn>) -> Vec<ColumnDescriptor> {
    let mut columns: Vec<ColumnDescriptor> = raw
        .into_iter()
        .map(|col| ColumnDescriptor {
            ordinal_position: col.cid as i32,
            name: col.name,
            declared_type: col.declared_type,
            is_primary_key: col.pk > 0,
            is_not_null: col.not_null != 0,
            default: col.default,
        })
        .collect();
    columns.sort_by_key(|col| col.ordinal_position);
    columns
}
