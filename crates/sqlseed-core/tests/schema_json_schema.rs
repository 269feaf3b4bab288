use schemars::schema_for;
use sqlseed_core::TableSchema;

#[test]
fn json_schema_describes_column_fields() {
    let generated = schema_for!(TableSchema);
    let json = serde_json::to_value(&generated).expect("serialize generated schema");

    let column = json
        .pointer("/definitions/ColumnDescriptor/properties")
        .and_then(|value| value.as_object())
        .expect("column descriptor properties");

    for field in [
        "ordinal_position",
        "name",
        "declared_type",
        "is_primary_key",
        "is_not_null",
        "default",
    ] {
        assert!(column.contains_key(field), "missing property {field}");
    }
}
