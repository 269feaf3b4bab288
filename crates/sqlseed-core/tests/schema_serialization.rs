use sqlseed_core::{ColumnDescriptor, Row, TableSchema, Value};

fn column(position: i32, name: &str, declared_type: &str, pk: bool) -> ColumnDescriptor {
    ColumnDescriptor {
        ordinal_position: position,
        name: name.to_string(),
        declared_type: declared_type.to_string(),
        is_primary_key: pk,
        is_not_null: false,
        default: None,
    }
}

#[test]
fn serializes_schema_deterministically() {
    let schema = TableSchema {
        name: "t".to_string(),
        columns: vec![column(0, "id", "INTEGER", true)],
    };

    let json = serde_json::to_string_pretty(&schema).expect("serialize schema");
    let expected = r#"{
  "name": "t",
  "columns": [
    {
      "ordinal_position": 0,
      "name": "id",
      "declared_type": "INTEGER",
      "is_primary_key": true,
      "is_not_null": false,
      "default": null
    }
  ]
}"#;
    assert_eq!(json, expected);
}

#[test]
fn rows_serialize_as_plain_objects() {
    let mut row = Row::new();
    row.insert("name", Value::Text("Bob".to_string()));
    row.insert("id", Value::Int(1));
    row.insert("salary", Value::Decimal(1250.5));

    let json = serde_json::to_string(&row).expect("serialize row");
    assert_eq!(json, r#"{"id":1,"name":"Bob","salary":1250.5}"#);

    let keys: Vec<&str> = row.keys().collect();
    assert_eq!(keys, vec!["id", "name", "salary"]);
}

#[test]
fn schema_lookup_by_column_name() {
    let schema = TableSchema {
        name: "employees".to_string(),
        columns: vec![
            column(0, "id", "INTEGER", true),
            column(1, "email", "TEXT", false),
        ],
    };

    assert!(schema.column("email").is_some());
    assert!(schema.column("missing").is_none());
    assert_eq!(schema.column_names().collect::<Vec<_>>(), vec!["id", "email"]);
    assert!(schema.columns[0].is_integer_primary_key());
    assert!(!schema.columns[1].is_integer_primary_key());
}
