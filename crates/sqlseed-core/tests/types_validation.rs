use sqlseed_core::{ColumnDescriptor, Error, TableSchema, ValueKind, declares_date, validate_table};

fn column(position: i32, name: &str) -> ColumnDescriptor {
    ColumnDescriptor {
        ordinal_position: position,
        name: name.to_string(),
        declared_type: "TEXT".to_string(),
        is_primary_key: false,
        is_not_null: false,
        default: None,
    }
}

#[test]
fn value_kind_uses_substring_matching() {
    assert_eq!(ValueKind::from_declared("INTEGER"), ValueKind::Integer);
    assert_eq!(ValueKind::from_declared("int"), ValueKind::Integer);
    assert_eq!(ValueKind::from_declared("BIGINT"), ValueKind::Integer);
    assert_eq!(ValueKind::from_declared("real"), ValueKind::Decimal);
    assert_eq!(ValueKind::from_declared("DOUBLE PRECISION"), ValueKind::Decimal);
    assert_eq!(ValueKind::from_declared("Float"), ValueKind::Decimal);
    assert_eq!(ValueKind::from_declared("VARCHAR(50)"), ValueKind::Text);
    assert_eq!(ValueKind::from_declared("DECIMAL(10,2)"), ValueKind::Text);
    assert_eq!(ValueKind::from_declared(""), ValueKind::Text);
}

#[test]
fn date_detection_is_case_insensitive() {
    assert!(declares_date("date"));
    assert!(declares_date("DATETIME"));
    assert!(!declares_date("TEXT"));
}

#[test]
fn validate_rejects_duplicate_columns() {
    let table = TableSchema {
        name: "t".to_string(),
        columns: vec![column(0, "a"), column(1, "a")],
    };
    assert!(matches!(validate_table(&table), Err(Error::InvalidSchema(_))));
}

#[test]
fn validate_rejects_empty_tables() {
    let table = TableSchema {
        name: "t".to_string(),
        columns: Vec::new(),
    };
    assert!(matches!(validate_table(&table), Err(Error::InvalidSchema(_))));
}

#[test]
fn validate_rejects_out_of_order_columns() {
    let table = TableSchema {
        name: "t".to_string(),
        columns: vec![column(1, "a"), column(0, "b")],
    };
    assert!(matches!(validate_table(&table), Err(Error::InvalidSchema(_))));
}

#[test]
fn validate_accepts_well_formed_table() {
    let table = TableSchema {
        name: "t".to_string(),
        columns: vec![column(0, "a"), column(1, "b")],
    };
    assert!(validate_table(&table).is_ok());
}
