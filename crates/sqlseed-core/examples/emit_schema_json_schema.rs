use schemars::schema_for;
use sqlseed_core::TableSchema;

fn main() {
    let schema = schema_for!(TableSchema);
    let json = serde_json::to_string_pretty(&schema).expect("serialize json schema");
    println!("{json}");
}
