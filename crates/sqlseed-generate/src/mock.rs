use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use sqlseed_core::{ColumnDescriptor, Value, ValueKind};

use crate::prompt::{SeedCategory, category_for};

/// Deterministic stand-in value, used only under `ExhaustedPolicy::SubstituteMock`.
///
/// The value always matches the column's value kind and contains no
/// whitespace, like a parsed model token.
pub fn mock_value(column: &ColumnDescriptor, row_index: u64) -> Value {
    let mut rng = ChaCha8Rng::seed_from_u64(hash_seed(row_index, &column.name));
    let category = category_for(column);

    match column.value_kind() {
        ValueKind::Integer => Value::Int(match category {
            SeedCategory::Age => rng.random_range(18..=70),
            SeedCategory::Salary => rng.random_range(30_000..=150_000),
            _ => rng.random_range(1..=1_000),
        }),
        ValueKind::Decimal => {
            let raw = match category {
                SeedCategory::Salary => rng.random_range(30_000.0_f64..150_000.0),
                _ => rng.random_range(0.0_f64..1_000.0),
            };
            Value::Decimal((raw * 100.0_f64).round() / 100.0)
        }
        ValueKind::Text => Value::Text(mock_text(category, column, row_index, &mut rng)),
    }
}

fn mock_text(
    category: SeedCategory,
    column: &ColumnDescriptor,
    row_index: u64,
    rng: &mut impl Rng,
) -> String {
    match category {
        SeedCategory::FirstName | SeedCategory::Name => pick(FIRST_NAMES, rng).to_string(),
        SeedCategory::LastName => pick(LAST_NAMES, rng).to_string(),
        SeedCategory::Email => format!(
            "{}.{}{}@example.com",
            pick(FIRST_NAMES, rng).to_lowercase(),
            pick(LAST_NAMES, rng).to_lowercase(),
            row_index + 1
        ),
        SeedCategory::Date => format!(
            "2024-{:02}-{:02}",
            rng.random_range(1..=12),
            rng.random_range(1..=28)
        ),
        SeedCategory::Department => pick(DEPARTMENTS, rng).to_string(),
        SeedCategory::Phone => format!("555-{:04}", rng.random_range(0..10_000)),
        SeedCategory::City => pick(CITIES, rng).to_string(),
        SeedCategory::Country => pick(COUNTRIES, rng).to_string(),
        SeedCategory::Salary | SeedCategory::Decimal => {
            format!("{:.2}", rng.random_range(0.0..1_000.0_f64))
        }
        SeedCategory::Age | SeedCategory::Integer => rng.random_range(1..=1_000).to_string(),
        SeedCategory::Text => format!("{}_{}", column.name, row_index + 1),
    }
}

fn pick<'a>(values: &'a [&'a str], rng: &mut impl Rng) -> &'a str {
    if values.is_empty() {
        return "";
    }
    values[rng.random_range(0..values.len())]
}

fn hash_seed(row_index: u64, key: &str) -> u64 {
    let mut hash = row_index.wrapping_mul(0x9e3779b97f4a7c15) ^ 0xcbf29ce484222325;
    for byte in key.as_bytes() {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

const FIRST_NAMES: &[&str] = &[
    "Alice", "Bob", "Carol", "David", "Emma", "Frank", "Grace", "Henry",
];

const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Brown", "Garcia", "Miller", "Davis", "Wilson", "Moore",
];

const DEPARTMENTS: &[&str] = &[
    "Engineering", "Sales", "Marketing", "Finance", "Support", "Operations",
];

const CITIES: &[&str] = &["Boston", "Denver", "Austin", "Seattle", "Chicago", "Portland"];

const COUNTRIES: &[&str] = &["Canada", "Mexico", "Brazil", "France", "Japan", "Kenya"];
