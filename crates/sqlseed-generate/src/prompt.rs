//! Seed prompts for tiny local models.
//!
//! Small models follow instructions poorly, so the prompt is a bare example
//! literal for the column's semantic category and the model is asked to
//! continue it with another value of the same shape.

use sqlseed_core::{ColumnDescriptor, ValueKind, declares_date};

/// Semantic category inferred from a column's name or declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedCategory {
    FirstName,
    LastName,
    Email,
    Salary,
    Date,
    Department,
    Phone,
    City,
    Country,
    Age,
    Name,
    Integer,
    Decimal,
    Text,
}

impl SeedCategory {
    /// Example literal handed to the model.
    pub fn seed(&self) -> &'static str {
        match self {
            SeedCategory::FirstName => "Alice",
            SeedCategory::LastName => "Smith",
            SeedCategory::Email => "alice@example.com",
            SeedCategory::Salary => "55000.00",
            SeedCategory::Date => "2024-01-15",
            SeedCategory::Department => "Engineering",
            SeedCategory::Phone => "555-0100",
            SeedCategory::City => "Boston",
            SeedCategory::Country => "Canada",
            SeedCategory::Age => "34",
            SeedCategory::Name => "Alice",
            SeedCategory::Integer => "42",
            SeedCategory::Decimal => "3.14",
            SeedCategory::Text => "example",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SeedCategory::FirstName => "first_name",
            SeedCategory::LastName => "last_name",
            SeedCategory::Email => "email",
            SeedCategory::Salary => "salary",
            SeedCategory::Date => "date",
            SeedCategory::Department => "department",
            SeedCategory::Phone => "phone",
            SeedCategory::City => "city",
            SeedCategory::Country => "country",
            SeedCategory::Age => "age",
            SeedCategory::Name => "name",
            SeedCategory::Integer => "integer",
            SeedCategory::Decimal => "decimal",
            SeedCategory::Text => "text",
        }
    }
}

struct NameRule {
    matches: fn(&str) -> bool,
    category: SeedCategory,
}

// Evaluated top to bottom against the lowercased column name.
const NAME_RULES: &[NameRule] = &[
    NameRule {
        matches: |name: &str| name.contains("first") && name.contains("name"),
        category: SeedCategory::FirstName,
    },
    NameRule {
        matches: |name: &str| name.contains("last") && name.contains("name"),
        category: SeedCategory::LastName,
    },
    NameRule {
        matches: |name: &str| name.contains("email"),
        category: SeedCategory::Email,
    },
    NameRule {
        matches: |name: &str| name.contains("salary"),
        category: SeedCategory::Salary,
    },
    NameRule {
        matches: |name: &str| name.contains("date"),
        category: SeedCategory::Date,
    },
    NameRule {
        matches: |name: &str| name.contains("department"),
        category: SeedCategory::Department,
    },
    NameRule {
        matches: |name: &str| name.contains("phone"),
        category: SeedCategory::Phone,
    },
    NameRule {
        matches: |name: &str| name.contains("city"),
        category: SeedCategory::City,
    },
    NameRule {
        matches: |name: &str| name.contains("country"),
        category: SeedCategory::Country,
    },
    NameRule {
        matches: |name: &str| name == "age" || name.starts_with("age_") || name.ends_with("_age"),
        category: SeedCategory::Age,
    },
    NameRule {
        matches: |name: &str| name.contains("name"),
        category: SeedCategory::Name,
    },
];

/// Pick the category for `column`: name rules first, then declared type.
pub fn category_for(column: &ColumnDescriptor) -> SeedCategory {
    let name = column.name.to_lowercase();
    if let Some(rule) = NAME_RULES.iter().find(|rule| (rule.matches)(&name)) {
        return rule.category;
    }

    match column.value_kind() {
        ValueKind::Integer => SeedCategory::Integer,
        ValueKind::Decimal => SeedCategory::Decimal,
        ValueKind::Text if declares_date(&column.declared_type) => SeedCategory::Date,
        ValueKind::Text => SeedCategory::Text,
    }
}

/// Prompt text for one attempt: the seed literal on its own line.
pub fn build_prompt(column: &ColumnDescriptor) -> String {
    format!("{}\n", category_for(column).seed())
}
