use sqlseed_core::{Value, ValueKind};

use crate::errors::AttemptFailure;

/// First whitespace-delimited token of the first line of `raw`.
pub fn extract_token(raw: &str) -> Option<&str> {
    let first_line = raw.lines().next()?;
    let token = first_line.split_whitespace().next()?.trim();
    if token.is_empty() { None } else { Some(token) }
}

/// Coerce a token to the column's value kind.
///
/// Numeric kinds are strict; text accepts any non-empty token verbatim.
pub fn coerce(token: &str, kind: ValueKind) -> Result<Value, AttemptFailure> {
    let mismatch = || AttemptFailure::TypeMismatch {
        expected: kind,
        token: token.to_string(),
    };

    match kind {
        ValueKind::Integer => token.parse::<i64>().map(Value::Int).map_err(|_| mismatch()),
        ValueKind::Decimal => match token.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(Value::Decimal(value)),
            _ => Err(mismatch()),
        },
        ValueKind::Text => Ok(Value::Text(token.to_string())),
    }
}

/// Extract and coerce in one step.
pub fn parse_output(raw: &str, kind: ValueKind) -> Result<Value, AttemptFailure> {
    let token = extract_token(raw).ok_or(AttemptFailure::Empty)?;
    coerce(token, kind)
}
