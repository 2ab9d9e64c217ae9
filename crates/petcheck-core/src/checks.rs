//! Assertion helpers used by scenarios
//!
//! No I/O. Each helper inspects an [`Exchange`] and either passes or returns a
//! [`Failure`] that carries the exchange.

use serde_json::Value;

use crate::exchange::Exchange;
use crate::schema::{SchemaName, SchemaSet};
use crate::verdict::{Failure, FailureKind};

/// Characters of `shipDate` the service is expected to echo verbatim.
/// The service may append zone offsets or extra precision past this point.
pub const SHIP_DATE_PRECISION: usize = 23;

/// Response status must equal `expected`.
pub fn expect_status(ex: &Exchange, expected: u16) -> Result<(), Failure> {
    let actual = ex.status();
    if actual == expected {
        return Ok(());
    }
    Err(ex.fail(
        FailureKind::StatusMismatch,
        format!("expected status {expected}, got {actual} on {}", ex.label()),
    ))
}

/// Raw response text must equal `expected` exactly.
pub fn expect_text(ex: &Exchange, expected: &str) -> Result<(), Failure> {
    if ex.text() == expected {
        return Ok(());
    }
    Err(ex.fail(
        FailureKind::BodyMismatch,
        format!(
            "expected body {expected:?}, got {:?}",
            preview(ex.text(), 200)
        ),
    ))
}

/// Parse the response body as JSON.
pub fn expect_json(ex: &Exchange) -> Result<Value, Failure> {
    serde_json::from_str(ex.text()).map_err(|e| {
        ex.fail(
            FailureKind::MalformedJson,
            format!("{e}; body: {:?}", preview(ex.text(), 200)),
        )
    })
}

/// `body` must satisfy the contract `name`.
pub fn expect_schema(
    ex: &Exchange,
    body: &Value,
    schemas: &SchemaSet,
    name: SchemaName,
) -> Result<(), Failure> {
    schemas
        .validate(name, body)
        .map_err(|e| ex.fail(FailureKind::SchemaViolation, e.to_string()))
}

/// `body[field]` must equal `expected`. A missing field is a mismatch.
pub fn expect_field_eq(
    ex: &Exchange,
    body: &Value,
    field: &str,
    expected: &Value,
) -> Result<(), Failure> {
    match body.get(field) {
        Some(actual) if actual == expected => Ok(()),
        Some(actual) => Err(ex.fail(
            FailureKind::FieldMismatch,
            format!("field `{field}`: expected {expected}, got {actual}"),
        )),
        None => Err(ex.fail(
            FailureKind::FieldMismatch,
            format!("field `{field}`: expected {expected}, field missing"),
        )),
    }
}

/// Every field of the `payload` object listed in `fields` must be echoed in `body`.
pub fn expect_fields_match(
    ex: &Exchange,
    body: &Value,
    payload: &Value,
    fields: &[&str],
) -> Result<(), Failure> {
    for field in fields {
        let expected = payload.get(*field).unwrap_or(&Value::Null);
        expect_field_eq(ex, body, field, expected)?;
    }
    Ok(())
}

/// The returned `shipDate`, cut to [`SHIP_DATE_PRECISION`] characters, must equal
/// the submitted value.
pub fn expect_ship_date(ex: &Exchange, body: &Value, submitted: &str) -> Result<(), Failure> {
    let Some(returned) = body.get("shipDate").and_then(Value::as_str) else {
        return Err(ex.fail(
            FailureKind::FieldMismatch,
            "field `shipDate`: missing or not a string",
        ));
    };
    let truncated = truncate_chars(returned, SHIP_DATE_PRECISION);
    if truncated == submitted {
        return Ok(());
    }
    Err(ex.fail(
        FailureKind::FieldMismatch,
        format!("field `shipDate`: expected {submitted:?}, got {truncated:?} (from {returned:?})"),
    ))
}

/// First `n` characters of `s` (never splits a UTF-8 sequence).
#[must_use]
pub fn truncate_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

fn preview(s: &str, max: usize) -> &str {
    truncate_chars(s, max)
}
