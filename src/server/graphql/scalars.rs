//! Custom GraphQL scalars.

use chrono::{DateTime, LocalResult, TimeZone, Utc};
use juniper::{graphql_scalar, InputValue, ScalarValue, Value};
use serde::{Deserialize, Serialize};

/// Timestamp carried on the wire as the Unix epoch in milliseconds.
///
/// Epoch milliseconds for any realistic date exceed 32 bits, and the
/// default scalar value has no 64-bit integer, so the wire form is the
/// Float variant holding an integral number of milliseconds. Both integer
/// and float input values parse; non-numeric values are rejected at
/// coercion time.
#[graphql_scalar(name = "Date", with = date_scalar, parse_token(i32, f64))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Date(pub DateTime<Utc>);

mod date_scalar {
    use super::*;

    pub(super) fn to_output<S: ScalarValue>(v: &Date) -> Value<S> {
        Value::scalar(v.0.timestamp_millis() as f64)
    }

    pub(super) fn from_input<S: ScalarValue>(input: &InputValue<S>) -> Result<Date, String> {
        let ms = if let Some(i) = input.as_int_value() {
            i64::from(i)
        } else if let Some(f) = input.as_float_value() {
            f.trunc() as i64
        } else {
            return Err(format!(
                "Expected numeric epoch milliseconds, found: {input}"
            ));
        };
        match Utc.timestamp_millis_opt(ms) {
            LocalResult::Single(dt) => Ok(Date(dt)),
            _ => Err(format!("Invalid epoch milliseconds: {ms}")),
        }
    }
}

impl From<DateTime<Utc>> for Date {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

impl From<Date> for DateTime<Utc> {
    fn from(date: Date) -> Self {
        date.0
    }
}
