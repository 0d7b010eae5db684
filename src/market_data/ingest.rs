// =============================================================================
// Bar validation
// =============================================================================
//
// Every field is checked for presence and type explicitly.  A price of `0` is
// a legitimate value and must pass; only absent, null, non-numeric or
// non-finite values are rejected.
// =============================================================================

use serde_json::{Map, Value};

use crate::error::ValidationError;
use crate::market_data::Bar;

impl Bar {
    /// Build a bar from already-typed values (used by in-process producers
    /// such as the tick feed).
    pub fn new(
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        timestamp: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let timestamp = timestamp.into();
        for (name, value) in [("open", open), ("high", high), ("low", low), ("close", close)] {
            if !value.is_finite() {
                return Err(ValidationError::NonFinite(name));
            }
        }
        if timestamp.trim().is_empty() {
            return Err(ValidationError::EmptyTimestamp);
        }
        Ok(Self {
            open,
            high,
            low,
            close,
            timestamp,
        })
    }
}

/// Validate a raw JSON candidate and turn it into a [`Bar`].
pub fn validate_bar(candidate: &Value) -> Result<Bar, ValidationError> {
    let obj = candidate.as_object().ok_or(ValidationError::NotAnObject)?;

    let open = price_field(obj, "open")?;
    let high = price_field(obj, "high")?;
    let low = price_field(obj, "low")?;
    let close = price_field(obj, "close")?;
    let timestamp = timestamp_field(obj)?;

    Bar::new(open, high, low, close, timestamp)
}

fn price_field(obj: &Map<String, Value>, name: &'static str) -> Result<f64, ValidationError> {
    match obj.get(name) {
        None | Some(Value::Null) => Err(ValidationError::MissingField(name)),
        Some(Value::Number(n)) => n.as_f64().ok_or(ValidationError::NotNumeric(name)),
        Some(_) => Err(ValidationError::NotNumeric(name)),
    }
}

/// The timestamp is opaque to the engine.  Strings are taken as-is and
/// numbers (epoch values) are kept in their decimal form.
fn timestamp_field(obj: &Map<String, Value>) -> Result<String, ValidationError> {
    match obj.get("timestamp") {
        None | Some(Value::Null) => Err(ValidationError::MissingField("timestamp")),
        Some(Value::String(s)) if s.trim().is_empty() => Err(ValidationError::EmptyTimestamp),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(_) => Err(ValidationError::Malformed(
            "timestamp must be a string or number".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_well_formed_bar() {
        let bar = validate_bar(&json!({
            "open": 1.5, "high": 2.0, "low": 1.0, "close": 1.75,
            "timestamp": "2024-01-01 00:00:05"
        }))
        .unwrap();
        assert_eq!(bar.close, 1.75);
        assert_eq!(bar.timestamp, "2024-01-01 00:00:05");
    }

    #[test]
    fn zero_prices_are_valid() {
        let bar = validate_bar(&json!({
            "open": 0, "high": 0, "low": 0, "close": 0, "timestamp": "t"
        }))
        .unwrap();
        assert_eq!(bar.open, 0.0);
        assert_eq!(bar.close, 0.0);
    }

    #[test]
    fn numeric_timestamp_is_kept_as_text() {
        let bar = validate_bar(&json!({
            "open": 1, "high": 1, "low": 1, "close": 1, "timestamp": 1700000000000u64
        }))
        .unwrap();
        assert_eq!(bar.timestamp, "1700000000000");
    }

    #[test]
    fn missing_and_null_fields_rejected() {
        let err = validate_bar(&json!({
            "open": 1, "high": 1, "low": 1, "timestamp": "t"
        }))
        .unwrap_err();
        assert_eq!(err, ValidationError::MissingField("close"));

        let err = validate_bar(&json!({
            "open": null, "high": 1, "low": 1, "close": 1, "timestamp": "t"
        }))
        .unwrap_err();
        assert_eq!(err, ValidationError::MissingField("open"));
    }

    #[test]
    fn non_numeric_price_rejected() {
        let err = validate_bar(&json!({
            "open": "1.0", "high": 1, "low": 1, "close": 1, "timestamp": "t"
        }))
        .unwrap_err();
        assert_eq!(err, ValidationError::NotNumeric("open"));
    }

    #[test]
    fn empty_timestamp_rejected() {
        let err = validate_bar(&json!({
            "open": 1, "high": 1, "low": 1, "close": 1, "timestamp": "  "
        }))
        .unwrap_err();
        assert_eq!(err, ValidationError::EmptyTimestamp);
    }

    #[test]
    fn non_object_rejected() {
        assert_eq!(
            validate_bar(&json!([1, 2, 3])).unwrap_err(),
            ValidationError::NotAnObject
        );
    }

    #[test]
    fn typed_constructor_rejects_nan() {
        assert_eq!(
            Bar::new(1.0, f64::NAN, 1.0, 1.0, "t").unwrap_err(),
            ValidationError::NonFinite("high")
        );
        assert_eq!(
            Bar::new(1.0, 1.0, 1.0, f64::INFINITY, "t").unwrap_err(),
            ValidationError::NonFinite("close")
        );
    }

    #[test]
    fn every_rejection_reports_invalid_input() {
        let err = validate_bar(&json!({})).unwrap_err();
        assert_eq!(err.reason(), "invalid-input");
    }
}
