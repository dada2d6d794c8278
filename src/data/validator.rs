//! Minimal structural check of inbound measurement payloads.

use serde_json::Value;
use thiserror::Error;

use super::measurement::{Measurement, Reading};

/// Why a payload was not accepted for rendering.
///
/// These are expected on a live channel (empty pushes, keep-alives) and are
/// never surfaced to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Invalid {
    #[error("payload is null")]
    NullPayload,
    #[error("payload is not an object")]
    NotAnObject,
    #[error("payload has no data section")]
    MissingData,
}

/// Accept a payload that is a non-null object whose `data` field is present
/// and not falsy (`null`, `false`, `0`, or `""`).
///
/// Nested fields are not checked here; they are decoded leniently and any
/// gaps show up as placeholders in the rendered output.
pub fn validate(payload: &Value) -> Result<Measurement, Invalid> {
    let object = match payload {
        Value::Null => return Err(Invalid::NullPayload),
        Value::Object(object) => object,
        _ => return Err(Invalid::NotAnObject),
    };

    let data = match object.get("data") {
        Some(data) if !is_falsy(data) => data,
        _ => return Err(Invalid::MissingData),
    };

    Ok(Measurement {
        timestamp: object.get("timestamp").and_then(Value::as_f64),
        data: decode_reading(data),
    })
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().map_or(false, |v| v == 0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// A data section that is not an object decodes to an empty reading.
fn decode_reading(data: &Value) -> Reading {
    if !data.is_object() {
        return Reading::default();
    }
    serde_json::from_value(data.clone()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_payload_is_invalid() {
        assert_eq!(validate(&Value::Null), Err(Invalid::NullPayload));
    }

    #[test]
    fn test_non_object_payload_is_invalid() {
        assert_eq!(validate(&json!(42)), Err(Invalid::NotAnObject));
        assert_eq!(validate(&json!("measurement")), Err(Invalid::NotAnObject));
        assert_eq!(validate(&json!([])), Err(Invalid::NotAnObject));
    }

    #[test]
    fn test_missing_or_null_data_is_invalid() {
        assert_eq!(validate(&json!({})), Err(Invalid::MissingData));
        assert_eq!(validate(&json!({ "timestamp": 10 })), Err(Invalid::MissingData));
        assert_eq!(
            validate(&json!({ "timestamp": 10, "data": null })),
            Err(Invalid::MissingData)
        );
    }

    #[test]
    fn test_falsy_data_is_invalid() {
        for data in [json!(false), json!(0), json!(0.0), json!("")] {
            assert_eq!(
                validate(&json!({ "timestamp": 0, "data": data })),
                Err(Invalid::MissingData),
                "data = {}",
                data
            );
        }
    }

    #[test]
    fn test_valid_payload() {
        let measurement =
            validate(&json!({ "timestamp": 1700000000, "data": { "water_level": 15 } })).unwrap();
        assert_eq!(measurement.timestamp, Some(1_700_000_000.0));
        assert_eq!(measurement.data.water_level, Some(15.0));
        assert!(measurement.data.inside.is_none());
    }

    #[test]
    fn test_nested_fields_are_not_deep_validated() {
        // Missing timestamp and a non-object data section are still accepted
        let measurement = validate(&json!({ "data": "garbage" })).unwrap();
        assert!(measurement.timestamp.is_none());
        assert_eq!(measurement.data, Reading::default());

        let measurement = validate(&json!({ "timestamp": 5, "data": [3, 4] })).unwrap();
        assert_eq!(measurement.data, Reading::default());
    }
}
