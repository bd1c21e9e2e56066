use serde_json::Value;

use crate::config::QuoteField;
use crate::error::QuoteError;

/// Providers disagree on whether quotes are JSON strings or numbers.
pub fn string_or_number_to_f64(key: &str, v: &Value) -> Result<f64, QuoteError> {
    match v {
        Value::String(s) => s.trim().parse::<f64>().map_err(|_| QuoteError::NotNumeric {
            key: key.to_string(),
            raw: s.clone(),
        }),
        Value::Number(n) => n.as_f64().ok_or_else(|| QuoteError::NotNumeric {
            key: key.to_string(),
            raw: n.to_string(),
        }),
        other => Err(QuoteError::NotNumeric {
            key: key.to_string(),
            raw: other.to_string(),
        }),
    }
}

/// Read one configured field out of a response body and check it is usable
/// downstream: finite, non-negative, and strictly positive when flagged.
pub fn extract_field(body: &Value, field: &QuoteField) -> Result<f64, QuoteError> {
    let raw = match body.pointer(&field.pointer) {
        Some(Value::Null) | None => {
            return Err(QuoteError::MissingField {
                key: field.key.clone(),
                pointer: field.pointer.clone(),
            })
        }
        Some(v) => v,
    };

    let value = string_or_number_to_f64(&field.key, raw)?;
    if !value.is_finite() {
        return Err(QuoteError::NonFinite {
            key: field.key.clone(),
        });
    }
    if value < 0.0 {
        return Err(QuoteError::Negative {
            key: field.key.clone(),
            value,
        });
    }
    if field.positive && value == 0.0 {
        return Err(QuoteError::Degenerate {
            key: field.key.clone(),
            value,
        });
    }
    Ok(value)
}
