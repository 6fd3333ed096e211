//! Response-shape conventions: business success codes and payload visibility.
//!
//! The backend family this client targets scatters its envelope across a few
//! legacy layouts. A numeric error code may live at `errcode`, `code`,
//! `data.errcode`, or `data.code`; zero or absent means success. The payload
//! lives at `data.data`, `data.list`, `data.rows`, `data`, or is the whole
//! response, first present wins.

use crate::error::ApiError;
use serde_json::Value;

/// First non-empty value wins; `Null` and `""` count as absent.
fn present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

/// Numeric business error code, if the response declares one.
///
/// Only the first *declared* location is consulted; a non-numeric value there
/// reads as "no code" rather than falling through to deeper locations.
pub fn error_code(resp: &Value) -> Option<i64> {
    let candidates = [
        resp.get("errcode"),
        resp.get("code"),
        resp.pointer("/data/errcode"),
        resp.pointer("/data/code"),
    ];
    let first = candidates.into_iter().flatten().find(|v| present(v))?;
    first.as_i64()
}

/// Human description accompanying a business failure, empty when absent.
pub fn error_description(resp: &Value) -> String {
    let candidates = [
        resp.get("description"),
        resp.get("message"),
        resp.pointer("/data/description"),
        resp.pointer("/data/message"),
    ];
    match candidates.into_iter().flatten().find(|v| present(v)) {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}

/// Fail with a business rejection when the response declares a non-zero code.
pub fn assert_business_success(action: &str, resp: &Value) -> Result<(), ApiError> {
    if let Some(code) = error_code(resp) {
        if code != 0 {
            return Err(ApiError::BusinessRejection {
                action: action.to_string(),
                code,
                description: error_description(resp),
            });
        }
    }
    Ok(())
}

/// Locate the payload portion of a response.
///
/// A declared but empty `data` slot is terminal: the envelope never stands
/// in for it, so an empty detail read reads as "no data" rather than as a
/// visible record.
pub fn extract_data(resp: &Value) -> &Value {
    for path in ["/data/data", "/data/list", "/data/rows", "/data"] {
        if let Some(v) = resp.pointer(path) {
            if present(v) {
                return v;
            }
        }
    }
    resp.get("data").unwrap_or(resp)
}

/// Whether the response carries externally observable data: a non-empty
/// object, sequence, string, or any other scalar.
pub fn has_visible_data(resp: &Value) -> bool {
    match extract_data(resp) {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        _ => true,
    }
}
