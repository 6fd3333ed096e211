//! Idempotency key resolution for write requests.
//!
//! Resolution order, first match wins:
//! 1. a non-empty explicit key from the caller, verbatim;
//! 2. the first hinted field found by breadth-first traversal of the payload
//!    (shallower wins; declaration order within a depth);
//! 3. a fresh token from the injected source (UUID v4 by default).
//!
//! Keys are computed fresh per write call and never persisted by this layer.

use serde_json::Value;
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use uuid::Uuid;

/// Payload field names that can stand in as a natural deduplication key,
/// localized forms included. Matched case-insensitively.
pub const IDEMPOTENCY_HINT_KEYS: [&str; 9] =
    ["number", "no", "code", "billno", "externalno", "extno", "thirdno", "编码", "单号"];

/// Injected generator for fallback keys.
pub type TokenSource = Arc<dyn Fn() -> String + Send + Sync>;

/// UUID v4 source used when nothing better is injected.
pub fn uuid_token_source() -> TokenSource {
    Arc::new(|| Uuid::new_v4().to_string())
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Breadth-first search for the first non-empty hinted field in `payload`.
///
/// Maps and sequences are both traversed; the visited set is keyed on node
/// identity so shared or (hypothetically) cyclic structures stay bounded.
pub fn find_value_by_hints(payload: &Value) -> Option<String> {
    let mut queue: VecDeque<&Value> = VecDeque::new();
    let mut seen: HashSet<*const Value> = HashSet::new();
    queue.push_back(payload);

    while let Some(current) = queue.pop_front() {
        if !seen.insert(current as *const Value) {
            continue;
        }
        match current {
            Value::Array(items) => {
                for item in items {
                    queue.push_back(item);
                }
            }
            Value::Object(map) => {
                for (key, value) in map {
                    let lower = key.to_lowercase();
                    if IDEMPOTENCY_HINT_KEYS.contains(&lower.as_str()) {
                        if let Some(text) = scalar_text(value) {
                            return Some(text);
                        }
                    }
                    if value.is_object() || value.is_array() {
                        queue.push_back(value);
                    }
                }
            }
            _ => {}
        }
    }
    None
}

/// Resolve the idempotency key for one write call.
pub fn resolve_idempotency_key(
    explicit: Option<&str>,
    payload: &Value,
    token_source: &TokenSource,
) -> String {
    if let Some(key) = explicit {
        if !key.is_empty() {
            return key.to_string();
        }
    }
    if let Some(found) = find_value_by_hints(payload) {
        return found;
    }
    (token_source)()
}
