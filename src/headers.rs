//! Case-insensitive headers, idempotency injection, and log redaction.

use crate::endpoint::Method;
use crate::idempotency::{resolve_idempotency_key, TokenSource};
use serde_json::Value;

pub const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";
pub const IDEMPOTENCY_TIMEOUT_HEADER: &str = "Idempotency-Timeout";
pub const CONTENT_TYPE_HEADER: &str = "Content-Type";

const MASK: &str = "***";
const MASKED_NAME_FRAGMENTS: [&str; 4] = ["token", "secret", "signature", "authorization"];

/// Header map with case-insensitive names. Insertion order and the caller's
/// original casing are preserved; inserting an existing name (under any case)
/// replaces the value and adopts the new casing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(&name)) {
            slot.0 = name;
            slot.1 = value;
        } else {
            self.entries.push((name, value));
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Merge `other` into self; `other` wins on name collisions.
    pub fn merge(&mut self, other: &Headers) {
        for (name, value) in other.iter() {
            self.insert(name, value);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (name, value) in iter {
            headers.insert(name, value);
        }
        headers
    }
}

/// Inputs for building the header set of one call.
pub struct HeaderSpec<'a> {
    pub default_headers: &'a Headers,
    pub extra_headers: &'a Headers,
    /// Write or workflow operation; reads receive no idempotency headers.
    pub is_write: bool,
    pub method: Method,
    pub idempotency_key: Option<&'a str>,
    /// Injected only when positive and finite, integer-truncated.
    pub idempotency_timeout_secs: Option<f64>,
    pub payload: &'a Value,
    pub enable_idempotency: bool,
    pub token_source: &'a TokenSource,
}

/// Build the final header set: defaults, then extras (extras win), then the
/// write-only injections. A caller-supplied Content-Type under any case is
/// never overwritten.
pub fn build_headers(spec: &HeaderSpec<'_>) -> Headers {
    let mut headers = spec.default_headers.clone();
    headers.merge(spec.extra_headers);

    if !spec.is_write {
        return headers;
    }

    if spec.method.has_body() && !headers.contains(CONTENT_TYPE_HEADER) {
        headers.insert(CONTENT_TYPE_HEADER, "application/json");
    }

    if spec.enable_idempotency {
        let key = resolve_idempotency_key(spec.idempotency_key, spec.payload, spec.token_source);
        headers.insert(IDEMPOTENCY_KEY_HEADER, key);
    }

    if let Some(secs) = spec.idempotency_timeout_secs {
        if secs.is_finite() && secs > 0.0 {
            headers.insert(IDEMPOTENCY_TIMEOUT_HEADER, format!("{}", secs.trunc() as u64));
        }
    }

    headers
}

fn mask_value(name: &str, value: &str) -> String {
    if name.eq_ignore_ascii_case(IDEMPOTENCY_KEY_HEADER) {
        return if value.is_empty() {
            MASK.to_string()
        } else {
            let prefix: String = value.chars().take(6).collect();
            format!("{prefix}{MASK}")
        };
    }
    let lower = name.to_ascii_lowercase();
    if MASKED_NAME_FRAGMENTS.iter().any(|fragment| lower.contains(fragment)) {
        return MASK.to_string();
    }
    value.to_string()
}

/// Redacted copy for logging. The input map is never mutated: secrets become
/// a fixed mask, the idempotency key keeps only its first six characters,
/// everything else passes through unchanged.
pub fn mask_sensitive_headers(headers: &Headers) -> Headers {
    headers.iter().map(|(name, value)| (name, mask_value(name, value))).collect()
}
