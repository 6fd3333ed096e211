//! Error taxonomy for resource calls.
//!
//! A closed set of kinds instead of duck-typed error bags:
//! - [`ApiError::Transport`] — the injected transport failed (after the retry
//!   budget for writes); carries whatever legacy code fields were present.
//! - [`ApiError::BusinessRejection`] — the call succeeded structurally but the
//!   payload encodes a non-zero error code. Never retried.
//! - [`ApiError::Verification`] — the write was accepted but its effect could
//!   not be confirmed (or, for delete, was still visible).
//! - [`ApiError::Configuration`] — missing endpoint, identifier, or host.
//!   Always immediate, never retried.

use std::fmt;
use thiserror::Error;

/// Failure reported by the injected transport.
///
/// Upstream HTTP stacks disagree about where they put status codes, so every
/// legacy location is modeled as an optional field; [`collect_codes`] gathers
/// whichever are present. `Display` is the bare message so that a propagated
/// error reads exactly like the transport produced it.
///
/// [`collect_codes`]: TransportError::collect_codes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportError {
    pub message: String,
    /// Error class name, e.g. `TimeoutError`.
    pub name: Option<String>,
    /// Numeric string or transport-level code such as `ETIMEDOUT`.
    pub code: Option<String>,
    pub status: Option<u16>,
    pub status_code: Option<u16>,
    pub error_code: Option<i64>,
    pub errcode: Option<i64>,
    pub response_status: Option<u16>,
    pub response_errcode: Option<i64>,
    pub data_errcode: Option<i64>,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), ..Self::default() }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_status_code(mut self, status_code: u16) -> Self {
        self.status_code = Some(status_code);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_errcode(mut self, errcode: i64) -> Self {
        self.errcode = Some(errcode);
        self
    }

    /// All numeric codes present, in legacy field order: status, statusCode,
    /// code, errorCode, errcode, response.status, response.data.errcode,
    /// data.errcode.
    pub fn collect_codes(&self) -> Vec<i64> {
        let mut codes = Vec::new();
        if let Some(v) = self.status {
            codes.push(i64::from(v));
        }
        if let Some(v) = self.status_code {
            codes.push(i64::from(v));
        }
        if let Some(text) = &self.code {
            if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) {
                if let Ok(v) = text.parse::<i64>() {
                    codes.push(v);
                }
            }
        }
        if let Some(v) = self.error_code {
            codes.push(v);
        }
        if let Some(v) = self.errcode {
            codes.push(v);
        }
        if let Some(v) = self.response_status {
            codes.push(i64::from(v));
        }
        if let Some(v) = self.response_errcode {
            codes.push(v);
        }
        if let Some(v) = self.data_errcode {
            codes.push(v);
        }
        codes
    }

    pub fn has_code(&self, code: i64) -> bool {
        self.collect_codes().contains(&code)
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for TransportError {}

/// Unified error type for resource operations.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Transport-level failure, surfaced verbatim once retry is denied or
    /// exhausted.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The server accepted the request but reported a business error code.
    #[error("[{action}] failed: errcode={code}{}", fmt_description(.description))]
    BusinessRejection { action: String, code: i64, description: String },

    /// The write nominally succeeded but its effect could not be confirmed.
    #[error("[{action}] {reason}")]
    Verification { action: String, reason: String },

    /// Missing endpoint, identifier, transport, or host.
    #[error("configuration error: {0}")]
    Configuration(String),
}

fn fmt_description(description: &str) -> String {
    if description.is_empty() {
        String::new()
    } else {
        format!(" {description}")
    }
}

impl ApiError {
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    pub fn is_business_rejection(&self) -> bool {
        matches!(self, Self::BusinessRejection { .. })
    }

    pub fn is_verification(&self) -> bool {
        matches!(self, Self::Verification { .. })
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Borrow the transport error if present.
    pub fn as_transport(&self) -> Option<&TransportError> {
        match self {
            Self::Transport(e) => Some(e),
            _ => None,
        }
    }

    /// Business error code if this is a rejection.
    pub fn business_code(&self) -> Option<i64> {
        match self {
            Self::BusinessRejection { code, .. } => Some(*code),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collect_codes_gathers_every_legacy_field() {
        let err = TransportError {
            message: "boom".into(),
            name: None,
            code: Some("429".into()),
            status: Some(500),
            status_code: Some(502),
            error_code: Some(601),
            errcode: Some(603),
            response_status: Some(503),
            response_errcode: Some(604),
            data_errcode: Some(400),
        };
        assert_eq!(err.collect_codes(), vec![500, 502, 429, 601, 603, 503, 604, 400]);
    }

    #[test]
    fn non_numeric_code_string_is_ignored() {
        let err = TransportError::new("reset").with_code("ECONNRESET");
        assert!(err.collect_codes().is_empty());
        assert!(!err.has_code(0));
    }

    #[test]
    fn display_is_the_bare_message() {
        let err = TransportError::new("429 Too Many Requests").with_status(429);
        assert_eq!(err.to_string(), "429 Too Many Requests");
    }

    #[test]
    fn transport_variant_is_transparent() {
        let api: ApiError = TransportError::new("conn reset").into();
        assert!(api.is_transport());
        assert_eq!(api.to_string(), "conn reset");
        assert_eq!(api.as_transport().unwrap().message, "conn reset");
    }

    #[test]
    fn business_rejection_display_names_action_and_code() {
        let err = ApiError::BusinessRejection {
            action: "save".into(),
            code: 601,
            description: "duplicate number".into(),
        };
        assert_eq!(err.to_string(), "[save] failed: errcode=601 duplicate number");
        assert_eq!(err.business_code(), Some(601));
    }

    #[test]
    fn business_rejection_display_trims_empty_description() {
        let err = ApiError::BusinessRejection {
            action: "save".into(),
            code: 601,
            description: String::new(),
        };
        assert_eq!(err.to_string(), "[save] failed: errcode=601");
    }

    #[test]
    fn verification_display_names_action() {
        let err = ApiError::Verification {
            action: "delete".into(),
            reason: "resource still visible in detail".into(),
        };
        assert_eq!(err.to_string(), "[delete] resource still visible in detail");
        assert!(err.is_verification());
    }

    #[test]
    fn kind_predicates_are_exclusive() {
        let config = ApiError::Configuration("no endpoint".into());
        assert!(config.is_configuration());
        assert!(!config.is_transport());
        assert!(!config.is_business_rejection());
        assert!(!config.is_verification());
        assert!(config.business_code().is_none());
    }
}
