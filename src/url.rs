//! Host and endpoint URL resolution.

use crate::error::ApiError;
use url::Url;

/// Trim and strip trailing slashes from a configured host.
pub fn normalize_host(host: &str) -> String {
    host.trim().trim_end_matches('/').to_string()
}

pub fn is_absolute_url(value: &str) -> bool {
    let lower = value.trim().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Resolve the final request URL.
///
/// Absolute endpoint URLs pass through untouched unless `override_host` is
/// set, in which case scheme, host, and port are replaced by the configured
/// host while path and query survive. Relative endpoints are joined onto the
/// normalized host with a leading slash enforced.
pub fn build_url(host: &str, endpoint_url: &str, override_host: bool) -> Result<String, ApiError> {
    let raw = endpoint_url.trim();
    if raw.is_empty() {
        return Err(ApiError::Configuration("endpoint URL is required".into()));
    }
    let base = normalize_host(host);

    if is_absolute_url(raw) {
        if !override_host {
            return Ok(raw.to_string());
        }
        let mut from = Url::parse(raw)
            .map_err(|e| ApiError::Configuration(format!("invalid endpoint URL {raw}: {e}")))?;
        let to = Url::parse(&base)
            .map_err(|e| ApiError::Configuration(format!("invalid host {base}: {e}")))?;
        from.set_scheme(to.scheme()).map_err(|_| {
            ApiError::Configuration(format!("cannot apply scheme {} to {raw}", to.scheme()))
        })?;
        from.set_host(to.host_str())
            .map_err(|e| ApiError::Configuration(format!("cannot apply host {base}: {e}")))?;
        from.set_port(to.port())
            .map_err(|_| ApiError::Configuration(format!("cannot apply port of {base}")))?;
        return Ok(from.to_string());
    }

    if base.is_empty() {
        return Err(ApiError::Configuration("host is required for relative endpoint URLs".into()));
    }
    let path = if raw.starts_with('/') { raw.to_string() } else { format!("/{raw}") };
    Ok(format!("{base}{path}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_whitespace_and_trailing_slashes() {
        assert_eq!(normalize_host("  https://api.example.com//  "), "https://api.example.com");
        assert_eq!(normalize_host("https://api.example.com"), "https://api.example.com");
    }

    #[test]
    fn detects_absolute_urls_case_insensitively() {
        assert!(is_absolute_url("https://api.example.com/x"));
        assert!(is_absolute_url("HTTP://api.example.com/x"));
        assert!(!is_absolute_url("/v2/bd/customer"));
        assert!(!is_absolute_url("ftp://api.example.com/x"));
    }

    #[test]
    fn relative_endpoint_joins_normalized_host() {
        let url = build_url("https://api.example.com/", "/v2/bd/customer", false).unwrap();
        assert_eq!(url, "https://api.example.com/v2/bd/customer");
    }

    #[test]
    fn relative_endpoint_gains_leading_slash() {
        let url = build_url("https://api.example.com", "v2/bd/customer", false).unwrap();
        assert_eq!(url, "https://api.example.com/v2/bd/customer");
    }

    #[test]
    fn absolute_endpoint_passes_through() {
        let url =
            build_url("https://api.example.com", "https://other.example.com/v1/x?y=1", false)
                .unwrap();
        assert_eq!(url, "https://other.example.com/v1/x?y=1");
    }

    #[test]
    fn override_host_replaces_scheme_host_and_port() {
        let url = build_url(
            "https://gateway.example.com:8443",
            "http://other.example.com/v1/x?y=1",
            true,
        )
        .unwrap();
        assert_eq!(url, "https://gateway.example.com:8443/v1/x?y=1");
    }

    #[test]
    fn empty_endpoint_is_a_configuration_error() {
        let err = build_url("https://api.example.com", "  ", false).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn relative_endpoint_without_host_is_a_configuration_error() {
        let err = build_url("  ", "/v2/bd/customer", false).unwrap_err();
        assert!(err.is_configuration());
    }
}
