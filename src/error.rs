//! Error types for tickerproxy.
//!
//! [`RelayError`] covers everything that can go wrong while serving a
//! single relay request and owns the HTTP status policy. [`TickerProxyError`]
//! is the process-level error returned by subcommands. [`ValidationError`]
//! describes one invalid startup setting.

use http::StatusCode;

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "  {}: {}", self.field, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " ({suggestion})")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

fn format_errors(errors: &[ValidationError]) -> String {
    use std::fmt::Write;
    let mut buf = String::new();
    for (i, e) in errors.iter().enumerate() {
        if i > 0 {
            buf.push('\n');
        }
        // write! to String is infallible (only fails on OOM which is unrecoverable)
        let _ = write!(buf, "{e}");
    }
    buf
}

/// Failure while relaying one request. The `Display` text is what the
/// caller sees in the `error` field of the JSON body.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RelayError {
    #[error("{0}")]
    MalformedBody(#[source] serde_json::Error),

    #[error("Symbol is required")]
    MissingSymbol,

    #[error("Invalid endpoint. Use \"overview\" or \"quote\"")]
    InvalidEndpoint,

    #[error("Missing API Key")]
    MissingApiKey,

    #[error("Upstream request failed: {source}")]
    UpstreamRequest {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Upstream body read failed: {source}")]
    UpstreamBody {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Upstream returned invalid JSON: {0}")]
    UpstreamDecode(#[source] serde_json::Error),

    #[error("Upstream request timed out")]
    UpstreamTimeout,
}

impl RelayError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::MalformedBody(_) | Self::MissingSymbol | Self::InvalidEndpoint => {
                StatusCode::BAD_REQUEST
            }
            Self::MissingApiKey => StatusCode::INTERNAL_SERVER_ERROR,
            Self::UpstreamRequest { .. } | Self::UpstreamBody { .. } | Self::UpstreamDecode(_) => {
                StatusCode::BAD_GATEWAY
            }
            Self::UpstreamTimeout => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    /// Whether the caller could fix this by changing the request.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.status().is_client_error()
    }
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum TickerProxyError {
    #[error("Invalid settings:\n{}", format_errors(.errors))]
    InvalidSettings { errors: Vec<ValidationError> },

    #[error("Invalid address: {0}")]
    AddressParse(#[from] std::net::AddrParseError),

    #[error("Invalid URI: {source}")]
    UriParse {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("HTTP request failed: {source}")]
    HttpRequest {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("Health check failed with status {0}")]
    HealthCheckFailed(StatusCode),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_caused_errors_are_bad_request() {
        let malformed = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(
            RelayError::MalformedBody(malformed).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(RelayError::MissingSymbol.status(), StatusCode::BAD_REQUEST);
        assert_eq!(RelayError::InvalidEndpoint.status(), StatusCode::BAD_REQUEST);
        assert!(RelayError::InvalidEndpoint.is_client_error());
    }

    #[test]
    fn missing_key_is_server_error() {
        assert_eq!(
            RelayError::MissingApiKey.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert!(!RelayError::MissingApiKey.is_client_error());
    }

    #[test]
    fn upstream_failures_map_to_gateway_statuses() {
        let err = RelayError::UpstreamRequest {
            source: "connection refused".into(),
        };
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            RelayError::UpstreamTimeout.status(),
            StatusCode::GATEWAY_TIMEOUT
        );
    }

    #[test]
    fn messages_match_wire_contract() {
        assert_eq!(RelayError::MissingSymbol.to_string(), "Symbol is required");
        assert_eq!(
            RelayError::InvalidEndpoint.to_string(),
            r#"Invalid endpoint. Use "overview" or "quote""#
        );
        assert_eq!(RelayError::MissingApiKey.to_string(), "Missing API Key");
    }

    #[test]
    fn settings_errors_are_listed_one_per_line() {
        let err = TickerProxyError::InvalidSettings {
            errors: vec![
                ValidationError {
                    field: "upstream_url".into(),
                    message: "bad scheme".into(),
                    suggestion: Some("use https".into()),
                },
                ValidationError {
                    field: "max_body".into(),
                    message: "must be greater than zero".into(),
                    suggestion: None,
                },
            ],
        };
        let text = err.to_string();
        assert!(text.contains("  upstream_url: bad scheme (use https)\n"));
        assert!(text.ends_with("  max_body: must be greater than zero"));
    }
}
