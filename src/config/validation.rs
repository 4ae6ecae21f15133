//! Settings validation with detailed error reporting.
//!
//! The [`validate`] function checks [`Settings`] for problems that would
//! otherwise only surface on the first request: an unusable upstream URL,
//! an empty static key, a malformed environment variable name. All
//! problems are collected so the operator sees them in one pass.

use url::Url;

use super::model::{KeySource, Settings};
use crate::error::ValidationError;

/// Validate the upstream base URL. Returns `Ok(())` or a human-readable error.
pub fn validate_upstream_url(url: &str) -> Result<(), String> {
    let parsed = Url::parse(url).map_err(|_| format!("'{url}' is not a valid URL"))?;
    let scheme = parsed.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(format!(
            "unsupported scheme '{scheme}' (expected http or https)"
        ));
    }
    if parsed.query().is_some() {
        return Err("must not contain a query string".into());
    }
    Ok(())
}

/// Validate an environment variable name. Returns `Ok(())` or a human-readable error.
pub fn validate_env_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("variable name cannot be empty".into());
    }
    if name.contains('=') || name.contains('\0') {
        return Err(format!("'{name}' is not a valid environment variable name"));
    }
    Ok(())
}

pub fn validate(settings: &Settings) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(msg) = validate_upstream_url(&settings.upstream_url) {
        errors.push(ValidationError {
            field: "upstream_url".into(),
            message: msg,
            suggestion: Some(format!(
                "e.g. {}",
                super::model::DEFAULT_UPSTREAM_URL
            )),
        });
    }

    if settings.max_body == 0 {
        errors.push(ValidationError {
            field: "max_body".into(),
            message: "must be greater than zero".into(),
            suggestion: None,
        });
    }

    match &settings.key_source {
        KeySource::Static(key) => {
            use secrecy::ExposeSecret;
            if key.expose_secret().trim().is_empty() {
                errors.push(ValidationError {
                    field: "api_key".into(),
                    message: "static API key cannot be empty".into(),
                    suggestion: Some("omit --api-key to read the key from the environment".into()),
                });
            }
        }
        KeySource::Env(name) => {
            if let Err(msg) = validate_env_name(name) {
                errors.push(ValidationError {
                    field: "api_key_env".into(),
                    message: msg,
                    suggestion: None,
                });
            }
        }
        KeySource::File(path) => {
            if path.as_os_str().is_empty() {
                errors.push(ValidationError {
                    field: "api_key_file".into(),
                    message: "path cannot be empty".into(),
                    suggestion: None,
                });
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use secrecy::SecretString;

    use super::*;

    #[test]
    fn default_settings_pass() {
        assert!(validate(&Settings::default()).is_ok());
    }

    #[test]
    fn plain_http_upstream_is_allowed() {
        assert!(validate_upstream_url("http://127.0.0.1:9000/query").is_ok());
    }

    #[test]
    fn non_http_scheme_fails() {
        let err = validate_upstream_url("ftp://example.com/query").unwrap_err();
        assert!(err.contains("unsupported scheme 'ftp'"));
    }

    #[test]
    fn unparseable_url_fails() {
        let err = validate_upstream_url("not a url").unwrap_err();
        assert!(err.contains("not a valid URL"));
    }

    #[test]
    fn query_string_in_base_fails() {
        let err = validate_upstream_url("https://www.alphavantage.co/query?apikey=x").unwrap_err();
        assert!(err.contains("query string"));
    }

    #[test]
    fn env_names_are_checked() {
        assert!(validate_env_name("ALPHA_VANTAGE_API_KEY").is_ok());
        assert!(validate_env_name("").is_err());
        assert!(validate_env_name("A=B").is_err());
    }

    #[test]
    fn empty_static_key_fails() {
        let settings = Settings {
            key_source: KeySource::Static(SecretString::new("  ".into())),
            ..Settings::default()
        };
        let errors = validate(&settings).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "api_key");
    }

    #[test]
    fn empty_key_file_path_fails() {
        let settings = Settings {
            key_source: KeySource::File(PathBuf::new()),
            ..Settings::default()
        };
        let errors = validate(&settings).unwrap_err();
        assert_eq!(errors[0].field, "api_key_file");
    }

    #[test]
    fn all_errors_are_collected() {
        let settings = Settings {
            upstream_url: "gopher://example.com".into(),
            max_body: 0,
            key_source: KeySource::Env(String::new()),
            ..Settings::default()
        };
        let errors = validate(&settings).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["upstream_url", "max_body", "api_key_env"]);
    }
}
