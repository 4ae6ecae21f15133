//! Runtime settings for the relay.
//!
//! Contains [`Settings`] (everything the server needs after argument
//! parsing) and [`KeySource`], which selects the API key provider.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

pub const DEFAULT_UPSTREAM_URL: &str = "https://www.alphavantage.co/query";
pub const DEFAULT_API_KEY_ENV: &str = "ALPHA_VANTAGE_API_KEY";

#[derive(Debug)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub upstream_url: String,
    /// Upstream timeout in milliseconds. Zero disables the timeout.
    pub timeout_ms: u64,
    pub max_body: usize,
    pub key_source: KeySource,
}

impl Settings {
    #[must_use]
    pub const fn upstream_timeout(&self) -> Option<Duration> {
        if self.timeout_ms == 0 {
            None
        } else {
            Some(Duration::from_millis(self.timeout_ms))
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3000,
            upstream_url: DEFAULT_UPSTREAM_URL.into(),
            timeout_ms: 0,
            max_body: 65_536,
            key_source: KeySource::Env(DEFAULT_API_KEY_ENV.into()),
        }
    }
}

/// Where the upstream API key comes from.
#[derive(Debug)]
pub enum KeySource {
    /// Fixed at startup.
    Static(SecretString),
    /// Named environment variable, read on every request.
    Env(String),
    /// File contents, read on every request.
    File(PathBuf),
}

impl KeySource {
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Static(_) => "static",
            Self::Env(_) => "env",
            Self::File(_) => "file",
        }
    }
}
