//! API key providers.
//!
//! The relay handler never knows where the key comes from; it holds an
//! `Arc<dyn ApiKeyProvider>` built once by [`provider_for`] and asks it for
//! the key on every request. Providers that read external state (the
//! environment, a secret file) do so on each call, so rotating the key
//! does not require a restart.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use super::model::KeySource;
use crate::error::RelayError;

// async_trait is required here because ApiKeyProvider is used as Arc<dyn ApiKeyProvider>
// and native async fn in traits does not support dyn dispatch.
#[async_trait]
pub trait ApiKeyProvider: Send + Sync {
    fn name(&self) -> &'static str;
    async fn resolve(&self) -> Result<SecretString, RelayError>;
}

pub struct StaticKey {
    key: SecretString,
}

impl StaticKey {
    #[must_use]
    pub fn new(key: SecretString) -> Self {
        Self { key }
    }
}

#[async_trait]
impl ApiKeyProvider for StaticKey {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn resolve(&self) -> Result<SecretString, RelayError> {
        Ok(SecretString::new(self.key.expose_secret().clone()))
    }
}

pub struct EnvKey {
    var: String,
}

impl EnvKey {
    #[must_use]
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

#[async_trait]
impl ApiKeyProvider for EnvKey {
    fn name(&self) -> &'static str {
        "env"
    }

    async fn resolve(&self) -> Result<SecretString, RelayError> {
        match std::env::var(&self.var) {
            Ok(value) if !value.is_empty() => Ok(SecretString::new(value)),
            Ok(_) | Err(_) => {
                tracing::warn!(var = %self.var, "API key environment variable is not set");
                Err(RelayError::MissingApiKey)
            }
        }
    }
}

pub struct FileKey {
    path: PathBuf,
}

impl FileKey {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl ApiKeyProvider for FileKey {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn resolve(&self) -> Result<SecretString, RelayError> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to read API key file");
            RelayError::MissingApiKey
        })?;

        let key = content.trim_end();
        if key.is_empty() {
            tracing::warn!(path = %self.path.display(), "API key file is empty");
            return Err(RelayError::MissingApiKey);
        }
        Ok(SecretString::new(key.to_string()))
    }
}

/// Build the provider selected by `source`.
#[must_use]
pub fn provider_for(source: KeySource) -> Arc<dyn ApiKeyProvider> {
    match source {
        KeySource::Static(key) => Arc::new(StaticKey::new(key)),
        KeySource::Env(var) => Arc::new(EnvKey::new(var)),
        KeySource::File(path) => Arc::new(FileKey::new(path)),
    }
}
