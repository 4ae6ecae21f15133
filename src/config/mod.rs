//! Startup settings and API key resolution.
//!
//! [`model`] holds the [`Settings`](model::Settings) assembled from the
//! command line, [`validation`] checks them before the server binds, and
//! [`keys`] provides the [`ApiKeyProvider`](keys::ApiKeyProvider) strategy
//! injected into the relay handler.

pub mod keys;
pub mod model;
pub mod validation;

pub use keys::{provider_for, ApiKeyProvider};
pub use model::{KeySource, Settings};
