//! tickerproxy is a CORS-enabled relay for Alpha Vantage lookups.
//!
//! Browsers post `{"symbol": "IBM", "endpoint": "overview" | "quote"}`;
//! the relay maps the endpoint to the upstream `OVERVIEW` or
//! `GLOBAL_QUOTE` function, injects the API key, performs one GET, and
//! returns the upstream JSON unchanged. The key never reaches the
//! browser.
//!
//! # Architecture
//!
//! - [`cli`] -- Command-line argument parsing with clap derive macros.
//! - [`cmd`] -- Subcommand dispatch and execution (run, health).
//! - [`config`] -- Startup settings, their validation, and the
//!   [`ApiKeyProvider`](config::ApiKeyProvider) strategy.
//! - [`error`] -- Request-level and process-level error types using `thiserror`.
//! - [`health`] -- `GET /health` endpoint handler returning runtime diagnostics.
//! - [`logging`] -- Structured tracing setup with JSON and pretty-print output.
//! - [`proxy`] -- The relay handler: payload parsing, CORS, and the upstream call.
//! - [`server`] -- Axum server setup, shared application state, HTTPS client, and
//!   graceful shutdown.

// Binary crate — public functions are internal, not consumed by external users.
#![allow(clippy::missing_errors_doc)]

pub mod cli;
pub mod cmd;
pub mod config;
pub mod error;
pub mod health;
pub mod logging;
pub mod proxy;
pub mod server;
