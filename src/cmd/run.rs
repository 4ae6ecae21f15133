//! `tickerproxy run` — start the relay server.
//!
//! Turns the command line into [`Settings`], validates them, builds the
//! shared state, and serves until Ctrl+C / SIGTERM.

use std::net::SocketAddr;
use std::sync::Arc;

use secrecy::SecretString;
use url::Url;

use crate::cli::RunArgs;
use crate::config::validation::validate;
use crate::config::{provider_for, KeySource, Settings};
use crate::error::{TickerProxyError, ValidationError};
use crate::logging;
use crate::proxy::upstream::UpstreamClient;
use crate::server::{self, AppState};

pub async fn execute(args: RunArgs) -> Result<(), TickerProxyError> {
    let log_format = logging::resolve_format(args.pretty, args.json);
    logging::init(&args.log_level, log_format);

    let settings = settings_from_args(args);
    let addr: SocketAddr = format!("{}:{}", settings.host, settings.port).parse()?;
    let max_body = settings.max_body;
    let key_source = settings.key_source.kind();
    let upstream_url = settings.upstream_url.clone();

    let state = build_state(settings)?;
    let router = server::build_router(state, max_body);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(
        addr = %addr,
        upstream = %upstream_url,
        key_source,
        "tickerproxy started"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(server::shutdown_signal())
        .await?;

    tracing::info!("tickerproxy stopped");
    Ok(())
}

/// Resolve the key source: a fixed key wins, then a key file, then the
/// environment variable.
#[must_use]
pub fn settings_from_args(args: RunArgs) -> Settings {
    let key_source = match (args.api_key, args.api_key_file) {
        (Some(key), _) => KeySource::Static(SecretString::new(key)),
        (None, Some(path)) => KeySource::File(path),
        (None, None) => KeySource::Env(args.api_key_env),
    };

    Settings {
        host: args.host,
        port: args.port,
        upstream_url: args.upstream_url,
        timeout_ms: args.timeout,
        max_body: args.max_body,
        key_source,
    }
}

/// Validate `settings` and build the shared application state.
pub fn build_state(settings: Settings) -> Result<Arc<AppState>, TickerProxyError> {
    validate(&settings).map_err(|errors| TickerProxyError::InvalidSettings { errors })?;

    let base_url =
        Url::parse(&settings.upstream_url).map_err(|e| TickerProxyError::InvalidSettings {
            errors: vec![ValidationError {
                field: "upstream_url".into(),
                message: e.to_string(),
                suggestion: None,
            }],
        })?;

    let upstream = UpstreamClient::new(
        server::build_http_client(),
        base_url,
        settings.upstream_timeout(),
    );
    let api_key = provider_for(settings.key_source);

    Ok(Arc::new(AppState::new(upstream, api_key)))
}
