//! The single outbound call to the market-data API.
//!
//! [`upstream_url`] builds `<base>?function=..&symbol=..&apikey=..` and
//! [`UpstreamClient::fetch`] performs one GET against it. There is no
//! retry. The response body must parse as JSON but is otherwise opaque:
//! it is returned byte-for-byte so the caller sees exactly what the
//! upstream sent. Upstream non-2xx statuses are not errors here.

use std::time::{Duration, Instant};

use axum::http::{header, Method};
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use super::request::QuoteQuery;
use crate::error::RelayError;
use crate::server::HttpClient;

/// Characters of the upstream body written to the log.
pub const PREVIEW_CHARS: usize = 200;

#[derive(Debug)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

#[derive(Clone)]
pub struct UpstreamClient {
    http: HttpClient,
    base_url: Url,
    timeout: Option<Duration>,
}

/// Build the upstream URL for `query`. Query values are percent-encoded.
#[must_use]
pub fn upstream_url(base: &Url, query: &QuoteQuery, api_key: &SecretString) -> Url {
    let mut url = base.clone();
    url.query_pairs_mut()
        .clear()
        .append_pair("function", query.endpoint.function())
        .append_pair("symbol", &query.symbol)
        .append_pair("apikey", api_key.expose_secret());
    url
}

/// First [`PREVIEW_CHARS`] characters of `body`, lossily decoded.
#[must_use]
pub fn preview(body: &[u8]) -> String {
    String::from_utf8_lossy(body)
        .chars()
        .take(PREVIEW_CHARS)
        .collect()
}

impl UpstreamClient {
    #[must_use]
    pub fn new(http: HttpClient, base_url: Url, timeout: Option<Duration>) -> Self {
        Self {
            http,
            base_url,
            timeout,
        }
    }

    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[allow(clippy::cast_possible_truncation)]
    pub async fn fetch(
        &self,
        query: &QuoteQuery,
        api_key: &SecretString,
        correlation_id: &str,
    ) -> Result<UpstreamResponse, RelayError> {
        let url = upstream_url(&self.base_url, query, api_key);
        let uri: hyper::Uri = url
            .as_str()
            .parse()
            .map_err(|e: hyper::http::uri::InvalidUri| RelayError::UpstreamRequest {
                source: Box::new(e),
            })?;

        let req = hyper::Request::builder()
            .method(Method::GET)
            .uri(uri)
            .header(header::ACCEPT, "application/json")
            .body(Full::new(Bytes::new()))
            .map_err(|e| RelayError::UpstreamRequest {
                source: Box::new(e),
            })?;

        tracing::info!(
            correlation_id = %correlation_id,
            function = query.endpoint.function(),
            symbol = %query.symbol,
            "fetching from upstream"
        );

        let start = Instant::now();
        let exchange = async {
            let response =
                self.http
                    .request(req)
                    .await
                    .map_err(|e| RelayError::UpstreamRequest {
                        source: Box::new(e),
                    })?;
            let status = response.status();
            let body = response
                .into_body()
                .collect()
                .await
                .map_err(|e| RelayError::UpstreamBody {
                    source: Box::new(e),
                })?
                .to_bytes();
            Ok::<_, RelayError>(UpstreamResponse { status, body })
        };

        let result = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, exchange)
                .await
                .unwrap_or(Err(RelayError::UpstreamTimeout)),
            None => exchange.await,
        };
        let latency_ms = start.elapsed().as_millis() as u64;

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(
                    correlation_id = %correlation_id,
                    error = %e,
                    latency_ms,
                    "upstream request failed"
                );
                return Err(e);
            }
        };

        tracing::info!(
            correlation_id = %correlation_id,
            status = response.status.as_u16(),
            latency_ms,
            preview = %preview(&response.body),
            "upstream responded"
        );

        serde_json::from_slice::<serde::de::IgnoredAny>(&response.body)
            .map_err(RelayError::UpstreamDecode)?;

        if !response.status.is_success() {
            tracing::warn!(
                correlation_id = %correlation_id,
                status = response.status.as_u16(),
                "upstream returned non-success status, relaying body"
            );
        }

        Ok(response)
    }
}
