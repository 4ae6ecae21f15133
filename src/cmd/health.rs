//! `tickerproxy health` — check the health of a running instance.
//!
//! Sends a `GET /health` request to the specified URL and displays
//! the response as formatted text or raw JSON.

use std::time::Duration;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::StatusCode;

use crate::cli::HealthArgs;
use crate::error::TickerProxyError;
use crate::health::HealthResponse;
use crate::server;

const HEALTH_TIMEOUT: Duration = Duration::from_secs(10);

pub async fn execute(args: HealthArgs) -> Result<(), TickerProxyError> {
    let url = format!("{}/health", args.url.trim_end_matches('/'));
    let (status, body) = fetch(&url).await?;

    if !status.is_success() {
        return Err(TickerProxyError::HealthCheckFailed(status));
    }

    if args.json {
        println!("{}", String::from_utf8_lossy(&body));
        return Ok(());
    }

    match serde_json::from_slice::<HealthResponse>(&body) {
        Ok(health) => {
            let uptime = format_uptime(health.uptime_seconds);
            println!("\u{2713} tickerproxy is healthy ({})", args.url);
            println!("  version:        {}", health.version);
            println!("  uptime:         {uptime}");
            println!("  upstream:       {}", health.upstream.url);
            println!("  key source:     {}", health.upstream.key_source);
            println!(
                "  requests:       {} relayed, {} rejected, {} failed",
                health.stats.requests_relayed,
                health.stats.requests_rejected,
                health.stats.requests_failed
            );
        }
        Err(e) => {
            eprintln!("Failed to parse health response: {e}");
            println!("{}", String::from_utf8_lossy(&body));
        }
    }

    Ok(())
}

/// GET `url` over the same HTTPS-capable client the relay uses.
async fn fetch(url: &str) -> Result<(StatusCode, Bytes), TickerProxyError> {
    let uri: hyper::Uri =
        url.parse()
            .map_err(|e: hyper::http::uri::InvalidUri| TickerProxyError::UriParse {
                source: Box::new(e),
            })?;

    let req = hyper::Request::builder()
        .uri(uri)
        .body(Full::new(Bytes::new()))
        .map_err(|e| TickerProxyError::HttpRequest {
            source: Box::new(e),
        })?;

    let client = server::build_http_client();
    let response = tokio::time::timeout(HEALTH_TIMEOUT, client.request(req))
        .await
        .map_err(|_| TickerProxyError::HttpRequest {
            source: format!("health check timed out after {}s", HEALTH_TIMEOUT.as_secs()).into(),
        })?
        .map_err(|e| TickerProxyError::HttpRequest {
            source: Box::new(e),
        })?;

    let status = response.status();
    let body = response
        .into_body()
        .collect()
        .await
        .map_err(|e| TickerProxyError::HttpRequest {
            source: Box::new(e),
        })?
        .to_bytes();

    Ok((status, body))
}

fn format_uptime(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{hours}h {minutes}m {secs}s")
    } else if minutes > 0 {
        format!("{minutes}m {secs}s")
    } else {
        format!("{secs}s")
    }
}
