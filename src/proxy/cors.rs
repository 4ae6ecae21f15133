//! CORS headers and JSON response construction.
//!
//! Every response leaving the relay, including preflights and errors,
//! goes through this module so the cross-origin headers can never be
//! forgotten on one path.

use axum::body::Body;
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_HEADERS: &str = "authorization, x-client-info, apikey, content-type";

const CORRELATION_ID: HeaderName = HeaderName::from_static("x-correlation-id");

/// The fixed cross-origin header set.
#[must_use]
pub fn cors_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static(ALLOW_ORIGIN),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );
    headers
}

/// Response to a CORS preflight: `200 ok` with the CORS headers only.
#[must_use]
pub fn preflight() -> Response {
    (StatusCode::OK, cors_headers(), "ok").into_response()
}

/// JSON response with CORS headers and the request's correlation ID.
#[must_use]
pub fn json_response(status: StatusCode, body: Bytes, correlation_id: &str) -> Response {
    let mut headers = cors_headers();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    if let Ok(val) = HeaderValue::from_str(correlation_id) {
        headers.insert(CORRELATION_ID, val);
    }
    (status, headers, Body::from(body)).into_response()
}

/// `{"error": message}` with the given status.
#[must_use]
pub fn error_response(status: StatusCode, message: &str, correlation_id: &str) -> Response {
    let body = serde_json::json!({ "error": message }).to_string();
    json_response(status, Bytes::from(body), correlation_id)
}

#[cfg(test)]
mod tests {
    use http_body_util::BodyExt;

    use super::*;

    async fn body_string(resp: Response) -> String {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn cors_headers_are_permissive() {
        let headers = cors_headers();
        assert_eq!(headers.get("access-control-allow-origin").unwrap(), "*");
        assert_eq!(
            headers.get("access-control-allow-headers").unwrap(),
            "authorization, x-client-info, apikey, content-type"
        );
    }

    #[tokio::test]
    async fn preflight_is_ok_with_cors() {
        let resp = preflight();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get("access-control-allow-origin").unwrap(),
            "*"
        );
        assert_eq!(body_string(resp).await, "ok");
    }

    #[tokio::test]
    async fn error_response_wraps_message() {
        let resp = error_response(StatusCode::BAD_REQUEST, "Symbol is required", "cid-1");
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            resp.headers().get("content-type").unwrap(),
            "application/json"
        );
        assert_eq!(resp.headers().get("x-correlation-id").unwrap(), "cid-1");
        assert_eq!(
            resp.headers().get("access-control-allow-origin").unwrap(),
            "*"
        );

        let body: serde_json::Value = serde_json::from_str(&body_string(resp).await).unwrap();
        assert_eq!(body, serde_json::json!({ "error": "Symbol is required" }));
    }

    #[test]
    fn invalid_correlation_id_is_dropped() {
        let resp = json_response(StatusCode::OK, Bytes::from_static(b"{}"), "bad\nid");
        assert!(resp.headers().get("x-correlation-id").is_none());
        assert!(resp.headers().get("access-control-allow-origin").is_some());
    }
}
