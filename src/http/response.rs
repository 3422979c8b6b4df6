//! HTTP response building module
//!
//! Builders for the status codes the front door and the static origin emit.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{
    ACCEPT_RANGES, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_MAX_AGE, ALLOW, CACHE_CONTROL, CONTENT_LENGTH,
    CONTENT_TYPE, ETAG, LOCATION,
};
use hyper::{Response, StatusCode};

use super::cache::CachePolicy;

const ALLOWED_METHODS: &str = "GET, HEAD, OPTIONS";

/// Build 304 Not Modified response
pub fn build_304_response(etag: &str, policy: CachePolicy) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::NOT_MODIFIED)
        .header(ETAG, etag)
        .header(CACHE_CONTROL, policy.to_header_value())
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| fallback("304", &e, Bytes::new()))
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<Full<Bytes>> {
    build_plain_response(StatusCode::NOT_FOUND, "404 Not Found")
}

/// Build 500 Internal Server Error response
pub fn build_500_response() -> Response<Full<Bytes>> {
    build_plain_response(StatusCode::INTERNAL_SERVER_ERROR, "500 Internal Server Error")
}

/// Build 413 Payload Too Large response
pub fn build_413_response() -> Response<Full<Bytes>> {
    build_plain_response(StatusCode::PAYLOAD_TOO_LARGE, "413 Payload Too Large")
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> Response<Full<Bytes>> {
    let mut resp = build_plain_response(StatusCode::METHOD_NOT_ALLOWED, "405 Method Not Allowed");
    resp.headers_mut()
        .insert(ALLOW, hyper::header::HeaderValue::from_static(ALLOWED_METHODS));
    resp
}

/// Build OPTIONS response (preflight request)
pub fn build_options_response(enable_cors: bool) -> Response<Full<Bytes>> {
    let mut builder = Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header(ALLOW, ALLOWED_METHODS);

    if enable_cors {
        builder = builder
            .header(ACCESS_CONTROL_ALLOW_ORIGIN, "*")
            .header(ACCESS_CONTROL_ALLOW_METHODS, ALLOWED_METHODS)
            .header(ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type")
            .header(ACCESS_CONTROL_MAX_AGE, "86400");
    }

    builder
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| fallback("OPTIONS", &e, Bytes::new()))
}

/// Build redirect response with an explicit status (301, 302, 307, 308)
pub fn build_redirect_response_with_code(
    target: &str,
    status: StatusCode,
) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header(LOCATION, target)
        .header(CONTENT_TYPE, "text/plain")
        .body(Full::new(Bytes::from("Redirecting...")))
        .unwrap_or_else(|e| fallback(status.as_str(), &e, Bytes::from("Redirecting...")))
}

/// Build health probe response
pub fn build_health_response(status: &str) -> Response<Full<Bytes>> {
    let body = serde_json::json!({ "status": status }).to_string();
    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, "application/json")
        .header(CACHE_CONTROL, CachePolicy::NoStore.to_header_value())
        .body(Full::new(Bytes::from(body)))
        .unwrap_or_else(|e| fallback("health", &e, Bytes::new()))
}

/// Build 200 response for file content with validators and cache policy
pub fn build_cached_response(
    data: Bytes,
    content_type: &str,
    etag: &str,
    policy: CachePolicy,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content_length = data.len();
    let body = if is_head { Bytes::new() } else { data };

    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, content_type)
        .header(CONTENT_LENGTH, content_length)
        .header(ACCEPT_RANGES, "none")
        .header(ETAG, etag)
        .header(CACHE_CONTROL, policy.to_header_value())
        .body(Full::new(body))
        .unwrap_or_else(|e| fallback("200", &e, Bytes::new()))
}

fn build_plain_response(status: StatusCode, text: &'static str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "text/plain")
        .body(Full::new(Bytes::from_static(text.as_bytes())))
        .unwrap_or_else(|e| fallback(status.as_str(), &e, Bytes::from_static(text.as_bytes())))
}

/// Log response build error and fall back to a bare response
fn fallback(status: &str, error: &hyper::http::Error, body: Bytes) -> Response<Full<Bytes>> {
    tracing::error!("Failed to build {status} response: {error}");
    Response::new(Full::new(body))
}
