//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method validation, the legacy
//! host redirect, health probes, then the front door over the static origin.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderValue, CONTENT_LENGTH, IF_NONE_MATCH, REFERER, SERVER, USER_AGENT};
use hyper::{HeaderMap, Method, Request, Response};

use crate::config::{AppState, Config};
use crate::http;
use crate::logger::{self, AccessLogEntry};
use crate::routing::{request_host, RouteOutcome};

/// Request context encapsulating information needed for request processing
#[derive(Debug)]
pub struct RequestContext<'a> {
    /// Hostname with optional port, as addressed by the client
    pub host: Option<&'a str>,
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub is_head: bool,
    pub if_none_match: Option<String>,
}

/// Main entry point for HTTP request handling
///
/// The request body is never read.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let (mut response, route) = dispatch(&req, &state).await;

    if let Ok(server) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert(SERVER, server);
    }

    if state.config.logging.access_log {
        let entry = access_log_entry(&req, &response, route, peer_addr, started);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

async fn dispatch<B>(
    req: &Request<B>,
    state: &AppState,
) -> (Response<Full<Bytes>>, Option<RouteOutcome>) {
    let config = &state.config;

    // 1. Check HTTP method
    if let Some(resp) = check_http_method(req.method(), config.http.enable_cors) {
        return (resp, None);
    }

    // 2. Check body size
    if let Some(resp) = check_body_size(req.headers(), config.http.max_body_size) {
        return (resp, None);
    }

    let ctx = RequestContext {
        host: request_host(req.uri(), req.headers()),
        path: req.uri().path(),
        query: req.uri().query(),
        is_head: req.method() == Method::HEAD,
        if_none_match: header_string(req.headers(), IF_NONE_MATCH),
    };

    // 3. Legacy host redirect, health endpoints included
    if let Some(routed) = state.front_door.redirect(&ctx) {
        return (routed.response, Some(routed.outcome));
    }

    // 4. Health check endpoints
    if let Some(resp) = check_health(ctx.path, config) {
        return (resp, None);
    }

    // 5. Front door
    let routed = state.front_door.serve(&ctx, &state.site).await;
    (routed.response, Some(routed.outcome))
}

/// Check HTTP method and return appropriate response for non-GET/HEAD methods
fn check_http_method(method: &Method, enable_cors: bool) -> Option<Response<Full<Bytes>>> {
    match *method {
        Method::GET | Method::HEAD => None,
        Method::OPTIONS => Some(http::build_options_response(enable_cors)),
        _ => {
            tracing::warn!("Method not allowed: {method}");
            Some(http::build_405_response())
        }
    }
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size(headers: &HeaderMap, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let size_str = headers.get(CONTENT_LENGTH)?.to_str().ok()?;
    match size_str.parse::<u64>() {
        Ok(size) if size > max_body_size => {
            tracing::warn!("Request body too large: {size} bytes (max: {max_body_size})");
            Some(http::build_413_response())
        }
        Ok(_) => None,
        Err(_) => {
            tracing::warn!("Invalid Content-Length value: '{size_str}', skipping size check");
            None
        }
    }
}

fn check_health(path: &str, config: &Config) -> Option<Response<Full<Bytes>>> {
    let health = &config.health;
    if health.enabled && (path == health.liveness_path || path == health.readiness_path) {
        return Some(http::build_health_response("ok"));
    }
    None
}

fn header_string(headers: &HeaderMap, name: hyper::header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

fn access_log_entry<B>(
    req: &Request<B>,
    response: &Response<Full<Bytes>>,
    route: Option<RouteOutcome>,
    peer_addr: SocketAddr,
    started: Instant,
) -> AccessLogEntry {
    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.host = request_host(req.uri(), req.headers()).map(ToString::to_string);
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = format!("{:?}", req.version())
        .trim_start_matches("HTTP/")
        .to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = response.body().size_hint().exact().unwrap_or(0);
    entry.referer = header_string(req.headers(), REFERER);
    entry.user_agent = header_string(req.headers(), USER_AGENT);
    entry.route = route.map(RouteOutcome::as_str);
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    entry
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use hyper::header::{HOST, LOCATION};
    use hyper::StatusCode;

    fn state(root: &std::path::Path) -> Arc<AppState> {
        let mut config = Config::load_from("this-config-file-does-not-exist").unwrap();
        config.site.root = root.to_string_lossy().into_owned();
        config.logging.access_log = false;
        Arc::new(AppState::new(&config))
    }

    fn site_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("app")).unwrap();
        std::fs::write(dir.path().join("index.html"), "landing").unwrap();
        std::fs::write(dir.path().join("app/index.html"), "app").unwrap();
        dir
    }

    fn request(method: Method, host: &str, uri: &str) -> Request<()> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(HOST, host)
            .body(())
            .unwrap()
    }

    fn peer() -> SocketAddr {
        "127.0.0.1:50000".parse().unwrap()
    }

    async fn body_string(resp: Response<Full<Bytes>>) -> String {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_method_checks() {
        let dir = site_dir();
        let state = state(dir.path());

        let resp = handle_request(request(Method::POST, "mautoflow.com", "/"), state.clone(), peer())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);

        let resp = handle_request(request(Method::OPTIONS, "mautoflow.com", "/"), state, peer())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_body_size_limit() {
        let dir = site_dir();
        let state = state(dir.path());
        let mut req = request(Method::GET, "mautoflow.com", "/");
        req.headers_mut()
            .insert(CONTENT_LENGTH, HeaderValue::from_static("999999999"));

        let resp = handle_request(req, state, peer()).await.unwrap();
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let dir = site_dir();
        let state = state(dir.path());
        for path in ["/healthz", "/readyz"] {
            let resp = handle_request(request(Method::GET, "mautoflow.com", path), state.clone(), peer())
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::OK);
            assert_eq!(body_string(resp).await, r#"{"status":"ok"}"#);
        }
    }

    #[tokio::test]
    async fn test_health_paths_redirect_on_legacy_host() {
        let dir = site_dir();
        let state = state(dir.path());
        for path in ["/healthz", "/readyz"] {
            let resp = handle_request(
                request(Method::GET, "mautoflow-frontend-cf.pages.dev", path),
                state.clone(),
                peer(),
            )
            .await
            .unwrap();
            assert_eq!(resp.status(), StatusCode::MOVED_PERMANENTLY);
            assert_eq!(
                resp.headers()[LOCATION],
                format!("https://mautoflow.com{path}").as_str()
            );
        }
    }

    #[tokio::test]
    async fn test_front_door_through_handler() {
        let dir = site_dir();
        let state = state(dir.path());

        let resp = handle_request(
            request(Method::GET, "mautoflow-frontend-cf.pages.dev", "/share/x?y=1"),
            state.clone(),
            peer(),
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(resp.headers()[LOCATION], "https://mautoflow.com/share/x?y=1");

        let resp = handle_request(request(Method::GET, "mautoflow.com", "/share/x"), state.clone(), peer())
            .await
            .unwrap();
        assert_eq!(resp.headers()[SERVER], "mautoflow-edge");
        assert_eq!(body_string(resp).await, "app");

        let resp = handle_request(request(Method::GET, "mautoflow.com", "/terms"), state.clone(), peer())
            .await
            .unwrap();
        assert_eq!(body_string(resp).await, "app");

        let resp = handle_request(request(Method::GET, "mautoflow.com", "/blog/1"), state, peer())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_string(resp).await, "landing");
    }

    #[test]
    fn test_access_log_entry() {
        let mut req = request(Method::GET, "mautoflow.com", "/app/x?id=3");
        req.headers_mut()
            .insert(USER_AGENT, HeaderValue::from_static("curl/8"));
        let resp = http::build_404_response();

        let entry = access_log_entry(&req, &resp, Some(RouteOutcome::App), peer(), Instant::now());
        assert_eq!(entry.remote_addr, "127.0.0.1");
        assert_eq!(entry.host.as_deref(), Some("mautoflow.com"));
        assert_eq!(entry.path, "/app/x");
        assert_eq!(entry.query.as_deref(), Some("id=3"));
        assert_eq!(entry.http_version, "1.1");
        assert_eq!(entry.status, 404);
        assert_eq!(entry.body_bytes, 13);
        assert_eq!(entry.user_agent.as_deref(), Some("curl/8"));
        assert_eq!(entry.route, Some("app"));
    }
}
