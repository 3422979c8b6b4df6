//! Host redirect module
//!
//! Sends requests that arrive on the superseded hosting domain to the same
//! path and query on the canonical domain, always over https.

use hyper::header::HOST;
use hyper::{HeaderMap, Uri};

/// Legacy and canonical host pair
#[derive(Debug, Clone)]
pub struct HostRules {
    legacy_host: Option<String>,
    canonical_host: String,
}

impl HostRules {
    /// An empty legacy host disables the redirect.
    pub fn new(legacy_host: Option<&str>, canonical_host: &str) -> Self {
        Self {
            legacy_host: legacy_host
                .map(str::trim)
                .filter(|h| !h.is_empty())
                .map(str::to_ascii_lowercase),
            canonical_host: canonical_host.trim().to_ascii_lowercase(),
        }
    }

    /// Return the `Location` to redirect to, if `host` is the legacy domain
    pub fn canonical_redirect(
        &self,
        host: Option<&str>,
        path: &str,
        query: Option<&str>,
    ) -> Option<String> {
        let legacy = self.legacy_host.as_deref()?;
        let host = strip_port(host?);
        if !host.eq_ignore_ascii_case(legacy) {
            return None;
        }

        let path = if path.is_empty() { "/" } else { path };
        let mut location = format!("https://{}{path}", self.canonical_host);
        // A bare `?` is kept
        if let Some(q) = query {
            location.push('?');
            location.push_str(q);
        }
        Some(location)
    }
}

/// Hostname the request was addressed to
///
/// Absolute-form request targets carry their own authority, which wins over
/// the `Host` header.
pub fn request_host<'a>(uri: &'a Uri, headers: &'a HeaderMap) -> Option<&'a str> {
    uri.authority().map(hyper::http::uri::Authority::as_str).or_else(|| {
        headers
            .get(HOST)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
    })
}

/// Strip port from host if present (e.g., "example.com:8080" -> "example.com")
pub fn strip_port(host: &str) -> &str {
    // "[::1]:8080" -> "[::1]"
    if host.starts_with('[') {
        return host.find(']').map_or(host, |end| &host[..=end]);
    }
    host.split(':').next().unwrap_or(host)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::header::HeaderValue;

    fn rules() -> HostRules {
        HostRules::new(Some("mautoflow-frontend-cf.pages.dev"), "mautoflow.com")
    }

    #[test]
    fn test_strip_port() {
        assert_eq!(strip_port("example.com"), "example.com");
        assert_eq!(strip_port("example.com:8080"), "example.com");
        assert_eq!(strip_port("[::1]:8080"), "[::1]");
        assert_eq!(strip_port("[::1]"), "[::1]");
    }

    #[test]
    fn test_redirect_preserves_path_and_query() {
        let location = rules().canonical_redirect(
            Some("mautoflow-frontend-cf.pages.dev"),
            "/app/editor",
            Some("id=42&lang=c"),
        );
        assert_eq!(
            location.as_deref(),
            Some("https://mautoflow.com/app/editor?id=42&lang=c")
        );
    }

    #[test]
    fn test_redirect_root_and_empty_query() {
        let r = rules();
        assert_eq!(
            r.canonical_redirect(Some("mautoflow-frontend-cf.pages.dev"), "", None)
                .as_deref(),
            Some("https://mautoflow.com/")
        );
        assert_eq!(
            r.canonical_redirect(Some("mautoflow-frontend-cf.pages.dev"), "/", Some(""))
                .as_deref(),
            Some("https://mautoflow.com/?")
        );

        let uri: Uri = "/share/x?".parse().unwrap();
        assert_eq!(
            r.canonical_redirect(Some("mautoflow-frontend-cf.pages.dev"), uri.path(), uri.query())
                .as_deref(),
            Some("https://mautoflow.com/share/x?")
        );
    }

    #[test]
    fn test_redirect_ignores_case_and_port() {
        let location = rules().canonical_redirect(
            Some("MAutoFlow-Frontend-CF.pages.dev:8443"),
            "/pricing",
            None,
        );
        assert_eq!(location.as_deref(), Some("https://mautoflow.com/pricing"));
    }

    #[test]
    fn test_no_redirect_for_other_hosts() {
        let r = rules();
        assert!(r.canonical_redirect(Some("mautoflow.com"), "/", None).is_none());
        assert!(r
            .canonical_redirect(Some("preview.mautoflow-frontend-cf.pages.dev"), "/", None)
            .is_none());
        assert!(r.canonical_redirect(None, "/", None).is_none());
    }

    #[test]
    fn test_disabled_legacy_host() {
        let r = HostRules::new(Some("  "), "mautoflow.com");
        assert!(r
            .canonical_redirect(Some("mautoflow-frontend-cf.pages.dev"), "/", None)
            .is_none());
        let r = HostRules::new(None, "mautoflow.com");
        assert!(r.canonical_redirect(Some("anything"), "/", None).is_none());
    }

    #[test]
    fn test_request_host_prefers_authority() {
        let mut headers = HeaderMap::new();
        headers.insert(HOST, HeaderValue::from_static("mautoflow.com"));

        let origin_form: Uri = "/pricing".parse().unwrap();
        assert_eq!(request_host(&origin_form, &headers), Some("mautoflow.com"));

        let absolute: Uri = "http://mautoflow-frontend-cf.pages.dev/pricing"
            .parse()
            .unwrap();
        assert_eq!(
            request_host(&absolute, &headers),
            Some("mautoflow-frontend-cf.pages.dev")
        );

        assert_eq!(request_host(&origin_form, &HeaderMap::new()), None);
    }
}
