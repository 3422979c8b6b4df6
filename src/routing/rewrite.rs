//! Path classification module
//!
//! Decides which entry document a path falls back to.

use std::borrow::Cow;

/// Path matching rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathRule {
    /// Exact path match
    Exact(String),
    /// Path prefix match (e.g., "/app/" matches "/app/editor")
    Prefix(String),
}

impl PathRule {
    pub fn matches(&self, path: &str) -> bool {
        match self {
            Self::Exact(exact) => path == exact,
            Self::Prefix(prefix) => path.starts_with(prefix.as_str()),
        }
    }
}

/// Which part of the site a path belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathClass {
    /// Legal page, served by the application
    Legal,
    /// Under an application prefix
    App,
    /// Everything else belongs to the landing site
    Other,
}

#[derive(Debug, Clone)]
pub struct RewriteRules {
    legal: Vec<PathRule>,
    app: Vec<PathRule>,
}

impl RewriteRules {
    pub fn new(legal_paths: &[String], app_prefixes: &[String]) -> Self {
        Self {
            legal: legal_paths.iter().cloned().map(PathRule::Exact).collect(),
            app: app_prefixes.iter().cloned().map(PathRule::Prefix).collect(),
        }
    }

    /// Legal paths are checked first
    pub fn classify(&self, path: &str) -> PathClass {
        if self.legal.iter().any(|rule| rule.matches(path)) {
            PathClass::Legal
        } else if self.app.iter().any(|rule| rule.matches(path)) {
            PathClass::App
        } else {
            PathClass::Other
        }
    }
}

/// Resolve `.` and `..` segments, percent-encoded dots included
///
/// `..` never climbs above the root. A dot segment in last position leaves a
/// trailing slash, so `/app/.` becomes `/app/`.
pub fn normalize_dot_segments(path: &str) -> Cow<'_, str> {
    let Some(rest) = path.strip_prefix('/') else {
        return Cow::Borrowed(path);
    };
    if !rest
        .split('/')
        .any(|segment| is_single_dot(segment) || is_double_dot(segment))
    {
        return Cow::Borrowed(path);
    }

    let segments: Vec<&str> = rest.split('/').collect();
    let last = segments.len() - 1;
    let mut resolved: Vec<&str> = Vec::with_capacity(segments.len());
    for (i, segment) in segments.into_iter().enumerate() {
        if is_double_dot(segment) {
            resolved.pop();
        } else if !is_single_dot(segment) {
            resolved.push(segment);
            continue;
        }
        if i == last {
            resolved.push("");
        }
    }
    Cow::Owned(format!("/{}", resolved.join("/")))
}

fn is_single_dot(segment: &str) -> bool {
    segment == "." || segment.eq_ignore_ascii_case("%2e")
}

fn is_double_dot(segment: &str) -> bool {
    ["..", ".%2e", "%2e.", "%2e%2e"]
        .iter()
        .any(|dots| segment.eq_ignore_ascii_case(dots))
}
