//! Routing module
//!
//! The front door that sits before the static origin:
//! - Legacy host redirect to the canonical domain
//! - Legal pages pre-routed to the application entry document
//! - Not-found fallback to the application or landing entry document

mod host;
mod rewrite;

pub use host::{request_host, strip_port, HostRules};
pub use rewrite::{normalize_dot_segments, PathClass, PathRule, RewriteRules};

use std::fmt;
use std::future::Future;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};

use crate::config::Config;
use crate::handler::router::RequestContext;
use crate::http;

/// Where the front door delegates to
///
/// Implementations serve `path` with the rest of the request taken from `ctx`.
/// Failures are expressed as response statuses.
pub trait Origin {
    fn fetch(
        &self,
        ctx: &RequestContext<'_>,
        path: &str,
    ) -> impl Future<Output = Response<Full<Bytes>>>;
}

/// Which branch produced the response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    Redirect,
    /// Served by the origin at the requested path
    Asset,
    Legal,
    App,
    Landing,
}

impl RouteOutcome {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Redirect => "redirect",
            Self::Asset => "asset",
            Self::Legal => "legal",
            Self::App => "app",
            Self::Landing => "landing",
        }
    }
}

impl fmt::Display for RouteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct Routed {
    pub response: Response<Full<Bytes>>,
    pub outcome: RouteOutcome,
}

pub struct FrontDoor {
    hosts: HostRules,
    rules: RewriteRules,
    landing_document: String,
    app_document: String,
}

impl FrontDoor {
    pub fn from_config(config: &Config) -> Self {
        Self {
            hosts: HostRules::new(
                config.routing.legacy_host.as_deref(),
                &config.routing.canonical_host,
            ),
            rules: RewriteRules::new(&config.routing.legal_paths, &config.routing.app_prefixes),
            landing_document: config.site.landing_document.clone(),
            app_document: config.site.app_document.clone(),
        }
    }

    /// Route one request
    pub async fn route<O: Origin>(&self, ctx: &RequestContext<'_>, origin: &O) -> Routed {
        match self.redirect(ctx) {
            Some(routed) => routed,
            None => self.serve(ctx, origin).await,
        }
    }

    /// Legacy host redirect, checked ahead of everything else on that host
    pub fn redirect(&self, ctx: &RequestContext<'_>) -> Option<Routed> {
        let path = normalize_dot_segments(ctx.path);
        let location = self.hosts.canonical_redirect(ctx.host, &path, ctx.query)?;
        tracing::debug!(host = ?ctx.host, %location, "legacy host redirect");
        Some(Routed {
            response: http::build_redirect_response_with_code(
                &location,
                StatusCode::MOVED_PERMANENTLY,
            ),
            outcome: RouteOutcome::Redirect,
        })
    }

    /// Legal pre-route, origin delegation and not-found fallback
    ///
    /// Dot segments are resolved before the path is classified or fetched.
    pub async fn serve<O: Origin>(&self, ctx: &RequestContext<'_>, origin: &O) -> Routed {
        let path = normalize_dot_segments(ctx.path);
        let class = self.rules.classify(&path);
        if class == PathClass::Legal {
            return self
                .rewrite(ctx, origin, &self.app_document, RouteOutcome::Legal)
                .await;
        }

        let response = origin.fetch(ctx, &path).await;
        if response.status() != StatusCode::NOT_FOUND {
            return Routed {
                response,
                outcome: RouteOutcome::Asset,
            };
        }

        match class {
            PathClass::App => {
                self.rewrite(ctx, origin, &self.app_document, RouteOutcome::App)
                    .await
            }
            PathClass::Legal | PathClass::Other => {
                self.rewrite(ctx, origin, &self.landing_document, RouteOutcome::Landing)
                    .await
            }
        }
    }

    async fn rewrite<O: Origin>(
        &self,
        ctx: &RequestContext<'_>,
        origin: &O,
        target: &str,
        outcome: RouteOutcome,
    ) -> Routed {
        tracing::debug!(from = ctx.path, to = target, route = %outcome, "rewrite");
        Routed {
            response: origin.fetch(ctx, target).await,
            outcome,
        }
    }
}
