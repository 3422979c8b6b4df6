// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub routing: RoutingConfig,
    #[serde(default)]
    pub health: HealthConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Log file path (optional, stdout if not set)
    #[serde(default)]
    pub log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
    /// Seconds to wait for in-flight connections on shutdown
    pub shutdown_grace: u64,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
    pub enable_cors: bool,
    pub max_body_size: u64,
}

/// Static site configuration
#[derive(Debug, Deserialize, Clone)]
pub struct SiteConfig {
    /// Directory holding the built front end
    #[serde(default = "default_site_root")]
    pub root: String,
    #[serde(default = "default_index_files")]
    pub index_files: Vec<String>,
    /// Entry document of the marketing site
    #[serde(default = "default_landing_document")]
    pub landing_document: String,
    /// Entry document of the single-page application
    #[serde(default = "default_app_document")]
    pub app_document: String,
}

fn default_site_root() -> String {
    "dist".to_string()
}

fn default_index_files() -> Vec<String> {
    vec!["index.html".to_string()]
}

fn default_landing_document() -> String {
    "/index.html".to_string()
}

fn default_app_document() -> String {
    "/app/index.html".to_string()
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            root: default_site_root(),
            index_files: default_index_files(),
            landing_document: default_landing_document(),
            app_document: default_app_document(),
        }
    }
}

/// Front door routing rules
#[derive(Debug, Deserialize, Clone)]
pub struct RoutingConfig {
    /// Superseded hosting domain; requests for it are redirected
    #[serde(default = "default_legacy_host")]
    pub legacy_host: Option<String>,
    #[serde(default = "default_canonical_host")]
    pub canonical_host: String,
    /// Path prefixes owned by the single-page application
    #[serde(default = "default_app_prefixes")]
    pub app_prefixes: Vec<String>,
    /// Exact paths always served by the application entry document
    #[serde(default = "default_legal_paths")]
    pub legal_paths: Vec<String>,
}

#[allow(clippy::unnecessary_wraps)]
fn default_legacy_host() -> Option<String> {
    Some("mautoflow-frontend-cf.pages.dev".to_string())
}

fn default_canonical_host() -> String {
    "mautoflow.com".to_string()
}

fn default_app_prefixes() -> Vec<String> {
    vec!["/app/".to_string(), "/share/".to_string()]
}

fn default_legal_paths() -> Vec<String> {
    [
        "/pricing",
        "/terms-of-service",
        "/privacy-policy",
        // legacy aliases
        "/terms",
        "/privacy",
    ]
    .iter()
    .map(ToString::to_string)
    .collect()
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            legacy_host: default_legacy_host(),
            canonical_host: default_canonical_host(),
            app_prefixes: default_app_prefixes(),
            legal_paths: default_legal_paths(),
        }
    }
}

/// Health check configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HealthConfig {
    /// Enable health check endpoints
    #[serde(default = "default_health_enabled")]
    pub enabled: bool,
    /// Liveness probe path (default: /healthz)
    #[serde(default = "default_healthz_path")]
    pub liveness_path: String,
    /// Readiness probe path (default: /readyz)
    #[serde(default = "default_readyz_path")]
    pub readiness_path: String,
}

#[allow(clippy::missing_const_for_fn)]
fn default_health_enabled() -> bool {
    true
}

fn default_healthz_path() -> String {
    "/healthz".to_string()
}

fn default_readyz_path() -> String {
    "/readyz".to_string()
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            enabled: default_health_enabled(),
            liveness_path: default_healthz_path(),
            readiness_path: default_readyz_path(),
        }
    }
}
