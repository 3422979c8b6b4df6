// Configuration module entry point
// Loads layered configuration and holds the per-process application state

mod state;
mod types;

use std::net::SocketAddr;

use crate::error::Error;

// Re-export public types
pub use state::AppState;
pub use types::{
    Config, HealthConfig, HttpConfig, LoggingConfig, PerformanceConfig, RoutingConfig,
    ServerConfig, SiteConfig,
};

/// Default config file name (without extension)
pub const DEFAULT_CONFIG_PATH: &str = "config";

impl Config {
    /// Load configuration from specified file path (without extension)
    ///
    /// Sources, lowest priority first: built-in defaults, the optional file,
    /// then `EDGE__SECTION__KEY` environment variables.
    pub fn load_from(config_path: &str) -> Result<Self, Error> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("EDGE").separator("__"))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("performance.shutdown_grace", 10)?
            .set_default("http.server_name", "mautoflow-edge")?
            .set_default("http.enable_cors", false)?
            .set_default("http.max_body_size", 1_048_576)? // 1MB
            .build()?;

        let cfg: Self = settings.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, Error> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.parse().map_err(|source| Error::Addr { addr, source })
    }

    /// Reject configurations the front door cannot route with
    pub fn validate(&self) -> Result<(), Error> {
        self.get_socket_addr()?;

        require_absolute("site.landing_document", &self.site.landing_document)?;
        require_absolute("site.app_document", &self.site.app_document)?;
        for prefix in &self.routing.app_prefixes {
            require_absolute("routing.app_prefixes", prefix)?;
        }
        for path in &self.routing.legal_paths {
            require_absolute("routing.legal_paths", path)?;
        }

        let canonical = self.routing.canonical_host.trim();
        if canonical.is_empty() {
            return Err(Error::Invalid(
                "routing.canonical_host must not be empty".to_string(),
            ));
        }
        if let Some(legacy) = &self.routing.legacy_host {
            if legacy.eq_ignore_ascii_case(canonical) {
                return Err(Error::Invalid(format!(
                    "routing.legacy_host equals canonical_host '{canonical}', every request would redirect to itself"
                )));
            }
        }

        Ok(())
    }
}

fn require_absolute(key: &str, value: &str) -> Result<(), Error> {
    if value.starts_with('/') {
        Ok(())
    } else {
        Err(Error::Invalid(format!(
            "{key} entry '{value}' must start with '/'"
        )))
    }
}
