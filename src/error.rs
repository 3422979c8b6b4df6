//! Error types
//!
//! Startup-time failures. Request handling never fails: every problem there
//! becomes an HTTP status.

use std::net::AddrParseError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("invalid address '{addr}': {source}")]
    Addr {
        addr: String,
        #[source]
        source: AddrParseError,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
