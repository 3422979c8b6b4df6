//! mautoflow-edge
//!
//! Front door for the mAutoFlow static front end: redirects the legacy
//! hosting domain to the canonical one and falls back to the landing or
//! application entry document for paths the static build does not contain.

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod routing;
pub mod server;

pub use error::Error;
