//! HTTP protocol layer module
//!
//! Response builders, caching validators and content types shared by the
//! front door and the static origin.

pub mod cache;
pub mod mime;
pub mod response;

// Re-export commonly used builders
pub use response::{
    build_304_response, build_404_response, build_405_response, build_413_response,
    build_500_response, build_cached_response, build_health_response, build_options_response,
    build_redirect_response_with_code,
};
