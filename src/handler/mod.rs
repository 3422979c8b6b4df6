//! Request handler module
//!
//! Request dispatch and the static origin the front door delegates to.

pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
