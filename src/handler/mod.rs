//! Request handler module
//!
//! Responsible for request routing dispatch and the product listing endpoint.

pub mod products;
pub mod router;

// Re-export main entry point
pub use router::handle_request;
