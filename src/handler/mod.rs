//! Request handling module
//!
//! HTTP dispatch: method gate, access-control gates, and the image endpoint.

mod image;
mod router;

pub use router::handle_request;
