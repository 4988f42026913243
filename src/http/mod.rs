//! HTTP protocol layer module
//!
//! Response builders for the proxy's full status contract, decoupled from the
//! resolution logic.

pub mod response;

// Re-export commonly used builders
pub use response::{
    build_405_response, build_forbidden_response, build_health_response, build_image_response,
    build_invalid_category_response, build_missing_parameter_response, build_options_response,
    build_rate_limited_response,
};
