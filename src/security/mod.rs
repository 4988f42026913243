//! Access-control gates applied before resource resolution
//!
//! Referer (anti-leech) checking, per-client rate limiting, and the
//! security/CORS header set shared by every response.

mod headers;
mod ratelimit;
mod referer;

pub use headers::apply_security_headers;
pub use ratelimit::{RateLimitDecision, RateLimiter};
pub use referer::referer_allowed;
