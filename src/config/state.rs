// Shared application state
// Built once at startup, passed as an Arc to every connection task

use crate::config::Config;
use crate::proxy::{HttpOrigin, Resolver};
use crate::security::RateLimiter;

/// Application state shared across all requests
pub struct AppState {
    pub config: Config,
    pub resolver: Resolver<HttpOrigin>,
    pub rate_limiter: RateLimiter,
}

impl AppState {
    /// Build state from loaded configuration
    ///
    /// Fails only if the outbound HTTP client cannot be constructed.
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let origin = HttpOrigin::new(
            config.origin.base_url(),
            config.performance.fetch_timeout,
        )?;
        Ok(Self {
            config: config.clone(),
            resolver: Resolver::new(origin, config.resources.strategy),
            rate_limiter: RateLimiter::new(config.rate_limit),
        })
    }
}
