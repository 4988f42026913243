// Configuration module entry point
// Manages application configuration and shared runtime state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{
    AntiLeechConfig, AttemptStrategy, CacheConfig, Config, OriginConfig, RateLimitConfig,
    ResourceConfig,
};

impl Config {
    /// Load configuration from specified file path (without extension)
    /// Default config file is "config.toml" when no path specified
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("PROXY").separator("__"))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8088)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("performance.fetch_timeout", 5)?
            .set_default("origin.production_url", "https://assets.glow-prow.org.cn")?
            .set_default("origin.debug_url", "http://localhost:8088")?
            .set_default("origin.debug", false)?
            .set_default("cache.found_max_age", 86_400)? // 24 hours
            .set_default("cache.empty_max_age", 3_600)? // 1 hour
            .set_default("cache.pixel_max_age", 600)?
            .set_default(
                "anti_leech.allowed_domains",
                vec!["glow-prow.org.cn", "glow-prow.top"],
            )?
            .set_default("anti_leech.allow_empty_referer", false)?
            .set_default("rate_limit.enabled", true)?
            .set_default("rate_limit.window_secs", 60)?
            .set_default("rate_limit.max_requests", 100)?
            .set_default("rate_limit.cache_size", 1_000)?
            .build()?;

        settings.try_deserialize()
    }

    /// Load configuration from the default "config.toml"
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}
