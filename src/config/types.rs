// Configuration types module
// Defines all configuration-related data structures

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub origin: OriginConfig,
    pub cache: CacheConfig,
    pub anti_leech: AntiLeechConfig,
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub resources: ResourceConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    /// Per-candidate origin fetch timeout in seconds
    pub fetch_timeout: u64,
    pub max_connections: Option<u64>,
}

/// Origin server selection
///
/// `debug = true` switches every outbound fetch to `debug_url` and disables
/// the referer gate, mirroring the development/production split of the
/// deployed service.
#[derive(Debug, Deserialize, Clone)]
pub struct OriginConfig {
    pub production_url: String,
    pub debug_url: String,
    pub debug: bool,
}

impl OriginConfig {
    /// Base URL all candidate paths are resolved against
    pub fn base_url(&self) -> &str {
        if self.debug {
            &self.debug_url
        } else {
            &self.production_url
        }
    }
}

/// Cache lifetimes per fallback tier (seconds)
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct CacheConfig {
    /// A matched resource is long-lived
    pub found_max_age: u32,
    /// The empty-image asset signals "no content" and may appear later
    pub empty_max_age: u32,
    /// The embedded pixel is a last resort, keep it short
    pub pixel_max_age: u32,
}

/// Anti-leech (referer) gate configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AntiLeechConfig {
    /// Domains allowed as referer; entries starting with '.' match subdomains
    pub allowed_domains: Vec<String>,
    pub allow_empty_referer: bool,
}

/// Rate limiting configuration
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct RateLimitConfig {
    pub enabled: bool,
    /// Counting window in seconds
    pub window_secs: u64,
    /// Max requests per client per window
    pub max_requests: u32,
    /// Max tracked clients before oldest-window eviction kicks in
    pub cache_size: usize,
}

/// Resource resolution configuration: category → base directories, plus the
/// extension list and the empty-image fallback path shared by all categories
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ResourceConfig {
    pub base_paths: HashMap<String, Vec<String>>,
    pub extensions: Vec<String>,
    pub empty_image_path: String,
    /// Candidate attempt strategy: try paths one by one or race them all
    #[serde(default)]
    pub strategy: AttemptStrategy,
}

/// How candidate paths are attempted against the origin
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AttemptStrategy {
    /// Attempt candidates strictly in priority order, stop at first hit
    #[default]
    Sequential,
    /// Fetch all candidates at once, pick the first hit in priority order
    Concurrent,
}

impl ResourceConfig {
    /// Sorted list of configured category keys, used in error responses
    pub fn available_categories(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.base_paths.keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl Default for ResourceConfig {
    fn default() -> Self {
        let paths = |v: &[&str]| v.iter().map(ToString::to_string).collect::<Vec<_>>();
        let mut base_paths = HashMap::new();
        base_paths.insert(
            "items".to_string(),
            paths(&[
                "/items",
                "/items/ammunitions",
                "/items/armors",
                "/items/chests",
                "/items/consumables",
                "/items/majorFurnitures",
                "/items/offensiveFurnitures",
                "/items/tools",
                "/items/utilityFurnitures",
                "/ships/shipUpgrades",
                "/items/weapons",
                "/items/weapons/longGuns",
                "/items/weapons/torpedos",
            ]),
        );
        base_paths.insert("commodities".to_string(), paths(&["/commodities"]));
        base_paths.insert("cosmetics".to_string(), paths(&["/cosmetics"]));
        base_paths.insert("damages".to_string(), paths(&["/damages"]));
        base_paths.insert("factions".to_string(), paths(&["/factions"]));
        base_paths.insert("materials".to_string(), paths(&["/materials"]));
        base_paths.insert("modifications".to_string(), paths(&["/modifications"]));
        base_paths.insert("npcs".to_string(), paths(&["/npcs"]));
        base_paths.insert(
            "ships".to_string(),
            paths(&["/ships", "/ships/shipUpgrades"]),
        );
        base_paths.insert(
            "treasureMaps".to_string(),
            paths(&[
                "/treasureMaps/legendary",
                "/treasureMaps/old",
                "/treasureMaps/recent",
                "/treasureMaps/veryOld",
            ]),
        );
        base_paths.insert("ultimates".to_string(), paths(&["/ultimates"]));

        Self {
            base_paths,
            extensions: vec![".webp".to_string(), ".png".to_string()],
            empty_image_path: "/empty.webp".to_string(),
            strategy: AttemptStrategy::default(),
        }
    }
}
