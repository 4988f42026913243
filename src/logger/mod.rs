//! Logger module
//!
//! Logging utilities for the image proxy:
//! - Server lifecycle logging
//! - Access logging with timestamps
//! - Resolution diagnostics (tier, winning path, candidate misses)
//! - Error and warning logging with optional file targets

mod writer;

use crate::config::Config;
use crate::proxy::Tier;
use std::net::{IpAddr, SocketAddr};

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

fn timestamp() -> String {
    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// Write to info/access log
fn write_info(message: &str) {
    match writer::get() {
        Some(w) => w.write_info(message),
        None => println!("{message}"),
    }
}

/// Write to error log
fn write_error(message: &str) {
    match writer::get() {
        Some(w) => w.write_error(message),
        None => eprintln!("{message}"),
    }
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    write_info("======================================");
    write_info("Image proxy started successfully");
    write_info(&format!("Listening on: http://{addr}"));
    write_info(&format!("Origin: {}", config.origin.base_url()));
    write_info(&format!(
        "Categories: {}",
        config.resources.available_categories().join(", ")
    ));
    write_info(&format!("Log level: {}", config.logging.level));
    if let Some(workers) = config.server.workers {
        write_info(&format!("Worker threads: {workers}"));
    }
    if config.origin.debug {
        write_info("Debug mode: referer gate disabled");
    }
    write_info("======================================\n");
}

pub fn log_request(method: &hyper::Method, uri: &hyper::Uri) {
    write_info(&format!("[{}] {method} {uri}", timestamp()));
}

pub fn log_resolution(category: &str, id: &str, tier: &Tier) {
    let outcome = match tier {
        Tier::Found { source_path } => format!("found {source_path}"),
        Tier::EmptyAsset => "empty-image fallback".to_string(),
        Tier::Pixel => "pixel fallback".to_string(),
    };
    write_info(&format!(
        "[{}] [Resolve] {category}/{id}: {outcome}",
        timestamp()
    ));
}

pub fn log_candidate_hit(path: &str) {
    write_info(&format!("[Candidate] hit: {path}"));
}

pub fn log_candidate_miss(path: &str) {
    write_info(&format!("[Candidate] miss: {path}"));
}

pub fn log_candidate_error(path: &str, err: &impl std::fmt::Display) {
    write_error(&format!("[ERROR] Candidate fetch {path}: {err}"));
}

pub fn log_empty_asset_missing(path: &str) {
    write_error(&format!(
        "[WARN] Empty-image asset unreachable at {path}, serving embedded pixel"
    ));
}

pub fn log_resize_ignored(width: u32) {
    write_info(&format!(
        "[Resize] width={width} requested, serving original bytes"
    ));
}

pub fn log_invalid_category(category: &str) {
    write_error(&format!("[WARN] Invalid category requested: {category}"));
}

pub fn log_rate_limited(client: IpAddr, retry_after_secs: u64) {
    write_error(&format!(
        "[WARN] Rate limited {client}, retry after {retry_after_secs}s"
    ));
}

pub fn log_referer_denied(referer: Option<&str>) {
    match referer {
        Some(referer) => write_error(&format!("[AntiLeech] Denied referer: {referer}")),
        None => write_error("[AntiLeech] Denied empty referer"),
    }
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    write_info(&format!("[Connection] Accepted from: {peer_addr}"));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}
