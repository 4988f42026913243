//! Resource resolution with tiered fallback
//!
//! Attempts every candidate path for a request and degrades deterministically:
//! primary candidates → configured empty-image asset → embedded pixel. Only
//! parameter validation can fail; past that point the chain always ends in
//! image bytes.

use crate::config::{AttemptStrategy, ResourceConfig};
use crate::logger;
use crate::proxy::expander;
use crate::proxy::origin::{FetchedImage, ImageOrigin};
use futures_util::future::join_all;
use hyper::body::Bytes;
use thiserror::Error;

/// 1x1 transparent PNG, the unconditional floor of the fallback chain
pub const TRANSPARENT_PIXEL: &[u8] = &[
    0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1f,
    0x15, 0xc4, 0x89, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x44, 0x41, 0x54, 0x78, 0xda, 0x63, 0x64,
    0x60, 0xf8, 0x5f, 0x0f, 0x00, 0x02, 0x87, 0x01, 0x80, 0xeb, 0x47, 0xba, 0x92, 0x00, 0x00,
    0x00, 0x00, 0x49, 0x45, 0x4e, 0x44, 0xae, 0x42, 0x60, 0x82,
];

const DEFAULT_CONTENT_TYPE: &str = "image/png";
const EMPTY_ASSET_CONTENT_TYPE: &str = "image/webp";

/// Validation failures; the only non-image exits of a resolution
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Missing {0} parameter")]
    MissingParameter(&'static str),
    #[error("Category \"{category}\" is not configured")]
    InvalidCategory {
        category: String,
        available: Vec<String>,
    },
}

/// Which fallback tier produced the bytes; drives the cache lifetime
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tier {
    /// A primary candidate matched; the winning origin path is kept for diagnostics
    Found { source_path: String },
    /// The configured empty-image asset
    EmptyAsset,
    /// The embedded transparent pixel
    Pixel,
}

/// Outcome of one resolution, alive for the duration of a request
#[derive(Debug)]
pub struct Resolution {
    pub bytes: Bytes,
    pub content_type: String,
    pub tier: Tier,
}

/// Orchestrates candidate fetches against an origin
pub struct Resolver<O> {
    origin: O,
    strategy: AttemptStrategy,
}

impl<O: ImageOrigin> Resolver<O> {
    pub const fn new(origin: O, strategy: AttemptStrategy) -> Self {
        Self { origin, strategy }
    }

    /// Resolve `(category, id)` to image bytes.
    ///
    /// Validation happens before any network I/O: an unknown category or a
    /// missing parameter never triggers a fetch. `debug` only adds
    /// per-candidate logging, the response is unaffected.
    pub async fn resolve(
        &self,
        category: &str,
        id: &str,
        resources: &ResourceConfig,
        debug: bool,
    ) -> Result<Resolution, ResolveError> {
        if category.is_empty() {
            return Err(ResolveError::MissingParameter("src"));
        }
        if id.is_empty() {
            return Err(ResolveError::MissingParameter("id"));
        }
        if !resources.base_paths.contains_key(category) {
            return Err(ResolveError::InvalidCategory {
                category: category.to_string(),
                available: resources.available_categories(),
            });
        }

        let candidates = expander::expand(category, id, resources);
        let found = match self.strategy {
            AttemptStrategy::Sequential => self.attempt_sequential(&candidates, debug).await,
            AttemptStrategy::Concurrent => self.attempt_concurrent(&candidates, debug).await,
        };

        match found {
            Some((source_path, image)) => Ok(Resolution {
                content_type: image
                    .content_type
                    .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string()),
                bytes: image.bytes,
                tier: Tier::Found { source_path },
            }),
            None => Ok(self.fallback(resources).await),
        }
    }

    /// Tiers 2 and 3 of the chain: the empty-image asset, then the embedded
    /// pixel. Cannot fail. Also used directly when the referer gate rejects
    /// a request without exposing whether the resource exists.
    pub async fn fallback(&self, resources: &ResourceConfig) -> Resolution {
        if let Some(image) = self.origin.fetch(&resources.empty_image_path).await {
            return Resolution {
                content_type: image
                    .content_type
                    .unwrap_or_else(|| EMPTY_ASSET_CONTENT_TYPE.to_string()),
                bytes: image.bytes,
                tier: Tier::EmptyAsset,
            };
        }

        logger::log_empty_asset_missing(&resources.empty_image_path);
        Resolution {
            bytes: Bytes::from_static(TRANSPARENT_PIXEL),
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
            tier: Tier::Pixel,
        }
    }

    /// Attempt candidates strictly in order, stopping at the first hit
    async fn attempt_sequential(
        &self,
        candidates: &[String],
        debug: bool,
    ) -> Option<(String, FetchedImage)> {
        for path in candidates {
            match self.origin.fetch(path).await {
                Some(image) => {
                    if debug {
                        logger::log_candidate_hit(path);
                    }
                    return Some((path.clone(), image));
                }
                None => {
                    if debug {
                        logger::log_candidate_miss(path);
                    }
                }
            }
        }
        None
    }

    /// Fetch all candidates at once, then pick the first hit in *candidate*
    /// order. Completion order is deliberately ignored so repeated requests
    /// pick the same winner.
    async fn attempt_concurrent(
        &self,
        candidates: &[String],
        debug: bool,
    ) -> Option<(String, FetchedImage)> {
        let results = join_all(candidates.iter().map(|path| self.origin.fetch(path))).await;

        for (path, result) in candidates.iter().zip(results) {
            match result {
                Some(image) => {
                    if debug {
                        logger::log_candidate_hit(path);
                    }
                    return Some((path.clone(), image));
                }
                None => {
                    if debug {
                        logger::log_candidate_miss(path);
                    }
                }
            }
        }
        None
    }
}
