//! Image request handling
//!
//! Parses the query surface, runs the resolver, and maps the outcome to the
//! response contract. Validation errors become 400-class responses; anything
//! past validation terminates in an image response.

use crate::config::{AppState, CacheConfig};
use crate::http;
use crate::logger;
use crate::proxy::{Resolution, ResolveError, Tier};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::sync::Arc;

/// Query parameters of an image request
///
/// Values are percent-decoded exactly once during parsing; downstream code
/// must not decode them again.
#[derive(Debug, Default)]
pub struct ImageQuery {
    pub category: Option<String>,
    pub id: Option<String>,
    /// Diagnostic logging only, no behavioral change to the response
    pub debug: bool,
    /// Referer rejection returns 403 instead of the empty image
    pub strict: bool,
    /// Accepted for interface compatibility; resizing is not implemented
    pub width: Option<u32>,
}

impl ImageQuery {
    pub fn parse(query: Option<&str>) -> Self {
        let mut parsed = Self::default();
        let Some(query) = query else {
            return parsed;
        };

        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "src" => parsed.category = Some(value.into_owned()),
                "id" => parsed.id = Some(value.into_owned()),
                "debug" => parsed.debug = !value.is_empty(),
                "strict" => parsed.strict = value == "true",
                "width" => parsed.width = value.parse().ok(),
                _ => {}
            }
        }
        parsed
    }
}

/// Resolve and serve an image request
pub async fn serve_image(
    query: &ImageQuery,
    state: &Arc<AppState>,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let category = query.category.as_deref().unwrap_or("");
    let id = query.id.as_deref().unwrap_or("");

    // `width` is pass-through: original bytes are returned unresized
    if query.debug {
        if let Some(width) = query.width {
            logger::log_resize_ignored(width);
        }
    }
    match state
        .resolver
        .resolve(category, id, &state.config.resources, query.debug)
        .await
    {
        Ok(resolution) => {
            if state.config.logging.access_log {
                logger::log_resolution(category, id, &resolution.tier);
            }
            build_resolved_response(resolution, state, is_head)
        }
        Err(err @ ResolveError::MissingParameter(_)) => {
            http::build_missing_parameter_response(&err.to_string(), &state.config.anti_leech)
        }
        Err(ResolveError::InvalidCategory {
            category,
            available,
        }) => {
            logger::log_invalid_category(&category);
            http::build_invalid_category_response(&category, &available, &state.config.anti_leech)
        }
    }
}

/// Serve the fallback image directly, bypassing resolution.
/// Used when the referer gate rejects a request in non-strict mode.
pub async fn serve_fallback_image(state: &Arc<AppState>, is_head: bool) -> Response<Full<Bytes>> {
    let resolution = state.resolver.fallback(&state.config.resources).await;
    build_resolved_response(resolution, state, is_head)
}

/// Map a resolution onto the wire: tier picks the cache lifetime
fn build_resolved_response(
    resolution: Resolution,
    state: &Arc<AppState>,
    is_head: bool,
) -> Response<Full<Bytes>> {
    http::build_image_response(
        resolution.bytes,
        &resolution.content_type,
        tier_max_age(&resolution.tier, state.config.cache),
        is_head,
        &state.config.anti_leech,
    )
}

fn tier_max_age(tier: &Tier, cache: CacheConfig) -> u32 {
    match tier {
        Tier::Found { .. } => cache.found_max_age,
        Tier::EmptyAsset => cache.empty_max_age,
        Tier::Pixel => cache.pixel_max_age,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_query() {
        let query = ImageQuery::parse(Some("src=ships&id=42"));
        assert_eq!(query.category.as_deref(), Some("ships"));
        assert_eq!(query.id.as_deref(), Some("42"));
        assert!(!query.debug);
        assert!(!query.strict);
        assert_eq!(query.width, None);
    }

    #[test]
    fn test_parse_decodes_percent_encoding_once() {
        let query = ImageQuery::parse(Some("src=treasureMaps&id=old%20map%2542"));
        // %25 decodes to a literal percent sign, not a second decoding round
        assert_eq!(query.id.as_deref(), Some("old map%42"));
    }

    #[test]
    fn test_parse_optional_parameters() {
        let query = ImageQuery::parse(Some("src=items&id=9&debug=1&strict=true&width=64"));
        assert!(query.debug);
        assert!(query.strict);
        assert_eq!(query.width, Some(64));
    }

    #[test]
    fn test_parse_missing_query() {
        let query = ImageQuery::parse(None);
        assert!(query.category.is_none());
        assert!(query.id.is_none());
    }

    #[test]
    fn test_parse_ignores_unknown_and_bad_values() {
        let query = ImageQuery::parse(Some("src=items&id=9&width=huge&other=x"));
        assert_eq!(query.width, None);
        assert_eq!(query.category.as_deref(), Some("items"));
    }

    #[test]
    fn test_tier_max_age_mapping() {
        let cache = CacheConfig {
            found_max_age: 86_400,
            empty_max_age: 3_600,
            pixel_max_age: 600,
        };
        assert_eq!(
            tier_max_age(
                &Tier::Found {
                    source_path: "/ships/1.webp".to_string()
                },
                cache
            ),
            86_400
        );
        assert_eq!(tier_max_age(&Tier::EmptyAsset, cache), 3_600);
        assert_eq!(tier_max_age(&Tier::Pixel, cache), 600);
    }
}
