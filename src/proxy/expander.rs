//! Candidate path expansion
//!
//! Pure construction of origin paths for a `(category, id)` pair.
//! No I/O happens here; the caller decides what to do with the list.

use crate::config::ResourceConfig;
use std::collections::HashSet;

/// Build the ordered candidate path list for a category and identifier.
///
/// Outer loop over the category's base paths, inner loop over extensions;
/// that cross-product order is the priority order during resolution.
/// Identical strings are attempted only once. An unknown category yields an
/// empty list, which the caller must treat as invalid.
///
/// Inputs must already be percent-decoded, exactly once.
pub fn expand(category: &str, id: &str, config: &ResourceConfig) -> Vec<String> {
    let Some(base_paths) = config.base_paths.get(category) else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut candidates = Vec::new();
    for base in base_paths {
        for ext in &config.extensions {
            let candidate = format!("{base}/{id}{ext}");
            if seen.insert(candidate.clone()) {
                candidates.push(candidate);
            }
        }
    }
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_with(base_paths: &[(&str, &[&str])]) -> ResourceConfig {
        let mut map = HashMap::new();
        for (category, paths) in base_paths {
            map.insert(
                (*category).to_string(),
                paths.iter().map(ToString::to_string).collect(),
            );
        }
        ResourceConfig {
            base_paths: map,
            extensions: vec![".webp".to_string(), ".png".to_string()],
            ..ResourceConfig::default()
        }
    }

    #[test]
    fn test_cross_product_order() {
        let config = config_with(&[("ships", &["/ships", "/ships/shipUpgrades"])]);
        let candidates = expand("ships", "42", &config);
        assert_eq!(
            candidates,
            vec![
                "/ships/42.webp",
                "/ships/42.png",
                "/ships/shipUpgrades/42.webp",
                "/ships/shipUpgrades/42.png",
            ]
        );
    }

    #[test]
    fn test_unknown_category_is_empty() {
        let config = config_with(&[("ships", &["/ships"])]);
        assert!(expand("bogus", "1", &config).is_empty());
    }

    #[test]
    fn test_duplicate_base_paths_deduplicated() {
        let config = config_with(&[("ships", &["/ships", "/ships"])]);
        let candidates = expand("ships", "42", &config);
        assert_eq!(candidates, vec!["/ships/42.webp", "/ships/42.png"]);
    }

    #[test]
    fn test_default_map_is_duplicate_free() {
        let config = ResourceConfig::default();
        for category in config.base_paths.keys() {
            let candidates = expand(category, "anything", &config);
            assert!(!candidates.is_empty());
            let unique: HashSet<_> = candidates.iter().collect();
            assert_eq!(unique.len(), candidates.len(), "category {category}");
        }
    }

    #[test]
    fn test_id_is_used_verbatim() {
        let config = config_with(&[("npcs", &["/npcs"])]);
        let candidates = expand("npcs", "deadly kraken", &config);
        assert_eq!(candidates[0], "/npcs/deadly kraken.webp");
    }
}
