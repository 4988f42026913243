//! Referer (anti-leech) gate
//!
//! Only requests refered from configured domains may reach the resolver.
//! Rejected requests are served the empty-image fallback (or 403 in strict
//! mode) by the handler, never the real resource.

use crate::config::AntiLeechConfig;
use url::Url;

/// Decide whether a request referer is acceptable.
///
/// A missing or blank referer is honored only when `allow_empty_referer` is
/// set. A non-blank referer that does not parse as a URL is rejected.
pub fn referer_allowed(referer: Option<&str>, config: &AntiLeechConfig) -> bool {
    let Some(referer) = referer.filter(|r| !r.is_empty()) else {
        return config.allow_empty_referer;
    };

    let Ok(url) = Url::parse(referer) else {
        return false;
    };
    let Some(host) = url.host_str() else {
        return false;
    };

    config
        .allowed_domains
        .iter()
        .any(|domain| domain_matches(host, domain))
}

/// `.example.com` entries match the apex and every subdomain; anything else
/// is an exact host match
fn domain_matches(host: &str, domain: &str) -> bool {
    match domain.strip_prefix('.') {
        Some(apex) => host == apex || host.ends_with(domain),
        None => host == domain,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(domains: &[&str], allow_empty: bool) -> AntiLeechConfig {
        AntiLeechConfig {
            allowed_domains: domains.iter().map(ToString::to_string).collect(),
            allow_empty_referer: allow_empty,
        }
    }

    #[test]
    fn test_exact_domain_match() {
        let cfg = config(&["glow-prow.org.cn"], false);
        assert!(referer_allowed(Some("https://glow-prow.org.cn/ships"), &cfg));
        assert!(!referer_allowed(Some("https://evil.example.com/"), &cfg));
    }

    #[test]
    fn test_exact_match_rejects_subdomains() {
        let cfg = config(&["glow-prow.org.cn"], false);
        assert!(!referer_allowed(
            Some("https://cdn.glow-prow.org.cn/"),
            &cfg
        ));
    }

    #[test]
    fn test_dot_prefix_matches_subdomains_and_apex() {
        let cfg = config(&[".glow-prow.org.cn"], false);
        assert!(referer_allowed(Some("https://glow-prow.org.cn/"), &cfg));
        assert!(referer_allowed(Some("https://cdn.glow-prow.org.cn/"), &cfg));
        assert!(!referer_allowed(
            Some("https://notglow-prow.org.cn/"),
            &cfg
        ));
    }

    #[test]
    fn test_empty_referer() {
        assert!(!referer_allowed(None, &config(&["a.org"], false)));
        assert!(referer_allowed(None, &config(&["a.org"], true)));
    }

    #[test]
    fn test_blank_referer_follows_empty_policy() {
        // a sent-but-blank header is the same as no referer at all
        assert!(referer_allowed(Some(""), &config(&["a.org"], true)));
        assert!(!referer_allowed(Some(""), &config(&["a.org"], false)));
    }

    #[test]
    fn test_unparseable_referer_rejected() {
        let cfg = config(&["glow-prow.org.cn"], true);
        assert!(!referer_allowed(Some("not a url"), &cfg));
    }
}
