//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method validation, health check,
//! rate-limit and referer gates, then the image endpoint.

use crate::config::AppState;
use crate::handler::image::{self, ImageQuery};
use crate::http;
use crate::logger;
use crate::security::{referer_allowed, RateLimitDecision};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::IpAddr;
use std::sync::Arc;

const HEALTH_PATH: &str = "/healthz";

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    peer_ip: IpAddr,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method();
    let is_head = *method == Method::HEAD;

    if state.config.logging.access_log {
        logger::log_request(method, req.uri());
    }

    // 1. Check HTTP method
    match *method {
        Method::GET | Method::HEAD => {}
        Method::OPTIONS => {
            return Ok(http::build_options_response(&state.config.anti_leech));
        }
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            return Ok(http::build_405_response());
        }
    }

    // 2. Health check endpoint
    if req.uri().path() == HEALTH_PATH {
        return Ok(http::build_health_response("ok"));
    }

    // 3. Rate limit per client
    let client = client_ip(req.headers(), peer_ip);
    if let RateLimitDecision::Limited { retry_after_secs } = state.rate_limiter.check(client) {
        logger::log_rate_limited(client, retry_after_secs);
        return Ok(http::build_rate_limited_response(
            retry_after_secs,
            &state.config.anti_leech,
        ));
    }

    let query = ImageQuery::parse(req.uri().query());

    // 4. Referer gate, skipped in debug mode. Rejected requests get the
    //    fallback image so the real resource stays hidden, or 403 in strict
    //    mode.
    if !state.config.origin.debug {
        let referer = req
            .headers()
            .get("referer")
            .and_then(|v| v.to_str().ok());
        if !referer_allowed(referer, &state.config.anti_leech) {
            logger::log_referer_denied(referer);
            if query.strict {
                return Ok(http::build_forbidden_response(&state.config.anti_leech));
            }
            return Ok(image::serve_fallback_image(&state, is_head).await);
        }
    }

    // 5. Resolve and serve
    Ok(image::serve_image(&query, &state, is_head).await)
}

/// Client address for rate limiting: first `X-Forwarded-For` hop when the
/// proxy sits behind another one, otherwise the peer address
fn client_ip(headers: &hyper::HeaderMap, peer_ip: IpAddr) -> IpAddr {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|forwarded| forwarded.split(',').next())
        .and_then(|first| first.trim().parse().ok())
        .unwrap_or(peer_ip)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::HeaderMap;

    fn peer() -> IpAddr {
        IpAddr::from([127, 0, 0, 1])
    }

    #[test]
    fn test_forwarded_for_first_hop() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", "203.0.113.7, 10.0.0.1".parse().unwrap());
        assert_eq!(
            client_ip(&headers, peer()),
            IpAddr::from([203, 0, 113, 7])
        );
    }

    #[test]
    fn test_forwarded_for_absent() {
        assert_eq!(client_ip(&HeaderMap::new(), peer()), peer());
    }

    #[test]
    fn test_forwarded_for_invalid_falls_back_to_peer() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", "not-an-ip".parse().unwrap());
        assert_eq!(client_ip(&headers, peer()), peer());
    }
}
