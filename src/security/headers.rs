//! Security and CORS headers
//!
//! Attached to every response the proxy emits, including error responses.

use crate::config::AntiLeechConfig;
use hyper::http::response::Builder;

/// Add the CORS and hardening header set to a response under construction.
/// `Access-Control-Allow-Origin` is restricted to the configured domains.
pub fn apply_security_headers(builder: Builder, anti_leech: &AntiLeechConfig) -> Builder {
    builder
        .header(
            "Access-Control-Allow-Origin",
            anti_leech.allowed_domains.join(", "),
        )
        .header("Access-Control-Allow-Methods", "GET, HEAD, OPTIONS")
        .header("Access-Control-Allow-Headers", "Content-Type, Referer")
        .header("Access-Control-Max-Age", "86400")
        .header("X-Content-Type-Options", "nosniff")
        .header("X-Frame-Options", "DENY")
        .header("X-XSS-Protection", "1; mode=block")
        .header("Referrer-Policy", "strict-origin-when-cross-origin")
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::Full;
    use hyper::body::Bytes;
    use hyper::Response;

    #[test]
    fn test_header_set_applied() {
        let anti_leech = AntiLeechConfig {
            allowed_domains: vec!["a.org".to_string(), "b.org".to_string()],
            allow_empty_referer: false,
        };
        let response = apply_security_headers(Response::builder().status(200), &anti_leech)
            .body(Full::new(Bytes::new()))
            .unwrap();

        let headers = response.headers();
        assert_eq!(headers["Access-Control-Allow-Origin"], "a.org, b.org");
        assert_eq!(headers["X-Frame-Options"], "DENY");
        assert_eq!(headers["X-Content-Type-Options"], "nosniff");
        assert_eq!(
            headers["Referrer-Policy"],
            "strict-origin-when-cross-origin"
        );
    }
}
