//! HTTP response building module
//!
//! Every response carries the security/CORS header set; image responses add
//! a tier-dependent `Cache-Control` lifetime.

use crate::config::AntiLeechConfig;
use crate::logger;
use crate::security::apply_security_headers;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

/// Build 200 image response with a tiered cache lifetime
pub fn build_image_response(
    data: Bytes,
    content_type: &str,
    max_age: u32,
    is_head: bool,
    anti_leech: &AntiLeechConfig,
) -> Response<Full<Bytes>> {
    let content_length = data.len();
    let body = if is_head { Bytes::new() } else { data };

    apply_security_headers(Response::builder().status(200), anti_leech)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length)
        .header("Cache-Control", format!("public, max-age={max_age}"))
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 400 JSON response for an unconfigured category, listing valid keys
pub fn build_invalid_category_response(
    category: &str,
    available: &[String],
    anti_leech: &AntiLeechConfig,
) -> Response<Full<Bytes>> {
    let body = serde_json::json!({
        "error": "Invalid category",
        "message": format!("Category \"{category}\" is not configured"),
        "availableCategories": available,
    });

    apply_security_headers(Response::builder().status(400), anti_leech)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap_or_else(|e| {
            log_build_error("400", &e);
            Response::new(Full::new(Bytes::from("Bad Request")))
        })
}

/// Build 400 plain-text response for a missing required query parameter
pub fn build_missing_parameter_response(
    message: &str,
    anti_leech: &AntiLeechConfig,
) -> Response<Full<Bytes>> {
    apply_security_headers(Response::builder().status(400), anti_leech)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from(message.to_string())))
        .unwrap_or_else(|e| {
            log_build_error("400", &e);
            Response::new(Full::new(Bytes::from("Bad Request")))
        })
}

/// Build 429 Too Many Requests response
pub fn build_rate_limited_response(
    retry_after_secs: u64,
    anti_leech: &AntiLeechConfig,
) -> Response<Full<Bytes>> {
    apply_security_headers(Response::builder().status(429), anti_leech)
        .header("Content-Type", "text/plain")
        .header("Retry-After", retry_after_secs)
        .body(Full::new(Bytes::from("429 Too Many Requests")))
        .unwrap_or_else(|e| {
            log_build_error("429", &e);
            Response::new(Full::new(Bytes::from("Too Many Requests")))
        })
}

/// Build 403 Forbidden response (strict anti-leech rejection)
pub fn build_forbidden_response(anti_leech: &AntiLeechConfig) -> Response<Full<Bytes>> {
    apply_security_headers(Response::builder().status(403), anti_leech)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from("403 Forbidden")))
        .unwrap_or_else(|e| {
            log_build_error("403", &e);
            Response::new(Full::new(Bytes::from("Forbidden")))
        })
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(405)
        .header("Content-Type", "text/plain")
        .header("Allow", "GET, HEAD, OPTIONS")
        .body(Full::new(Bytes::from("405 Method Not Allowed")))
        .unwrap_or_else(|e| {
            log_build_error("405", &e);
            Response::new(Full::new(Bytes::from("405 Method Not Allowed")))
        })
}

/// Build OPTIONS response (CORS preflight)
pub fn build_options_response(anti_leech: &AntiLeechConfig) -> Response<Full<Bytes>> {
    apply_security_headers(Response::builder().status(204), anti_leech)
        .header("Allow", "GET, HEAD, OPTIONS")
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("OPTIONS", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build health check response
pub fn build_health_response(status: &str) -> Response<Full<Bytes>> {
    let body = format!("{{\"status\":\"{status}\"}}");
    Response::builder()
        .status(200)
        .header("Content-Type", "application/json")
        .header("Cache-Control", "no-cache")
        .body(Full::new(Bytes::from(body)))
        .unwrap_or_else(|e| {
            log_build_error("health", &e);
            Response::new(Full::new(Bytes::from("ok")))
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anti_leech() -> AntiLeechConfig {
        AntiLeechConfig {
            allowed_domains: vec!["glow-prow.org.cn".to_string()],
            allow_empty_referer: false,
        }
    }

    #[test]
    fn test_image_response_headers() {
        let response = build_image_response(
            Bytes::from_static(b"img"),
            "image/webp",
            86_400,
            false,
            &anti_leech(),
        );
        assert_eq!(response.status(), 200);
        let headers = response.headers();
        assert_eq!(headers["Content-Type"], "image/webp");
        assert_eq!(headers["Cache-Control"], "public, max-age=86400");
        assert_eq!(headers["Access-Control-Allow-Origin"], "glow-prow.org.cn");
    }

    #[test]
    fn test_head_request_has_empty_body_but_full_length() {
        let response = build_image_response(
            Bytes::from_static(b"12345"),
            "image/png",
            600,
            true,
            &anti_leech(),
        );
        assert_eq!(response.headers()["Content-Length"], "5");
    }

    #[test]
    fn test_invalid_category_body_shape() {
        let response = build_invalid_category_response(
            "bogus",
            &["items".to_string(), "ships".to_string()],
            &anti_leech(),
        );
        assert_eq!(response.status(), 400);
        assert_eq!(response.headers()["Content-Type"], "application/json");
    }

    #[test]
    fn test_rate_limited_response() {
        let response = build_rate_limited_response(42, &anti_leech());
        assert_eq!(response.status(), 429);
        assert_eq!(response.headers()["Retry-After"], "42");
    }

    #[test]
    fn test_options_response() {
        let response = build_options_response(&anti_leech());
        assert_eq!(response.status(), 204);
        assert_eq!(response.headers()["Allow"], "GET, HEAD, OPTIONS");
    }

    #[test]
    fn test_405_response() {
        let response = build_405_response();
        assert_eq!(response.status(), 405);
    }
}
