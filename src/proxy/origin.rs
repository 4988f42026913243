//! Origin access
//!
//! The resolver talks to an image source through the `ImageOrigin` trait so
//! the resolution logic can be exercised without a network.

use crate::logger;
use async_trait::async_trait;
use hyper::body::Bytes;
use std::time::Duration;

/// Image bytes fetched from an origin
pub struct FetchedImage {
    pub bytes: Bytes,
    /// Content type as reported by the origin, if any
    pub content_type: Option<String>,
}

/// A source of images addressed by absolute path.
///
/// `None` covers transport errors and non-success statuses alike: a failed
/// candidate must never stop evaluation of the rest of the chain.
#[async_trait]
pub trait ImageOrigin: Send + Sync {
    async fn fetch(&self, path: &str) -> Option<FetchedImage>;
}

/// Origin backed by an upstream HTTP server
pub struct HttpOrigin {
    client: reqwest::Client,
    base_url: String,
}

impl HttpOrigin {
    /// Build a client against `base_url` with a per-request timeout to bound
    /// tail latency when many candidates miss.
    pub fn new(base_url: &str, fetch_timeout_secs: u64) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(fetch_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl ImageOrigin for HttpOrigin {
    async fn fetch(&self, path: &str) -> Option<FetchedImage> {
        let url = format!("{}{}", self.base_url, path);
        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                logger::log_candidate_error(path, &e);
                return None;
            }
        };

        if !response.status().is_success() {
            return None;
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string);

        match response.bytes().await {
            Ok(bytes) => Some(FetchedImage {
                bytes,
                content_type,
            }),
            Err(e) => {
                logger::log_candidate_error(path, &e);
                None
            }
        }
    }
}
