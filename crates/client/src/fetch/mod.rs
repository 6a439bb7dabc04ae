//! Outbound HTTP fetch with browser-like request identity.
//!
//! Each fetch sends a single GET with a User-Agent drawn uniformly at
//! random from a small fixed pool, plus the ordinary navigation headers a
//! browser would send. Compressed bodies (`gzip`, `deflate`, `br`) are
//! decompressed transparently by reqwest before the bytes reach the
//! caller; a decompression failure surfaces as a fetch error, never as
//! compressed passthrough.

use std::time::{Duration, Instant};

use bytes::Bytes;
use rand::seq::IndexedRandom;
use reqwest::{Client, Url, header};

use veilweb_core::Error;

/// Fixed pool of browser User-Agent strings, rotated per request.
pub const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
];

/// Configuration for the fetch client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Request timeout (default: 30s).
    pub timeout: Duration,

    /// User-Agent pool to rotate through (default: [`USER_AGENTS`]).
    pub user_agents: Vec<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(30_000),
            user_agents: USER_AGENTS.iter().map(|ua| ua.to_string()).collect(),
        }
    }
}

/// A fetched upstream resource, decompressed, with its declared metadata.
///
/// Upstreams that declare no Content-Type default to `text/html`, matching
/// how documents without headers are treated downstream.
#[derive(Debug, Clone)]
pub struct FetchedResource {
    /// Decompressed body bytes.
    pub bytes: Bytes,
    /// Declared content type, defaulted to `text/html` when absent.
    pub content_type: String,
    /// Upstream response headers.
    pub headers: header::HeaderMap,
}

/// HTTP fetch client. Holds no per-request state.
pub struct FetchClient {
    http: Client,
    config: FetchConfig,
}

impl FetchClient {
    /// Create a new fetch client with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .timeout(config.timeout)
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::Fetch(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, config })
    }

    /// Fetch an absolute URL, returning decompressed bytes and metadata.
    ///
    /// The response status is not gated: an upstream error page is
    /// returned like any other body. Transport errors and the timeout are
    /// the only failure paths.
    pub async fn fetch(&self, url: &Url) -> Result<FetchedResource, Error> {
        let start = Instant::now();

        let response = self
            .http
            .get(url.as_str())
            .header(header::USER_AGENT, self.random_user_agent())
            .header(header::ACCEPT, "*/*")
            .header(header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .header(header::DNT, "1")
            .header("Upgrade-Insecure-Requests", "1")
            .header("Sec-Fetch-Dest", "document")
            .header("Sec-Fetch-Mode", "navigate")
            .header("Sec-Fetch-Site", "none")
            .send()
            .await
            .map_err(map_transport_error)?;

        let headers = response.headers().clone();
        let content_type = headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string())
            .unwrap_or_else(|| "text/html".to_string());

        let bytes = response.bytes().await.map_err(map_transport_error)?;

        tracing::debug!(
            url = %url,
            bytes = bytes.len(),
            content_type,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "fetched"
        );

        Ok(FetchedResource { bytes, content_type, headers })
    }

    fn random_user_agent(&self) -> &str {
        self.config
            .user_agents
            .choose(&mut rand::rng())
            .map(String::as_str)
            .unwrap_or(USER_AGENTS[0])
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }
}

fn map_transport_error(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::Timeout
    } else {
        Error::Fetch(format!("fetch failed: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_config_default() {
        let config = FetchConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.user_agents.len(), 3);
    }

    #[test]
    fn test_random_user_agent_from_pool() {
        let client = FetchClient::new(FetchConfig::default()).unwrap();
        for _ in 0..20 {
            let ua = client.random_user_agent();
            assert!(USER_AGENTS.contains(&ua));
        }
    }

    #[test]
    fn test_random_user_agent_single_entry_pool() {
        let config = FetchConfig { user_agents: vec!["test-agent/1.0".into()], ..Default::default() };
        let client = FetchClient::new(config).unwrap();
        assert_eq!(client.random_user_agent(), "test-agent/1.0");
    }

    #[tokio::test]
    async fn test_fetch_client_new() {
        let client = FetchClient::new(FetchConfig::default());
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        // Bind an ephemeral port and release it so the connect is refused.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = FetchClient::new(FetchConfig::default()).unwrap();
        let url = Url::parse(&format!("http://{addr}/")).unwrap();
        let err = client.fetch(&url).await.unwrap_err();
        assert!(matches!(err, Error::Fetch(_)));
    }
}
