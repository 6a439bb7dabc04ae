//! Proxy orchestration: resolve target -> cache -> fetch -> rewrite -> cache.
//!
//! The cache is the only shared state; each request flows through
//! independently with the outbound fetch as its single suspension point.
//! Concurrent misses for the same key are not de-duplicated: each fetches
//! and rewrites on its own and the last write wins. That is an accepted
//! property of this design, pinned by tests rather than enforced away.

use bytes::Bytes;
use reqwest::Url;

use veilweb_core::{Error, ResponseCache};

use crate::fetch::FetchClient;
use crate::rewrite;

/// Whether a proxy response was served from cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Miss,
}

impl CacheStatus {
    /// Header value for `X-Proxy-Cache`.
    pub fn as_str(self) -> &'static str {
        match self {
            CacheStatus::Hit => "HIT",
            CacheStatus::Miss => "MISS",
        }
    }
}

/// A completed proxy response.
#[derive(Debug, Clone)]
pub struct ProxyResponse {
    pub bytes: Bytes,
    pub content_type: String,
    pub cache_status: CacheStatus,
}

/// Composes the fetcher, rewrite engine, and response cache.
pub struct ProxyService {
    fetcher: FetchClient,
    cache: ResponseCache,
}

impl ProxyService {
    /// Create a service owning its fetcher and cache.
    pub fn new(fetcher: FetchClient, cache: ResponseCache) -> Self {
        Self { fetcher, cache }
    }

    /// Serve one target URL through the proxy pipeline.
    ///
    /// The cache key is the exact `target` string as received; the URL is
    /// parsed only to validate it and to anchor the rewrite step.
    pub async fn handle(&self, target: &str) -> Result<ProxyResponse, Error> {
        let url = Url::parse(target).map_err(|e| Error::InvalidUrl(format!("{target}: {e}")))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(Error::InvalidUrl(format!("unsupported scheme: {}", url.scheme())));
        }

        if let Some(cached) = self.cache.get(target) {
            tracing::info!(url = %target, "proxy cache hit");
            return Ok(ProxyResponse {
                bytes: cached.bytes,
                content_type: cached.content_type,
                cache_status: CacheStatus::Hit,
            });
        }

        tracing::info!(url = %target, "proxy cache miss, fetching");
        let fetched = self.fetcher.fetch(&url).await?;
        let rewritten = rewrite::rewrite(&fetched.bytes, Some(&fetched.content_type), &url);

        self.cache
            .put(target, rewritten.bytes.clone(), rewritten.content_type.clone());

        Ok(ProxyResponse {
            bytes: rewritten.bytes,
            content_type: rewritten.content_type,
            cache_status: CacheStatus::Miss,
        })
    }

    /// The fetch client, shared with the search path.
    pub fn fetcher(&self) -> &FetchClient {
        &self.fetcher
    }
}
