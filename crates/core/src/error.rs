//! Unified error types for veilweb.
//!
//! Error display strings double as the client-facing JSON `error` messages,
//! so the wording here is part of the HTTP contract.

/// Unified error types for the veilweb proxy.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required query parameter was absent.
    #[error("Missing {0} parameter")]
    MissingParam(&'static str),

    /// Target URL failed to parse or used an unsupported scheme.
    #[error("Invalid url: {0}")]
    InvalidUrl(String),

    /// Outbound fetch exceeded the request timeout.
    #[error("Request timeout")]
    Timeout,

    /// Outbound fetch failed: DNS, connection, transport, or decompression.
    #[error("{0}")]
    Fetch(String),

    /// Search upstream failed or returned an unusable page.
    #[error("Search failed: {0}")]
    Search(String),
}

impl Error {
    /// Whether the failure is the caller's fault (maps to HTTP 400).
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::MissingParam(_) | Error::InvalidUrl(_))
    }
}
