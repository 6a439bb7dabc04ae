//! Client code for veilweb.
//!
//! This crate provides the outbound fetch pipeline, the HTML/CSS rewrite
//! engine, the search-result scraper, and the proxy orchestrator that
//! composes them with the response cache.

pub mod fetch;
pub mod proxy;
pub mod rewrite;
pub mod search;

pub use fetch::{FetchClient, FetchConfig, FetchedResource};
pub use proxy::{CacheStatus, ProxyResponse, ProxyService};
pub use rewrite::{Rewritten, rewrite};
pub use search::{SearchResult, parse_results, search};
