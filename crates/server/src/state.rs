//! Shared application state.

use std::sync::Arc;

use veilweb_client::ProxyService;

/// Process-root state handed to every request handler.
///
/// The proxy service (and the cache inside it) is constructed once at
/// startup and shared; there is no other cross-request state.
#[derive(Clone)]
pub struct AppState {
    pub proxy: Arc<ProxyService>,
}

impl AppState {
    pub fn new(proxy: ProxyService) -> Self {
        Self { proxy: Arc::new(proxy) }
    }
}
