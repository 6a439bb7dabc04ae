//! veilweb server entry point.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use veilweb_client::{FetchClient, FetchConfig, ProxyService};
use veilweb_core::{AppConfig, ResponseCache};
use veilweb_server::{AppState, app};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = AppConfig::load()?;

    let fetcher = FetchClient::new(FetchConfig { timeout: config.timeout(), ..Default::default() })?;
    let cache = ResponseCache::new(config.cache_ttl());
    let state = AppState::new(ProxyService::new(fetcher, cache));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "veilweb listening");

    axum::serve(listener, app(state)).await?;

    Ok(())
}
