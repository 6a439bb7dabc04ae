//! Route handlers and router assembly.

use axum::Router;
use axum::extract::{Query, State};
use axum::http::{HeaderName, HeaderValue, header};
use axum::response::{Html, IntoResponse, Json, Response};
use axum::routing::get;
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;

use veilweb_client::SearchResult;
use veilweb_core::Error;

use crate::error::ApiError;
use crate::state::AppState;

/// Static single-page UI: search box, result list, iframe browser view.
const INDEX_HTML: &str = include_str!("../assets/index.html");

const X_PROXY_CACHE: HeaderName = HeaderName::from_static("x-proxy-cache");

/// Build the application router with CORS and security headers applied.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    Router::new()
        .route("/", get(index))
        .route("/index.html", get(index))
        .route("/api/proxy", get(proxy))
        .route("/api/search", get(search))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(cors)
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

#[derive(Debug, Deserialize)]
struct ProxyParams {
    url: Option<String>,
}

/// `GET /api/proxy?url=<absolute URL>`
///
/// Serves the rewritten resource with an `X-Proxy-Cache: HIT|MISS` marker.
async fn proxy(State(state): State<AppState>, Query(params): Query<ProxyParams>) -> Result<Response, ApiError> {
    let target = params.url.ok_or(Error::MissingParam("url"))?;

    let response = state.proxy.handle(&target).await?;

    let headers = [
        (header::CONTENT_TYPE, response.content_type),
        (header::CACHE_CONTROL, "public, max-age=300".to_string()),
        (X_PROXY_CACHE, response.cache_status.as_str().to_string()),
    ];

    Ok((headers, response.bytes).into_response())
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    q: Option<String>,
}

#[derive(Debug, Serialize)]
struct SearchResponse {
    results: Vec<SearchResult>,
}

/// `GET /api/search?q=<query>`
async fn search(
    State(state): State<AppState>, Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let query = params.q.filter(|q| !q.is_empty()).ok_or(Error::MissingParam("q"))?;

    tracing::info!(query = %query, "search request");
    let results = veilweb_client::search(state.proxy.fetcher(), &query).await?;

    Ok(Json(SearchResponse { results }))
}
