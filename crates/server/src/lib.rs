//! HTTP surface for veilweb.
//!
//! Thin binding layer over the proxy pipeline: route dispatch, query
//! parameter validation, JSON error bodies, and permissive CORS.

pub mod error;
pub mod routes;
pub mod state;

pub use routes::app;
pub use state::AppState;
