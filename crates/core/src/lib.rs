//! Core types and shared functionality for veilweb.
//!
//! This crate provides:
//! - In-memory TTL response cache
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{CachedResponse, Clock, ResponseCache, SystemClock};
pub use config::AppConfig;
pub use error::Error;
