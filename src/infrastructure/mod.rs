//! Infrastructure layer
//!
//! Adapters for the outside world:
//! - Configuration loading (figment)
//! - Logging (tracing, tracing-appender)
//! - HTTP client for the backend settings API (reqwest)

pub mod config;
pub mod http;
pub mod logging;
