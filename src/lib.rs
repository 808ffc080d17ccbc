//! Labor Law Assistant API
//!
//! HTTP service skeleton for a Taiwan labor law query assistant. Currently it
//! serves a liveness endpoint and loads validated settings from the
//! environment.

pub mod config;
pub mod error;
pub mod http;
pub mod logging;
pub mod middleware;
pub mod routes;

pub use config::{ConfigError, Settings};
pub use error::AppError;
