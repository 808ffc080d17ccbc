//! HTTP server module.
//!
//! Serves the router over plain HTTP. TLS is expected to terminate at a
//! load balancer or reverse proxy in front of the service.
//!
//! The server includes:
//! - Fail-fast bind on the configured address
//! - Graceful shutdown on SIGTERM/SIGINT

mod server;
mod shutdown;

pub use server::{start_server, ServerError};
