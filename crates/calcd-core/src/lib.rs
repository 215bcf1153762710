//! calcd-core: a single-handler HTTP listener
//!
//! Every request, whatever its method, path or body, runs the same handler:
//! it logs the result of `calc(1, 2)` to stdout and completes with an empty
//! `200 OK`.
//!
//! ## Modules
//! - `calc` - the addition helper
//! - `handler` - per-request log lines and response
//! - `server` - socket setup, accept loop, connection tracking

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod calc;
pub mod config;
pub mod error;
pub mod handler;
pub mod log;
pub mod response;
pub mod server;

// Re-exports
pub use calc::{calc, CallSite, LHS, RHS};
pub use config::ServerConfig;
pub use error::{Error, Result};
pub use handler::RequestHandler;
pub use log::{write_batch, LogSink, MemorySink, StdoutSink};
pub use response::empty_ok;
pub use server::{create_listener_socket, ConnectionGuard, ConnectionTracker, Server};
