//! The request handler
//!
//! Request method, path, headers and body are ignored. Each call writes one
//! batch of log lines and returns the empty `200 OK`.

use crate::calc::CallSite;
use crate::log::{LogSink, StdoutSink};
use crate::response::empty_ok;
use bytes::Bytes;
use http_body_util::Full;
use std::sync::Arc;

/// Static first line of every batch
pub const STARTED_LINE: &str = "server started....";

/// Call sites logged for every request, in order
pub const CALL_SITES: [CallSite; 2] = [
    CallSite::new("1 & 2 - Only CommonJS and only ESM"),
    CallSite::new("3 - CommonJS module in ESM"),
];

/// Lines written for a single request
pub fn request_lines() -> Vec<String> {
    let mut lines = Vec::with_capacity(1 + CALL_SITES.len());
    lines.push(STARTED_LINE.to_string());
    lines.extend(CALL_SITES.iter().map(CallSite::line));
    lines
}

/// Shared per-request handler
#[derive(Clone)]
pub struct RequestHandler {
    sink: Arc<dyn LogSink>,
}

impl RequestHandler {
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self { sink }
    }

    /// Handler writing to stdout
    pub fn stdout() -> Self {
        Self::new(Arc::new(StdoutSink))
    }

    pub fn handle<B>(&self, _req: http::Request<B>) -> http::Response<Full<Bytes>> {
        self.sink.write_lines(&request_lines());
        empty_ok()
    }
}

impl Default for RequestHandler {
    fn default() -> Self {
        Self::stdout()
    }
}
