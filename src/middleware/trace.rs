//! Per-request access log.

use std::time::Instant;

use tracing::info;

use crate::Status;

/// Emits one `info` event for a finished request.
pub fn record(method: &http::Method, path: &str, status: Status, started: Instant) {
    info!(
        method = %method,
        path,
        status = status.as_u16(),
        latency_ms = started.elapsed().as_millis() as u64,
        "request"
    );
}
