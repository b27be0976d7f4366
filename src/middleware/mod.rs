//! Middleware layer.
//!
//! Cross-cutting concerns applied by [`Router::dispatch`](crate::Router::dispatch)
//! to every request, whether or not a handler matched:
//!
//! - [`cors`] — permissive CORS headers and bare `OPTIONS` preflight answers
//! - [`trace`] — one structured log line per request with status and latency

pub mod cors;
pub mod trace;
