//! Permissive CORS.
//!
//! Browsers calling the API from another origin get `*` for every response.
//! An `OPTIONS` request for which no route is registered is answered here as
//! a preflight.

use crate::{Response, Status};

const ALLOW_ORIGIN: &str = "access-control-allow-origin";
const ALLOW_METHODS: &str = "access-control-allow-methods";
const ALLOW_HEADERS: &str = "access-control-allow-headers";

const ALLOWED_METHODS: &str = "GET,HEAD,PUT,PATCH,POST,DELETE";

/// Adds `access-control-allow-origin: *` unless the handler set its own.
pub fn apply(mut response: Response) -> Response {
    response.set_default_header(ALLOW_ORIGIN, "*");
    response
}

/// `204 No Content` preflight answer.
///
/// Echoes `access-control-request-headers` back as the allowed headers, the
/// same way the common Node `cors` middleware does.
pub fn preflight(requested_headers: Option<&str>) -> Response {
    let mut builder = Response::builder()
        .status(Status::NoContent)
        .header(ALLOW_METHODS, ALLOWED_METHODS);
    if let Some(headers) = requested_headers {
        builder = builder.header(ALLOW_HEADERS, headers).header("vary", "access-control-request-headers");
    }
    builder.no_body()
}
