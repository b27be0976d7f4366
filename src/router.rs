//! Radix-tree request router.
//!
//! One tree per HTTP method. O(path-length) lookup. Static segments win over
//! parameters, so `/recipes/author/{name}` and `/recipes/{title}` coexist in
//! the same tree without shadowing each other.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use http_body_util::Full;
use matchit::Router as MatchitRouter;

use crate::handler::{BoxedHandler, Handler};
use crate::method::Method;
use crate::middleware::{cors, trace};
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

/// The application router.
///
/// Owns the application state `S` and hands a clone of it to every handler
/// call. Build it once at startup; pass it to [`Server::serve`](crate::Server::serve).
/// Each registration returns `self` so calls chain naturally.
pub struct Router<S> {
    routes: HashMap<Method, MatchitRouter<BoxedHandler<S>>>,
    state: S,
}

impl<S> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn with_state(state: S) -> Self {
        Self { routes: HashMap::new(), state }
    }

    /// Register a handler for a method + path pair. Returns `self` for chaining.
    ///
    /// Path parameters use `{name}` syntax; `req.param("name")` retrieves them.
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid route or conflicts with one already
    /// registered for `method`. Routes are fixed at startup, so this is a
    /// programming error.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler<S>) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{method} {path}`: {e}"));
        self
    }

    pub fn get(self, path: &str, handler: impl Handler<S>) -> Self {
        self.on(Method::Get, path, handler)
    }

    pub fn post(self, path: &str, handler: impl Handler<S>) -> Self {
        self.on(Method::Post, path, handler)
    }

    pub fn delete(self, path: &str, handler: impl Handler<S>) -> Self {
        self.on(Method::Delete, path, handler)
    }

    /// Routes one request and produces one response.
    ///
    /// Never fails: unknown paths become `404`, known paths under another
    /// method become `405` with an `allow` header. `HEAD` falls back to the
    /// `GET` route and drops the body. CORS headers and the access log are
    /// applied here so they cover every outcome.
    pub async fn dispatch(&self, req: http::Request<Bytes>) -> http::Response<Full<Bytes>> {
        let started = Instant::now();
        let (parts, body) = req.into_parts();
        let path = parts.uri.path().to_owned();
        let is_head = parts.method == http::Method::HEAD;

        let response = match Method::try_from(&parts.method) {
            Err(()) => Response::error(Status::MethodNotAllowed, "Method not allowed!"),
            Ok(method) => match self.lookup(method, &path).or_else(|| {
                is_head.then(|| self.lookup(Method::Get, &path)).flatten()
            }) {
                Some((handler, params)) => {
                    let req = Request::new(path.clone(), body, params);
                    handler.call(req, self.state.clone()).await
                }
                None if method == Method::Options => cors::preflight(
                    parts.headers
                        .get("access-control-request-headers")
                        .and_then(|v| v.to_str().ok()),
                ),
                None => self.unmatched(&path),
            },
        };

        let response = cors::apply(response);
        trace::record(&parts.method, &path, response.status_code(), started);
        let response = response.into_inner();
        if is_head {
            response.map(|_| Full::new(Bytes::new()))
        } else {
            response
        }
    }

    pub(crate) fn lookup(
        &self,
        method: Method,
        path: &str,
    ) -> Option<(BoxedHandler<S>, HashMap<String, String>)> {
        let tree = self.routes.get(&method)?;
        let matched = tree.at(path).ok()?;
        let handler = Arc::clone(matched.value);
        let params = matched.params.iter()
            .map(|(k, v)| (k.to_owned(), decode_param(v)))
            .collect();
        Some((handler, params))
    }

    /// Methods with a route matching `path`, in `Method::ALL` order.
    fn allowed_methods(&self, path: &str) -> Vec<Method> {
        Method::ALL
            .into_iter()
            .filter(|m| self.routes.get(m).is_some_and(|tree| tree.at(path).is_ok()))
            .collect()
    }

    fn unmatched(&self, path: &str) -> Response {
        let allowed = self.allowed_methods(path);
        if allowed.is_empty() {
            return Response::error(Status::NotFound, "Route not found!");
        }
        let allow = allowed.iter().map(|m| m.as_str()).collect::<Vec<_>>().join(", ");
        Response::builder()
            .status(Status::MethodNotAllowed)
            .header("allow", &allow)
            .json(&serde_json::json!({ "error": "Method not allowed!" }))
    }
}

/// Percent-decodes a path parameter; invalid UTF-8 keeps the raw segment.
fn decode_param(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| raw.to_owned())
}
