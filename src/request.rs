//! Incoming HTTP request type.

use std::collections::HashMap;

use bytes::Bytes;
use serde::de::DeserializeOwned;

/// An incoming HTTP request with its body fully read and its path
/// parameters extracted by the router.
pub struct Request {
    path: String,
    body: Bytes,
    params: HashMap<String, String>,
}

impl Request {
    pub(crate) fn new(path: String, body: Bytes, params: HashMap<String, String>) -> Self {
        Self { path, body, params }
    }

    pub fn path(&self) -> &str { &self.path }

    /// Returns a named path parameter, percent-decoded.
    ///
    /// For a route `/recipes/{title}`, `req.param("title")` on
    /// `/recipes/Pasta%20Bake` returns `Some("Pasta Bake")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Deserializes the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}
