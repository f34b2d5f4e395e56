use std::sync::Arc;

use http::Method;
use serde_json::{json, Value};
use smallvec::SmallVec;

use crate::ids::RequestId;
use crate::path::{param, ParamVec};
use crate::router::Route;

/// Maximum inline response headers before heap allocation
pub const MAX_INLINE_HEADERS: usize = 16;

/// Response header storage, stack-allocated for ≤16 headers
pub type HeaderVec = SmallVec<[(Arc<str>, String); MAX_INLINE_HEADERS]>;

/// Per-request state threaded through a handler chain
///
/// The dispatcher writes [`route`](Context::route) and
/// [`params`](Context::params) on a match and leaves both untouched when
/// nothing matches. Everything else belongs to the handlers.
#[derive(Debug, Clone)]
pub struct Context {
    /// Correlation id for logs
    pub request_id: RequestId,
    /// Request method
    pub method: Method,
    /// Request path, without query string
    pub path: String,
    /// Path parameters of the matched route
    pub params: ParamVec,
    /// The route whose chain is running, if any
    pub route: Option<Route>,
    /// Response status (404 until a handler sets it)
    pub status: u16,
    /// Response headers
    pub headers: HeaderVec,
    /// Response body
    pub body: Value,
}

impl Context {
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        let path: String = path.into();
        let path = match path.split_once('?') {
            Some((p, _query)) => p.to_string(),
            None => path,
        };
        Self {
            request_id: RequestId::new(),
            method,
            path,
            params: ParamVec::new(),
            route: None,
            status: 404,
            headers: HeaderVec::new(),
            body: Value::Null,
        }
    }

    /// Get a path parameter by name ("last write wins")
    #[inline]
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        param(&self.params, name)
    }

    /// Get a response header by name (case-insensitive)
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Add or replace a response header
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((Arc::from(name), value.into()));
    }

    /// Set status and body in one go
    pub fn respond(&mut self, status: u16, body: impl Into<Value>) {
        self.status = status;
        self.body = body.into();
    }

    /// Body as text, when it is a JSON string
    #[must_use]
    pub fn body_text(&self) -> Option<&str> {
        self.body.as_str()
    }

    /// JSON view of the request outcome, used by the CLI
    #[must_use]
    pub fn summary(&self) -> Value {
        let params: serde_json::Map<String, Value> = self
            .params
            .iter()
            .map(|(k, v)| (k.to_string(), Value::String(v.clone())))
            .collect();
        let route = self.route.as_ref().map(|r| {
            json!({
                "method": r.method().as_str(),
                "prefix": r.prefix(),
                "route": r.route(),
                "path": r.path(),
            })
        });
        json!({
            "request_id": self.request_id,
            "method": self.method.as_str(),
            "path": self.path,
            "route": route,
            "params": params,
            "status": self.status,
            "body": self.body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_strips_query() {
        let ctx = Context::new(Method::GET, "/users?limit=10");
        assert_eq!(ctx.path, "/users");
        assert_eq!(ctx.status, 404);
        assert!(ctx.route.is_none());
    }

    #[test]
    fn test_headers_case_insensitive_replace() {
        let mut ctx = Context::new(Method::GET, "/");
        ctx.set_header("Content-Type", "text/plain");
        ctx.set_header("content-type", "application/json");
        assert_eq!(ctx.headers.len(), 1);
        assert_eq!(ctx.get_header("CONTENT-TYPE"), Some("application/json"));
    }

    #[test]
    fn test_summary_without_route() {
        let mut ctx = Context::new(Method::POST, "/nope");
        ctx.respond(201, "made");
        let summary = ctx.summary();
        assert_eq!(summary["status"], 201);
        assert_eq!(summary["body"], "made");
        assert!(summary["route"].is_null());
    }
}
