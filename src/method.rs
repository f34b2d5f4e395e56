//! HTTP verb handling for route registration.
//!
//! Routes only ever carry one of the verbs in [`SUPPORTED_METHODS`]. Tokens are
//! accepted in any case and normalized to the uppercase `http::Method` form.

use http::Method;

/// The closed set of verbs a route may be registered under
pub const SUPPORTED_METHODS: [Method; 9] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::PATCH,
    Method::HEAD,
    Method::OPTIONS,
    Method::TRACE,
    Method::CONNECT,
];

/// Parse a verb token such as `get` or `POST`
///
/// Returns `None` for anything outside [`SUPPORTED_METHODS`].
#[must_use]
pub fn parse_method(token: &str) -> Option<Method> {
    let upper = token.trim().to_ascii_uppercase();
    SUPPORTED_METHODS
        .iter()
        .find(|m| m.as_str() == upper)
        .cloned()
}

/// Split a `"METHOD /path"` token into the verb and the optional embedded path
///
/// Only the first two whitespace-separated parts are considered, matching the
/// `"GET /users"` registration shorthand.
#[must_use]
pub fn split_method_token(token: &str) -> (&str, Option<&str>) {
    let mut parts = token.split_whitespace();
    let verb = parts.next().unwrap_or("");
    (verb, parts.next())
}
