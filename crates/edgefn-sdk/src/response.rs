//! HTTP Response representation for handlers

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An outgoing HTTP response.
///
/// A `Response` exists only for the duration of one invocation; the gateway
/// turns it into a wire response and drops it. Constructors cover the common
/// cases:
///
/// | Constructor | Status | Body |
/// |-------------|--------|------|
/// | `ok(value)` | 200 | JSON |
/// | `created(value)` | 201 | JSON |
/// | `no_content()` | 204 | none |
/// | `redirect(status, to)` | 3xx | none, `Location` header |
/// | `bad_request(msg)` | 400 | `{"error": msg}` |
/// | `not_found()` | 404 | `{"error":"Not Found"}` |
/// | `internal_error(msg)` | 500 | `{"error": msg}` |
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    /// HTTP status code
    pub status: u16,

    /// Response headers
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Response body
    #[serde(default)]
    pub body: Option<String>,
}

impl Response {
    /// A bare response with the given status and no body.
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: None,
        }
    }

    fn with_content(status: u16, content_type: &str, body: String) -> Self {
        Self::new(status)
            .with_header("Content-Type", content_type)
            .with_body(body)
    }

    /// A 200 OK response with a JSON body.
    ///
    /// ```ignore
    /// Response::ok(json!({"message": "Hello, world!"}))
    /// ```
    pub fn ok<T: Serialize>(value: T) -> Self {
        Self::json(200, value)
    }

    /// A JSON response with an arbitrary status code.
    ///
    /// The body is compact JSON (no whitespace), so handlers emitting the
    /// same value always emit the same bytes.
    pub fn json<T: Serialize>(status: u16, value: T) -> Self {
        let mut response = Self::new(status).with_header("Content-Type", "application/json");
        response.body = serde_json::to_string(&value).ok();
        response
    }

    /// A plain text response.
    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self::with_content(status, "text/plain; charset=utf-8", body.into())
    }

    /// An HTML response.
    pub fn html(status: u16, body: impl Into<String>) -> Self {
        Self::with_content(status, "text/html; charset=utf-8", body.into())
    }

    /// A 201 Created response with a JSON body.
    pub fn created<T: Serialize>(value: T) -> Self {
        Self::json(201, value)
    }

    /// A 204 No Content response.
    pub fn no_content() -> Self {
        Self::new(204)
    }

    /// The router's 404: a JSON error body, distinguishable from the
    /// platform's plain-text one.
    pub fn not_found() -> Self {
        Self::json(404, serde_json::json!({"error": "Not Found"}))
    }

    /// A 400 Bad Request response with a JSON error body.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::json(400, serde_json::json!({"error": message.into()}))
    }

    /// A 500 Internal Server Error response with a JSON error body.
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::json(500, serde_json::json!({"error": message.into()}))
    }

    /// A redirect answering with `Location` and the given 3xx status.
    ///
    /// ```ignore
    /// Response::redirect(301, "/moved-here")
    /// ```
    pub fn redirect(status: u16, location: impl Into<String>) -> Self {
        Self::new(status).with_header("Location", location)
    }

    /// Add a header (builder pattern). Setting a header twice keeps the
    /// later value.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Replace the body (builder pattern).
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new(200)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_body_is_compact() {
        let resp = Response::ok(serde_json::json!({"message": "Hello, world!"}));
        assert_eq!(resp.status, 200);
        assert_eq!(resp.body.as_deref(), Some(r#"{"message":"Hello, world!"}"#));
        assert_eq!(
            resp.headers.get("Content-Type").map(String::as_str),
            Some("application/json")
        );
    }

    #[test]
    fn test_not_found_shape() {
        let resp = Response::not_found();
        assert_eq!(resp.status, 404);
        assert_eq!(resp.body.as_deref(), Some(r#"{"error":"Not Found"}"#));
    }

    #[test]
    fn test_no_content_has_no_body() {
        let resp = Response::no_content();
        assert_eq!(resp.status, 204);
        assert!(resp.body.is_none());
        assert!(resp.headers.is_empty());
    }

    #[test]
    fn test_redirect_sets_location() {
        let resp = Response::redirect(301, "/new-path");
        assert_eq!(resp.status, 301);
        assert_eq!(
            resp.headers.get("Location").map(String::as_str),
            Some("/new-path")
        );
        assert!(resp.body.is_none());
    }

    #[test]
    fn test_with_header_overrides() {
        let resp = Response::text(200, "hi").with_header("Content-Type", "text/csv");
        assert_eq!(
            resp.headers.get("Content-Type").map(String::as_str),
            Some("text/csv")
        );
        assert_eq!(resp.body.as_deref(), Some("hi"));
    }
}
