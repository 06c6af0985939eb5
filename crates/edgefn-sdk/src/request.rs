//! HTTP Request representation for handlers

use crate::error::HandlerError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

/// An incoming HTTP request, as a function handler sees it.
///
/// A `Request` exists only for the duration of one invocation. The `path` is
/// the effective path after any edge rewrite, so a handler mounted behind a
/// short public path always observes the internal one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    /// HTTP method (GET, POST, PUT, DELETE, etc.)
    pub method: String,

    /// Effective request path (e.g., "/.netlify/functions/api/hello")
    pub path: String,

    /// Query parameters
    #[serde(default)]
    pub query: HashMap<String, String>,

    /// HTTP headers
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Request body
    #[serde(default)]
    pub body: Option<String>,

    /// Path parameters captured by the matched route pattern
    #[serde(default)]
    pub params: HashMap<String, String>,

    /// Client IP address
    #[serde(default)]
    pub client_ip: Option<String>,

    /// Request ID for tracing
    #[serde(default)]
    pub request_id: String,
}

impl Request {
    /// Deserialize the body as JSON.
    ///
    /// An absent body deserializes as JSON `null`, so handlers taking an
    /// `Option<T>` payload can accept empty requests.
    ///
    /// ```ignore
    /// #[derive(Deserialize)]
    /// struct NewPet { name: String }
    ///
    /// let pet: NewPet = req.json()?;
    /// ```
    pub fn json<T: for<'de> Deserialize<'de>>(&self) -> Result<T, HandlerError> {
        let raw = self.body.as_deref().unwrap_or("null");
        serde_json::from_str(raw)
            .map_err(|e| HandlerError::BadRequest(format!("invalid JSON body: {e}")))
    }

    /// Look up a query parameter.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    /// Look up a query parameter and parse it, `None` when absent or
    /// unparseable.
    ///
    /// ```ignore
    /// let page: u32 = req.query_param_as("page").unwrap_or(1);
    /// ```
    pub fn query_param_as<T: FromStr>(&self, name: &str) -> Option<T> {
        self.query_param(name)?.parse().ok()
    }

    /// Parse a query parameter the handler cannot do without.
    pub fn require_query_param<T: FromStr>(&self, name: &str) -> Result<T, HandlerError> {
        match self.query_param(name) {
            Some(raw) => raw.parse().map_err(|_| {
                HandlerError::BadRequest(format!("query parameter `{name}` has an invalid value"))
            }),
            None => Err(HandlerError::BadRequest(format!(
                "query parameter `{name}` is required"
            ))),
        }
    }

    /// Look up a path parameter captured by the route pattern.
    ///
    /// ```ignore
    /// // Route: /pets/{petId}, request: /pets/42
    /// let id = req.path_param("petId"); // Some("42")
    /// ```
    pub fn path_param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Look up a path parameter and parse it, `None` when absent or
    /// unparseable.
    pub fn path_param_as<T: FromStr>(&self, name: &str) -> Option<T> {
        self.path_param(name)?.parse().ok()
    }

    /// Parse a path parameter the handler cannot do without.
    pub fn require_path_param<T: FromStr>(&self, name: &str) -> Result<T, HandlerError> {
        match self.path_param(name) {
            Some(raw) => raw.parse().map_err(|_| {
                HandlerError::BadRequest(format!("path parameter `{name}` has an invalid value"))
            }),
            None => Err(HandlerError::BadRequest(format!(
                "path parameter `{name}` is required"
            ))),
        }
    }

    /// Look up a header. Names compare case-insensitively, values come back
    /// as sent.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Whether the request method matches, ignoring case.
    pub fn is_method(&self, method: &str) -> bool {
        self.method.eq_ignore_ascii_case(method)
    }

    /// Whether the request declares a JSON content type.
    pub fn is_json(&self) -> bool {
        self.header("content-type")
            .is_some_and(|ct| ct.contains("application/json"))
    }
}

impl Default for Request {
    fn default() -> Self {
        Self {
            method: "GET".to_string(),
            path: "/".to_string(),
            query: HashMap::new(),
            headers: HashMap::new(),
            body: None,
            params: HashMap::new(),
            client_ip: None,
            request_id: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_body_parsing() {
        #[derive(Deserialize)]
        struct Input {
            name: String,
        }

        let req = Request {
            body: Some(r#"{"name":"test"}"#.to_string()),
            ..Request::default()
        };
        let input: Input = req.json().unwrap();
        assert_eq!(input.name, "test");

        let bad = Request {
            body: Some("not json".to_string()),
            ..Request::default()
        };
        assert!(bad.json::<Input>().is_err());
    }

    #[test]
    fn test_absent_body_reads_as_null() {
        let req = Request::default();
        let value: Option<i64> = req.json().unwrap();
        assert_eq!(value, None);
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let mut req = Request::default();
        req.headers
            .insert("Content-Type".to_string(), "application/json".to_string());

        assert_eq!(req.header("content-type"), Some("application/json"));
        assert_eq!(req.header("CONTENT-TYPE"), Some("application/json"));
        assert!(req.is_json());
    }

    #[test]
    fn test_query_param_parsing() {
        let mut req = Request::default();
        req.query.insert("page".to_string(), "3".to_string());
        req.query.insert("bad".to_string(), "abc".to_string());

        assert_eq!(req.query_param("page"), Some("3"));
        assert_eq!(req.query_param_as::<i64>("page"), Some(3));
        assert_eq!(req.query_param_as::<i64>("bad"), None);
        assert_eq!(req.query_param_as::<i64>("missing"), None);
        assert!(req.require_query_param::<i64>("bad").is_err());
        assert!(req.require_query_param::<i64>("missing").is_err());
    }

    #[test]
    fn test_path_param_parsing() {
        let mut req = Request::default();
        req.params.insert("petId".to_string(), "42".to_string());

        assert_eq!(req.path_param("petId"), Some("42"));
        assert_eq!(req.path_param_as::<i64>("petId"), Some(42));
        assert_eq!(req.require_path_param::<i64>("petId").unwrap(), 42);
        assert!(req.require_path_param::<i64>("other").is_err());
    }

    #[test]
    fn test_is_method() {
        let req = Request::default();
        assert!(req.is_method("get"));
        assert!(req.is_method("GET"));
        assert!(!req.is_method("POST"));
    }
}
