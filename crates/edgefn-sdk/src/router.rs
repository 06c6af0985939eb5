//! Function router
//!
//! Mounts handlers under a function's base path and dispatches requests to
//! them. The router is built once via [`RouterBuilder`] and is immutable
//! afterwards; dispatch is a pure async function over the frozen table.
//!
//! Matching strips the base path first (the bare base path maps to `/`),
//! then walks the routes in registration order and invokes the first entry
//! whose method and pattern both match. Patterns are static segments plus
//! `{name}` parameters; extracted parameters are attached to the request
//! before the handler runs. Requests that match nothing get
//! [`Response::not_found`].

use std::collections::HashMap;

use crate::handler::Handler;
use crate::{Request, Response};

struct Route {
    method: String,
    pattern: String,
    handler: Box<dyn Handler>,
}

/// An immutable dispatch table for one function.
///
/// # Example
/// ```ignore
/// let router = Router::builder("/.netlify/functions/api")
///     .get("/hello", |_req| async { Response::ok(json!({"message": "Hello, world!"})) })
///     .build();
///
/// let resp = router.dispatch(request).await;
/// ```
pub struct Router {
    base_path: String,
    routes: Vec<Route>,
}

impl Router {
    /// Start building a router mounted at `base_path`.
    pub fn builder(base_path: impl Into<String>) -> RouterBuilder {
        RouterBuilder {
            base_path: base_path.into(),
            routes: Vec::new(),
        }
    }

    /// The base path this router is mounted at.
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Number of registered routes.
    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    /// Dispatch a request addressed to this router's base path.
    ///
    /// Dispatch never mutates the table; issuing the same request twice
    /// produces the same handler invocation.
    pub async fn dispatch(&self, mut req: Request) -> Response {
        let Some(suffix) = strip_base(&self.base_path, &req.path) else {
            return Response::not_found();
        };
        let suffix = suffix.to_string();

        for route in &self.routes {
            if !route.method.eq_ignore_ascii_case(&req.method) {
                continue;
            }
            if let Some(params) = match_pattern(&route.pattern, &suffix) {
                req.params = params;
                return route.handler.call(req).await;
            }
        }

        Response::not_found()
    }
}

/// Builder for [`Router`]; consumed by [`build`](RouterBuilder::build).
pub struct RouterBuilder {
    base_path: String,
    routes: Vec<Route>,
}

impl RouterBuilder {
    /// Register a route. Registration order is dispatch order: when two
    /// patterns overlap, the first registered wins.
    pub fn route(mut self, method: &str, pattern: &str, handler: impl Handler) -> Self {
        self.routes.push(Route {
            method: method.to_ascii_uppercase(),
            pattern: pattern.to_string(),
            handler: Box::new(handler),
        });
        self
    }

    /// Register a GET route.
    pub fn get(self, pattern: &str, handler: impl Handler) -> Self {
        self.route("GET", pattern, handler)
    }

    /// Register a POST route.
    pub fn post(self, pattern: &str, handler: impl Handler) -> Self {
        self.route("POST", pattern, handler)
    }

    /// Register a PUT route.
    pub fn put(self, pattern: &str, handler: impl Handler) -> Self {
        self.route("PUT", pattern, handler)
    }

    /// Register a DELETE route.
    pub fn delete(self, pattern: &str, handler: impl Handler) -> Self {
        self.route("DELETE", pattern, handler)
    }

    /// Register a PATCH route.
    pub fn patch(self, pattern: &str, handler: impl Handler) -> Self {
        self.route("PATCH", pattern, handler)
    }

    /// Freeze the table. An empty base path is normalized to `/`.
    pub fn build(self) -> Router {
        let base_path = if self.base_path.is_empty() {
            "/".to_string()
        } else {
            self.base_path
        };
        Router {
            base_path,
            routes: self.routes,
        }
    }
}

/// Strip `base` from `path`, returning the relative suffix.
///
/// The bare base path maps to `/`. Paths outside the base (including
/// same-prefix siblings like `/apix` under base `/api`) return None.
fn strip_base<'a>(base: &str, path: &'a str) -> Option<&'a str> {
    if base == "/" {
        return Some(if path.is_empty() { "/" } else { path });
    }
    let rest = path.strip_prefix(base)?;
    if rest.is_empty() {
        Some("/")
    } else if rest.starts_with('/') {
        Some(rest)
    } else {
        None
    }
}

/// Match a path pattern (e.g., "/pets/{petId}") against a path suffix
/// (e.g., "/pets/42"). Returns extracted path parameters if matched.
fn match_pattern(pattern: &str, path: &str) -> Option<HashMap<String, String>> {
    let pattern_parts: Vec<&str> = pattern.split('/').collect();
    let path_parts: Vec<&str> = path.split('/').collect();

    if pattern_parts.len() != path_parts.len() {
        return None;
    }

    let mut params = HashMap::new();

    for (pattern_part, path_part) in pattern_parts.iter().zip(path_parts.iter()) {
        if pattern_part.starts_with('{') && pattern_part.ends_with('}') {
            let param_name = &pattern_part[1..pattern_part.len() - 1];
            params.insert(param_name.to_string(), path_part.to_string());
        } else if pattern_part != path_part {
            // Static parts must match exactly
            return None;
        }
    }

    Some(params)
}
