//! Built-in functions for the shipped template site
//!
//! Functions are registered once at startup and frozen; each one's router
//! is mounted at the manifest's functions prefix plus the function name.

use edgefn_sdk::prelude::*;

use crate::registry::FunctionRegistryBuilder;

/// Register the template's functions.
///
/// The template ships a single function, `api`, with one sample route.
pub fn register(builder: FunctionRegistryBuilder) -> FunctionRegistryBuilder {
    builder.function("api", |routes| routes.get("/hello", hello))
}

/// `GET /hello` - always succeeds, no parameters, no side effects
async fn hello(_req: Request) -> Response {
    Response::ok(json!({"message": "Hello, world!"}))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::FunctionRegistry;
    use std::time::Duration;

    #[tokio::test]
    async fn test_hello_route() {
        let registry = register(FunctionRegistry::builder("/.netlify/functions")).build();
        assert_eq!(registry.count(), 1);

        let request = Request {
            method: "GET".to_string(),
            path: "/.netlify/functions/api/hello".to_string(),
            ..Request::default()
        };

        let response = registry
            .invoke("api", request, Duration::from_secs(1))
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(
            response.headers.get("Content-Type").map(String::as_str),
            Some("application/json")
        );
        assert_eq!(response.body.as_deref(), Some(r#"{"message":"Hello, world!"}"#));
    }
}
