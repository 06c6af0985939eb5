//! Handler abstraction for edgefn functions
//!
//! A handler is a unit of logic bound to one (method, path) pair. Handlers
//! are plain async functions or closures from [`Request`] to [`Response`];
//! the blanket impl below lets them be registered on a
//! [`Router`](crate::Router) directly.

use std::future::Future;
use std::pin::Pin;

use crate::{HandlerError, Request, Response};

/// Type alias for boxed futures returned by handlers
pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

/// A unit of logic bound to one (method, path) pair that produces a response.
pub trait Handler: Send + Sync + 'static {
    fn call(&self, req: Request) -> BoxFuture<Response>;
}

impl<F, Fut> Handler for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    fn call(&self, req: Request) -> BoxFuture<Response> {
        Box::pin((self)(req))
    }
}

/// Wrap a fallible handler so errors become their HTTP responses.
///
/// # Example
/// ```ignore
/// async fn create_user(req: Request) -> Result<Response, HandlerError> {
///     let data: CreateUser = req.json()?;
///     Ok(Response::created(json!({"name": data.name})))
/// }
///
/// let router = Router::builder("/api")
///     .post("/users", fallible(create_user))
///     .build();
/// ```
pub fn fallible<F, Fut>(f: F) -> impl Handler
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response, HandlerError>> + Send + 'static,
{
    move |req: Request| {
        let fut = f(req);
        async move {
            match fut.await {
                Ok(resp) => resp,
                Err(err) => err.to_response(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_closure_is_a_handler() {
        let handler = |_req: Request| async { Response::ok(serde_json::json!({"ok": true})) };
        let resp = handler.call(Request::default()).await;
        assert_eq!(resp.status, 200);
    }

    #[tokio::test]
    async fn test_fallible_maps_errors_to_responses() {
        let handler = fallible(|req: Request| async move {
            let _page: i64 = req.require_query_param("page")?;
            Ok(Response::ok(serde_json::json!({"ok": true})))
        });

        let resp = handler.call(Request::default()).await;
        assert_eq!(resp.status, 400);
    }
}
