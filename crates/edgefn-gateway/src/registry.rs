//! Function registry
//!
//! The platform-side map from function name to that function's router.
//! The registry is built once at startup and is immutable afterwards;
//! each function's base path is derived from the manifest's functions
//! prefix plus the function name, so the mount path is configuration,
//! not code.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use edgefn_sdk::{Request, Response, Router, RouterBuilder};

/// Errors from invoking a function through the registry
#[derive(Debug, Error)]
pub enum InvokeError {
    /// No function is registered under this name. The gateway answers the
    /// platform's plain 404, distinct from a router's JSON 404.
    #[error("Function not found: {0}")]
    NotFound(String),

    /// The invocation did not produce a response within the platform
    /// timeout. The gateway aborts it and answers 504; the handler gets
    /// no recovery hook.
    #[error("Function '{name}' timed out after {timeout:?}")]
    Timeout { name: String, timeout: Duration },
}

/// Immutable name -> router map for all registered functions
pub struct FunctionRegistry {
    prefix: String,
    functions: HashMap<String, Arc<Router>>,
}

impl FunctionRegistry {
    /// Start building a registry whose functions mount under `prefix`
    pub fn builder(prefix: impl Into<String>) -> FunctionRegistryBuilder {
        let mut prefix = prefix.into();
        while prefix.len() > 1 && prefix.ends_with('/') {
            prefix.pop();
        }
        FunctionRegistryBuilder {
            prefix,
            functions: HashMap::new(),
        }
    }

    /// The functions mount prefix
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Number of registered functions
    pub fn count(&self) -> usize {
        self.functions.len()
    }

    /// Get a function's router by name
    pub fn get(&self, name: &str) -> Option<&Arc<Router>> {
        self.functions.get(name)
    }

    /// Extract the function name a path addresses, if the path lies under
    /// the functions prefix.
    ///
    /// The name is the first segment after the prefix; it is returned
    /// whether or not a function is registered under it, so the caller can
    /// distinguish "not a function path" (static layer) from "unknown
    /// function" ([`InvokeError::NotFound`]).
    pub fn function_name_for<'a>(&self, path: &'a str) -> Option<&'a str> {
        let rest = path.strip_prefix(&self.prefix)?;
        let rest = rest.strip_prefix('/')?;
        let name = rest.split('/').next().unwrap_or("");
        if name.is_empty() {
            None
        } else {
            Some(name)
        }
    }

    /// Invoke a function by name.
    ///
    /// The handler future is awaited to completion before the response is
    /// returned; work not finished when the timeout fires is aborted, not
    /// resumed later.
    pub async fn invoke(
        &self,
        name: &str,
        request: Request,
        timeout: Duration,
    ) -> Result<Response, InvokeError> {
        let router = self
            .functions
            .get(name)
            .ok_or_else(|| InvokeError::NotFound(name.to_string()))?;

        match tokio::time::timeout(timeout, router.dispatch(request)).await {
            Ok(response) => Ok(response),
            Err(_) => Err(InvokeError::Timeout {
                name: name.to_string(),
                timeout,
            }),
        }
    }
}

/// Builder for [`FunctionRegistry`]; consumed by
/// [`build`](FunctionRegistryBuilder::build).
pub struct FunctionRegistryBuilder {
    prefix: String,
    functions: HashMap<String, Arc<Router>>,
}

impl FunctionRegistryBuilder {
    /// Register a function. Its router is mounted at `<prefix>/<name>`;
    /// `routes` receives the pre-mounted builder and registers the
    /// function's routes on it.
    pub fn function<F>(mut self, name: &str, routes: F) -> Self
    where
        F: FnOnce(RouterBuilder) -> RouterBuilder,
    {
        let base_path = format!("{}/{}", self.prefix, name);
        let router = routes(Router::builder(base_path)).build();
        self.functions.insert(name.to_string(), Arc::new(router));
        self
    }

    /// Freeze the registry
    pub fn build(self) -> FunctionRegistry {
        FunctionRegistry {
            prefix: self.prefix,
            functions: self.functions,
        }
    }
}
