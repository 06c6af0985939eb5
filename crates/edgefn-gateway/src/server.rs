//! Gateway server - the edge pipeline for every incoming request
//!
//! A single fallback handler implements the platform pipeline: evaluate
//! the redirect table, resolve the functions prefix, invoke the matching
//! function's router, and delegate everything else to the static file
//! layer. Nothing in the pipeline mutates shared state; it is all built
//! once at startup and shared behind an `Arc`.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tower::ServiceExt;
use tower_http::{services::ServeDir, trace::TraceLayer};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::redirects::{RedirectOutcome, RedirectTable};
use crate::registry::{FunctionRegistry, InvokeError};

/// Shared application state
pub struct GatewayState {
    pub config: AppConfig,
    pub redirects: RedirectTable,
    pub registry: FunctionRegistry,
    pub static_dir: PathBuf,
}

/// Create the gateway application that handles all incoming requests
pub fn create_gateway_app(state: Arc<GatewayState>) -> Router {
    Router::new()
        .route("/", any(handle_edge_request))
        .route("/{*path}", any(handle_edge_request))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Handle an incoming request through the edge pipeline
async fn handle_edge_request(
    State(state): State<Arc<GatewayState>>,
    request: Request<Body>,
) -> Response {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let query = request.uri().query().map(str::to_string);
    let request_id = Uuid::new_v4().to_string();

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        "Incoming request"
    );

    // Redirect rules run before any function code. A rewrite changes the
    // effective path; a 3xx rule answers immediately.
    let effective_path = match state.redirects.evaluate(&method, &path, query.as_deref()) {
        Some(RedirectOutcome::Redirect { status, location }) => {
            tracing::debug!(request_id = %request_id, status, location = %location, "Edge redirect");
            return redirect_response(status, &location);
        }
        Some(RedirectOutcome::Rewrite { path: rewritten }) => {
            tracing::debug!(request_id = %request_id, from = %path, to = %rewritten, "Edge rewrite");
            rewritten
        }
        None => path,
    };

    if let Some(name) = state.registry.function_name_for(&effective_path).map(str::to_string) {
        return invoke_function(&state, &name, &effective_path, &request_id, query, request).await;
    }

    // The static layer only answers reads. An unrewritten POST /api/*
    // lands here and gets the platform's plain 404, never a router.
    if method != "GET" && method != "HEAD" {
        return (StatusCode::NOT_FOUND, "Not Found").into_response();
    }

    serve_static(&state, &effective_path, query.as_deref(), request).await
}

/// Invoke a function: convert the wire request into an SDK request,
/// dispatch it with the platform timeout, and convert the result back.
async fn invoke_function(
    state: &GatewayState,
    name: &str,
    effective_path: &str,
    request_id: &str,
    query: Option<String>,
    request: Request<Body>,
) -> Response {
    let method = request.method().to_string();

    let query: HashMap<String, String> = query
        .map(|q| {
            url::form_urlencoded::parse(q.as_bytes())
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect()
        })
        .unwrap_or_default();

    let headers: HashMap<String, String> = request
        .headers()
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
        .collect();

    let client_ip = headers
        .get("x-forwarded-for")
        .and_then(|v| v.split(',').next())
        .map(|ip| ip.trim().to_string());

    let body_bytes = match axum::body::to_bytes(request.into_body(), state.config.max_body_bytes).await {
        Ok(b) => b,
        Err(e) => {
            tracing::error!(request_id = %request_id, "Failed to read body: {}", e);
            return (StatusCode::BAD_REQUEST, "Failed to read body").into_response();
        }
    };

    let body = if body_bytes.is_empty() {
        None
    } else {
        Some(String::from_utf8_lossy(&body_bytes).to_string())
    };

    let fn_request = edgefn_sdk::Request {
        method,
        path: effective_path.to_string(),
        query,
        headers,
        body,
        params: HashMap::new(),
        client_ip,
        request_id: request_id.to_string(),
    };

    tracing::debug!(
        request_id = %request_id,
        function = %name,
        method = %fn_request.method,
        path = %effective_path,
        "Invoking function"
    );

    let timeout = Duration::from_secs(state.config.invoke_timeout_secs);
    match state.registry.invoke(name, fn_request, timeout).await {
        Ok(fn_response) => fn_response_to_http(fn_response),
        Err(err @ InvokeError::NotFound(_)) => {
            tracing::debug!(request_id = %request_id, "{}", err);
            (StatusCode::NOT_FOUND, "Not Found").into_response()
        }
        Err(err @ InvokeError::Timeout { .. }) => {
            tracing::error!(request_id = %request_id, "{}", err);
            (StatusCode::GATEWAY_TIMEOUT, "Function timed out").into_response()
        }
    }
}

/// Convert an SDK response into a wire response
fn fn_response_to_http(fn_response: edgefn_sdk::Response) -> Response {
    let mut builder = Response::builder()
        .status(StatusCode::from_u16(fn_response.status).unwrap_or(StatusCode::OK));

    for (key, value) in fn_response.headers {
        builder = builder.header(&key, &value);
    }

    match builder.body(Body::from(fn_response.body.unwrap_or_default())) {
        Ok(response) => response,
        Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Failed to build response").into_response(),
    }
}

/// Build the response for a matched 3xx redirect rule
fn redirect_response(status: u16, location: &str) -> Response {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::FOUND);

    match Response::builder()
        .status(status)
        .header("Location", location)
        .body(Body::empty())
    {
        Ok(response) => response,
        Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Failed to build response").into_response(),
    }
}

/// Delegate a request to the static file layer, re-addressed to the
/// effective (possibly rewritten) path.
async fn serve_static(
    state: &GatewayState,
    effective_path: &str,
    query: Option<&str>,
    request: Request<Body>,
) -> Response {
    let path_and_query = match query {
        Some(q) => format!("{}?{}", effective_path, q),
        None => effective_path.to_string(),
    };
    let uri: Uri = match path_and_query.parse() {
        Ok(uri) => uri,
        Err(_) => return (StatusCode::NOT_FOUND, "Not Found").into_response(),
    };

    let (mut parts, _) = request.into_parts();
    parts.uri = uri;
    let request = Request::from_parts(parts, Body::empty());

    match ServeDir::new(&state.static_dir).oneshot(request).await {
        Ok(response) => response.into_response(),
        Err(infallible) => match infallible {},
    }
}
