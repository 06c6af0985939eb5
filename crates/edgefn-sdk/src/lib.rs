//! edgefn SDK - Types and routing for edgefn function handlers
//!
//! This crate provides the core types that function handlers use to interact
//! with the edgefn gateway: the transient [`Request`] and [`Response`]
//! structures that exist for one invocation, the [`HandlerError`] taxonomy,
//! and the [`Router`] that mounts handlers under a function's base path.

pub mod error;
pub mod handler;
pub mod request;
pub mod response;
pub mod router;

pub mod prelude {
    //! Common imports for edgefn function handlers
    pub use crate::error::HandlerError;
    pub use crate::handler::{fallible, BoxFuture, Handler};
    pub use crate::request::Request;
    pub use crate::response::Response;
    pub use crate::router::{Router, RouterBuilder};
    pub use serde::{Deserialize, Serialize};
    pub use serde_json::{json, Value as JsonValue};
}

// Re-export key types at crate root
pub use error::HandlerError;
pub use handler::{BoxFuture, Handler};
pub use request::Request;
pub use response::Response;
pub use router::{Router, RouterBuilder};
