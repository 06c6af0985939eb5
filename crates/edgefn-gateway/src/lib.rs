//! edgefn gateway - a self-hosted functions-platform edge
//!
//! The gateway reproduces a serverless platform's request path in one
//! process: declarative redirect rules from the site manifest are
//! evaluated before any function code runs, internal function paths
//! resolve to in-process routers built with `edgefn-sdk`, and everything
//! else falls through to the static file layer.

pub mod config;
pub mod functions;
pub mod manifest;
pub mod redirects;
pub mod registry;
pub mod server;
