//! Application configuration

use std::env;
use std::path::PathBuf;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Path to the site manifest (edgefn.yaml)
    pub manifest_path: PathBuf,

    /// Port the gateway listens on
    pub port: u16,

    /// Function invocation timeout in seconds
    pub invoke_timeout_secs: u64,

    /// Maximum request body size in bytes
    pub max_body_bytes: usize,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            manifest_path: env::var("EDGEFN_MANIFEST")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./edgefn.yaml")),

            port: env::var("EDGEFN_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(8888),

            invoke_timeout_secs: env::var("EDGEFN_INVOKE_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),

            max_body_bytes: env::var("EDGEFN_MAX_BODY_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1024 * 1024),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
