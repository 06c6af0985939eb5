//! edgefn gateway - main entry point
//!
//! This is the single server process that:
//! - Evaluates edge redirect rules ahead of any function code
//! - Routes internal function paths to in-process function routers
//! - Serves the static site for everything else

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use edgefn_gateway::config::AppConfig;
use edgefn_gateway::functions;
use edgefn_gateway::manifest::SiteManifest;
use edgefn_gateway::redirects::RedirectTable;
use edgefn_gateway::registry::FunctionRegistry;
use edgefn_gateway::server::{create_gateway_app, GatewayState};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "info,edgefn_gateway=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting edgefn gateway");

    // Load configuration
    let config = AppConfig::from_env();
    tracing::info!("Configuration loaded: {:?}", config);

    // Load and validate the site manifest
    let manifest = SiteManifest::load(&config.manifest_path)
        .with_context(|| format!("Failed to load site manifest: {:?}", config.manifest_path))?;
    manifest.validate()?;

    // The publish dir travels with the manifest, not the process cwd
    let manifest_dir = config
        .manifest_path
        .parent()
        .map(PathBuf::from)
        .unwrap_or_default();
    let static_dir = if manifest.site.publish_dir.is_absolute() {
        manifest.site.publish_dir.clone()
    } else {
        manifest_dir.join(&manifest.site.publish_dir)
    };

    // Build the immutable function registry
    let registry = functions::register(FunctionRegistry::builder(&manifest.functions.prefix)).build();

    tracing::info!(
        site = %manifest.site.name,
        functions = registry.count(),
        redirects = manifest.redirects.len(),
        static_dir = %static_dir.display(),
        "Site manifest loaded"
    );

    // Create shared state
    let state = Arc::new(GatewayState {
        config: config.clone(),
        redirects: RedirectTable::new(manifest.redirects),
        registry,
        static_dir,
    });

    let app = create_gateway_app(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Gateway listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
