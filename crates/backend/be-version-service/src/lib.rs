//! Version Check Service
//!
//! Fetches the current release descriptor for each configured platform from
//! the download domain once at startup, then serves the derived
//! `{ currentVersion, downloadUrl }` payload on `GET /?platform=<id>`.
//!
//! There is no live refresh: picking up a new upstream release requires a
//! restart.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{Router, routing::get};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, info};

pub mod cache;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod handlers;
pub mod types;

/// Create the axum router over a fully populated cache
pub fn create_router(cache: Arc<PlatformCache>) -> Router {
    Router::new()
        .route("/", get(handlers::index_handler))
        .fallback(handlers::not_found_handler)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(cache)
}

/// Fetch every configured platform and return the serving router.
///
/// Fails without a router if any platform could not be fetched.
pub async fn init_version_service(config: &VersionServiceConfig) -> Result<Router> {
    debug!(
        "Initializing version service against {} for {} platform(s)",
        config.download_domain,
        config.platforms.len()
    );

    let fetcher = VersionFetcher::new(config.download_domain.clone(), config.fetch_timeout)
        .context("Failed to create upstream client")?;

    let cache = fetcher
        .build_cache(&config.platforms)
        .await
        .context("Failed to populate version cache")?;

    info!(
        "Version cache ready for: {}",
        cache.platforms().collect::<Vec<_>>().join(", ")
    );

    Ok(create_router(Arc::new(cache)))
}

// Re-export commonly used types
pub use cache::PlatformCache;
pub use config::{PlatformSpec, VersionServiceConfig};
pub use error::{IndexRequestError, VersionServiceError};
pub use fetcher::VersionFetcher;
pub use types::{IndexResponse, PlatformQuery, VersionDescriptor};
