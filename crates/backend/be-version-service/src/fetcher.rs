//! Startup fetch of release metadata from the upstream download service

use std::time::Duration;

use reqwest::StatusCode;
use tracing::{debug, error, info, instrument};

use crate::{
    cache::PlatformCache,
    config::PlatformSpec,
    error::VersionServiceError,
    types::{IndexResponse, VersionDescriptor},
};

/// Client for the upstream download domain
#[derive(Debug, Clone)]
pub struct VersionFetcher {
    client: reqwest::Client,
    download_domain: String,
}

impl VersionFetcher {
    pub fn new(
        download_domain: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, VersionServiceError> {
        let client = reqwest::ClientBuilder::new()
            .timeout(timeout)
            .build()
            .map_err(VersionServiceError::HttpClient)?;

        Ok(Self {
            client,
            download_domain: download_domain.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn descriptor_url(&self, spec: &PlatformSpec) -> String {
        format!("{}/{}", self.download_domain, spec.descriptor_file)
    }

    pub fn download_url(&self, download_file: &str) -> String {
        format!("{}/{}", self.download_domain, download_file)
    }

    #[instrument(skip(self, spec), fields(platform = %spec.id))]
    pub async fn fetch_descriptor(
        &self,
        spec: &PlatformSpec,
    ) -> Result<VersionDescriptor, VersionServiceError> {
        let url = self.descriptor_url(spec);
        debug!("Fetching version descriptor from {}", url);

        let response = self.client.get(&url).send().await.map_err(|source| {
            VersionServiceError::Transport {
                url: url.clone(),
                source,
            }
        })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(VersionServiceError::UpstreamStatus {
                url,
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| VersionServiceError::Transport {
                url: url.clone(),
                source,
            })?;

        serde_json::from_slice(&body)
            .map_err(|source| VersionServiceError::MalformedBody { url, source })
    }

    pub async fn fetch_index(
        &self,
        spec: &PlatformSpec,
    ) -> Result<IndexResponse, VersionServiceError> {
        let descriptor = self.fetch_descriptor(spec).await?;

        let current_version = descriptor.build_version.trim();
        if current_version.is_empty() {
            return Err(VersionServiceError::EmptyDescriptorField {
                url: self.descriptor_url(spec),
                field: "buildVersion",
            });
        }

        let download_file = descriptor.download_file.trim();
        if download_file.is_empty() {
            return Err(VersionServiceError::EmptyDescriptorField {
                url: self.descriptor_url(spec),
                field: "downloadFile",
            });
        }

        Ok(IndexResponse {
            current_version: current_version.to_string(),
            download_url: self.download_url(download_file),
        })
    }

    /// Fetches every platform in order. The first failure aborts the whole
    /// build so no partially populated cache ever reaches the router.
    #[instrument(skip_all, fields(domain = %self.download_domain, platforms = platforms.len()))]
    pub async fn build_cache(
        &self,
        platforms: &[PlatformSpec],
    ) -> Result<PlatformCache, VersionServiceError> {
        let mut cache = PlatformCache::default();

        for spec in platforms {
            let index = self.fetch_index(spec).await.inspect_err(|e| {
                error!("Failed to fetch version for platform '{}': {}", spec.id, e);
            })?;

            info!(
                "Platform '{}' at version {} ({})",
                spec.id, index.current_version, index.download_url
            );

            cache
                .insert(&spec.id, &index)
                .map_err(VersionServiceError::Serialize)?;
        }

        Ok(cache)
    }
}
