//! Data types exchanged with the upstream download service and with clients

use serde::{Deserialize, Serialize};

/// Release metadata published upstream as `version-<platform>.json`
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VersionDescriptor {
    /// File name of the installer, relative to the download domain
    pub download_file: String,
    pub build_version: String,
}

/// Payload served on `GET /?platform=<id>`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IndexResponse {
    pub current_version: String,
    pub download_url: String,
}

/// Query parameters for the index endpoint
#[derive(Deserialize, Debug)]
pub struct PlatformQuery {
    pub platform: Option<String>,
}
