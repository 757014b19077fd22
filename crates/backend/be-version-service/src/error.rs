use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::warn;

/// Failures while loading config or populating the cache. All are fatal to startup.
#[derive(Debug, thiserror::Error)]
pub enum VersionServiceError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP request to {url} failed: {status}")]
    UpstreamStatus { url: String, status: u16 },

    #[error("Malformed version descriptor from {url}: {source}")]
    MalformedBody {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Version descriptor from {url} has an empty '{field}'")]
    EmptyDescriptorField { url: String, field: &'static str },

    #[error("Failed to serialize index response: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Per-request failures on the index endpoint
#[derive(Debug, thiserror::Error)]
pub enum IndexRequestError {
    #[error("Missing platform query parameter")]
    MissingPlatform,

    #[error("Unknown platform: {0}")]
    UnknownPlatform(String),
}

impl IntoResponse for IndexRequestError {
    fn into_response(self) -> Response {
        warn!("Rejected index request: {}", self);
        (StatusCode::BAD_REQUEST, "Bad Request").into_response()
    }
}
