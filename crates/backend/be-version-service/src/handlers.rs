use std::sync::Arc;

use axum::{
    extract::{Query, State, rejection::QueryRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::{instrument, warn};

use crate::{cache::PlatformCache, error::IndexRequestError, types::PlatformQuery};

#[instrument(skip_all, fields(platform = tracing::field::Empty))]
pub async fn index_handler(
    State(cache): State<Arc<PlatformCache>>,
    query: Result<Query<PlatformQuery>, QueryRejection>,
) -> Response {
    let platform = match query {
        Ok(Query(PlatformQuery {
            platform: Some(platform),
        })) => platform,
        Ok(_) => return IndexRequestError::MissingPlatform.into_response(),
        Err(rejection) => {
            warn!("Rejected query string: {}", rejection);
            return IndexRequestError::MissingPlatform.into_response();
        }
    };
    tracing::Span::current().record("platform", platform.as_str());

    match cache.get(&platform) {
        Some(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            body.clone(),
        )
            .into_response(),
        None => IndexRequestError::UnknownPlatform(platform).into_response(),
    }
}

pub async fn not_found_handler() -> Response {
    (StatusCode::NOT_FOUND, "404 page not found").into_response()
}
