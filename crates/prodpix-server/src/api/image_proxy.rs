//! Same-origin passthrough for third-party product images.

use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Extension,
};
use prodpix_search::{validate_target, FetchError, ImageFetcher};
use reqwest::Url;
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{ApiError, AppState};

pub(super) const CACHE_CONTROL: &str = "public, max-age=86400";

#[derive(Debug, Deserialize)]
pub(super) struct ProxyQuery {
    pub url: Option<String>,
}

pub(super) async fn image_proxy(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ProxyQuery>,
) -> Result<Response, ApiError> {
    let Some(raw) = query.url.filter(|u| !u.trim().is_empty()) else {
        return Err(ApiError::new(
            req_id.0,
            "bad_request",
            "url query parameter is required",
        ));
    };

    let target = validate_target(&raw)
        .map_err(|e| ApiError::new(req_id.0.clone(), "bad_request", e.to_string()))?;

    proxy_response(&state.fetcher, target).await.map_err(|e| {
        tracing::warn!(url = %raw, error = %e, "image proxy fetch failed");
        ApiError::new(req_id.0, "internal_error", format!("failed to fetch image: {e}"))
    })
}

/// Fetches `target` and streams the body back with the origin content type.
///
/// Expects an already validated URL.
pub(super) async fn proxy_response(
    fetcher: &ImageFetcher,
    target: Url,
) -> Result<Response, FetchError> {
    let upstream = fetcher.fetch_url(target).await?;
    let content_type = upstream.content_type.clone();
    let body = Body::from_stream(upstream.into_response().bytes_stream());

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type),
            (header::CACHE_CONTROL, CACHE_CONTROL.to_string()),
        ],
        body,
    )
        .into_response())
}
