use axum::{
    extract::{Query, State},
    Extension, Json,
};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use prodpix_core::RetailerTag;
use prodpix_search::{build_query, validate_term, Lookup, LookupState, ResolvedImage};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

const PROXY_PATH: &str = "/api/v1/image-proxy";

#[derive(Debug, Deserialize)]
pub(super) struct LookupQuery {
    pub retailer: Option<String>,
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct LookupData {
    retailer: RetailerTag,
    query: String,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_url: Option<ResolvedImage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    proxy_url: Option<String>,
}

/// Same-origin path that serves `image` through the image proxy.
pub(super) fn proxy_url(image: &ResolvedImage) -> String {
    format!(
        "{PROXY_PATH}?url={}",
        utf8_percent_encode(image.as_str(), NON_ALPHANUMERIC)
    )
}

pub(super) async fn lookup(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<LookupQuery>,
) -> Result<Json<ApiResponse<LookupData>>, ApiError> {
    let tag: RetailerTag = query
        .retailer
        .as_deref()
        .unwrap_or_default()
        .parse()
        .map_err(|e: prodpix_core::ParseRetailerError| {
            ApiError::new(req_id.0.clone(), "bad_request", e.to_string())
        })?;
    let profile = tag.profile();

    let term = validate_term(query.q.as_deref().unwrap_or_default())
        .map_err(|e| ApiError::new(req_id.0.clone(), "bad_request", e.to_string()))?;

    let Some(client) = state.search.as_deref() else {
        return Err(ApiError::new(
            req_id.0,
            "not_configured",
            "search API credentials are not configured",
        ));
    };

    let mut lookup = Lookup::new();
    let (status, image_url) = match lookup.run(client, profile, term).await {
        LookupState::Resolved(image) => ("resolved", Some(image.clone())),
        LookupState::NotFound => ("not_found", None),
        LookupState::Errored(message) => {
            return Err(ApiError::new(req_id.0, "upstream_error", message.clone()));
        }
        LookupState::Idle | LookupState::Searching => {
            tracing::error!(retailer = %tag, "lookup ended in a non-terminal state");
            return Err(ApiError::new(req_id.0, "internal_error", "lookup did not finish"));
        }
    };

    Ok(Json(ApiResponse {
        data: LookupData {
            retailer: tag,
            query: build_query(profile, term),
            status,
            proxy_url: image_url.as_ref().map(proxy_url),
            image_url,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}
