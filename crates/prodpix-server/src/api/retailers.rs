use axum::{Extension, Json};
use prodpix_core::RetailerTag;
use serde::Serialize;

use crate::middleware::RequestId;

use super::{ApiResponse, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct RetailerItem {
    tag: RetailerTag,
    name: &'static str,
    query_prefix: &'static str,
    preferred_url_prefixes: &'static [&'static str],
    allows_fallback: bool,
    batch_column: &'static str,
}

pub(super) async fn list_retailers(
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<Vec<RetailerItem>>> {
    let data = RetailerTag::ALL
        .into_iter()
        .map(|tag| {
            let profile = tag.profile();
            RetailerItem {
                tag,
                name: profile.name,
                query_prefix: profile.query_prefix,
                preferred_url_prefixes: profile.preferred_url_prefixes,
                allows_fallback: profile.allow_fallback,
                batch_column: profile.batch_column,
            }
        })
        .collect();

    Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    })
}
