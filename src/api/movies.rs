use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use crate::{api::ApiResult, routes::AppState, services::search::SearchPage};

/// Raw query-string parameters. Every field is an optional string so
/// malformed numerics coerce downstream instead of tripping axum's
/// typed-extractor rejection.
#[derive(Debug, Deserialize, Default)]
pub struct RawSearchParams {
    pub q: Option<String>,
    pub page: Option<String>,
    #[serde(rename = "pageSize")]
    pub page_size: Option<String>,
}

#[instrument(skip(state))]
pub async fn search_movies(
    State(state): State<AppState>,
    Query(params): Query<RawSearchParams>,
) -> ApiResult<SearchPage> {
    let q = params.q.as_deref().unwrap_or("");
    let page = params.page.as_deref().unwrap_or("1");
    let page_size = params.page_size.as_deref().unwrap_or("8");

    let result = state.source.search(q, page, page_size).await?;

    Ok(Json(result))
}
