use axum::{extract::State, routing::get, Router};
use serde::Deserialize;

use super::extract::{ApiJson, ApiQuery};
use crate::{
    error::AppError,
    models::{
        page::{Page, PageParams},
        tag::Tag,
    },
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/tags", get(list_tags))
}

#[derive(Deserialize)]
struct TagQuery {
    /// Slug prefix filter.
    #[serde(default)]
    q: String,
    page: Option<i64>,
    limit: Option<i64>,
}

async fn list_tags(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<TagQuery>,
) -> Result<ApiJson<Page<Tag>>, AppError> {
    let params = PageParams::new(query.page, query.limit);
    Ok(ApiJson(state.tags.list_paged(&query.q, params).await?))
}
