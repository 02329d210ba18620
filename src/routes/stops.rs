use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get},
    Router,
};
use serde::Deserialize;
use uuid::Uuid;

use super::extract::{ApiJson, ApiPath, ApiQuery};
use crate::{
    error::AppError,
    models::{
        page::{Page, PageQuery},
        stop::{Stop, StopInput},
        tag::Tag,
    },
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/trips/:trip_id/stops", get(list_stops).post(create_stop))
        .route(
            "/trips/:trip_id/stops/:stop_id",
            get(get_stop).put(update_stop).delete(delete_stop),
        )
        .route(
            "/trips/:trip_id/stops/:stop_id/tags",
            get(list_stop_tags).post(add_stop_tag),
        )
        .route(
            "/trips/:trip_id/stops/:stop_id/tags/:slug",
            delete(remove_stop_tag),
        )
}

async fn list_stops(
    State(state): State<AppState>,
    ApiPath(trip_id): ApiPath<Uuid>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> Result<ApiJson<Page<Stop>>, AppError> {
    let page = state
        .stops
        .list_by_trip_paged(trip_id, query.into())
        .await?;
    Ok(ApiJson(page))
}

async fn create_stop(
    State(state): State<AppState>,
    ApiPath(trip_id): ApiPath<Uuid>,
    ApiJson(input): ApiJson<StopInput>,
) -> Result<(StatusCode, ApiJson<Stop>), AppError> {
    let stop = state.stops.create(trip_id, input).await?;
    Ok((StatusCode::CREATED, ApiJson(stop)))
}

async fn get_stop(
    State(state): State<AppState>,
    ApiPath((trip_id, stop_id)): ApiPath<(Uuid, Uuid)>,
) -> Result<ApiJson<Stop>, AppError> {
    Ok(ApiJson(state.stops.get_by_id(trip_id, stop_id).await?))
}

async fn update_stop(
    State(state): State<AppState>,
    ApiPath((trip_id, stop_id)): ApiPath<(Uuid, Uuid)>,
    ApiJson(input): ApiJson<StopInput>,
) -> Result<ApiJson<Stop>, AppError> {
    Ok(ApiJson(state.stops.update(trip_id, stop_id, input).await?))
}

async fn delete_stop(
    State(state): State<AppState>,
    ApiPath((trip_id, stop_id)): ApiPath<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    state.stops.delete(trip_id, stop_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Tag links are keyed by stop alone; resolving the stop through its trip
// first keeps a stop unreachable via someone else's trip id.

async fn list_stop_tags(
    State(state): State<AppState>,
    ApiPath((trip_id, stop_id)): ApiPath<(Uuid, Uuid)>,
) -> Result<ApiJson<Vec<Tag>>, AppError> {
    state.stops.get_by_id(trip_id, stop_id).await?;
    Ok(ApiJson(state.stops.list_tags_by_stop(stop_id).await?))
}

#[derive(Deserialize)]
struct AddTagBody {
    name: String,
}

async fn add_stop_tag(
    State(state): State<AppState>,
    ApiPath((trip_id, stop_id)): ApiPath<(Uuid, Uuid)>,
    ApiJson(body): ApiJson<AddTagBody>,
) -> Result<(StatusCode, ApiJson<Tag>), AppError> {
    state.stops.get_by_id(trip_id, stop_id).await?;
    let tag = state.stops.add_tag(stop_id, &body.name).await?;
    Ok((StatusCode::CREATED, ApiJson(tag)))
}

async fn remove_stop_tag(
    State(state): State<AppState>,
    ApiPath((trip_id, stop_id, slug)): ApiPath<(Uuid, Uuid, String)>,
) -> Result<StatusCode, AppError> {
    state.stops.get_by_id(trip_id, stop_id).await?;
    state.stops.remove_tag_from_stop(stop_id, &slug).await?;
    Ok(StatusCode::NO_CONTENT)
}
