use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Router,
};
use uuid::Uuid;

use super::extract::{ApiJson, ApiPath, ApiQuery};
use crate::{
    error::AppError,
    models::{
        page::{Page, PageQuery},
        trip::{Trip, TripInput},
    },
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/trips", get(list_trips).post(create_trip))
        .route(
            "/trips/:trip_id",
            get(get_trip).put(update_trip).delete(delete_trip),
        )
}

async fn list_trips(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> Result<ApiJson<Page<Trip>>, AppError> {
    let page = state.trips.list_paged(query.into()).await?;
    Ok(ApiJson(page))
}

async fn create_trip(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<TripInput>,
) -> Result<(StatusCode, ApiJson<Trip>), AppError> {
    let trip = state.trips.create(input).await?;
    Ok((StatusCode::CREATED, ApiJson(trip)))
}

async fn get_trip(
    State(state): State<AppState>,
    ApiPath(trip_id): ApiPath<Uuid>,
) -> Result<ApiJson<Trip>, AppError> {
    Ok(ApiJson(state.trips.get_by_id(trip_id).await?))
}

async fn update_trip(
    State(state): State<AppState>,
    ApiPath(trip_id): ApiPath<Uuid>,
    ApiJson(input): ApiJson<TripInput>,
) -> Result<ApiJson<Trip>, AppError> {
    Ok(ApiJson(state.trips.update(trip_id, input).await?))
}

async fn delete_trip(
    State(state): State<AppState>,
    ApiPath(trip_id): ApiPath<Uuid>,
) -> Result<StatusCode, AppError> {
    state.trips.delete(trip_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
