use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    error::{AppError, ResultExt},
    models::{
        page::{Page, PageParams},
        trip::{Trip, TripInput},
    },
    services::validate::{ensure_ordered, normalize_optional, require_name},
    store::TripStore,
};

#[derive(Clone)]
pub struct TripService {
    trips: Arc<dyn TripStore>,
}

impl TripService {
    pub fn new(trips: Arc<dyn TripStore>) -> Self {
        Self { trips }
    }

    pub async fn create(&self, input: TripInput) -> Result<Trip, AppError> {
        let input = validate_trip(input)?;
        let trip = self
            .trips
            .create(&input)
            .await
            .context("trip_service.create")?;
        info!(trip_id = %trip.id, "trip created");
        Ok(trip)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Trip, AppError> {
        self.trips
            .get_by_id(id)
            .await
            .context("trip_service.get_by_id")
    }

    /// Every trip, newest start date first.
    pub async fn list(&self) -> Result<Vec<Trip>, AppError> {
        self.trips.list().await.context("trip_service.list")
    }

    pub async fn list_paged(&self, params: PageParams) -> Result<Page<Trip>, AppError> {
        let (trips, total) = self
            .trips
            .list_paged(params)
            .await
            .context("trip_service.list_paged")?;
        Ok(Page::new(trips, params, total))
    }

    /// Full overwrite of the mutable fields, checked by the same rules as
    /// [`TripService::create`].
    pub async fn update(&self, id: Uuid, input: TripInput) -> Result<Trip, AppError> {
        let input = validate_trip(input)?;
        let trip = self
            .trips
            .update(id, &input)
            .await
            .context("trip_service.update")?;
        debug!(trip_id = %trip.id, "trip updated");
        Ok(trip)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.trips.delete(id).await.context("trip_service.delete")?;
        info!(trip_id = %id, "trip deleted");
        Ok(())
    }
}

fn validate_trip(input: TripInput) -> Result<TripInput, AppError> {
    let name = require_name(&input.name, "name")?;
    ensure_ordered(
        &input.start_date,
        input.end_date.as_ref(),
        "end_date must not be before start_date",
    )?;
    Ok(TripInput {
        name,
        notes: normalize_optional(input.notes),
        ..input
    })
}
