use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    error::{AppError, ResultExt},
    models::{
        page::{Page, PageParams},
        stop::{Stop, StopInput},
        tag::Tag,
    },
    services::{
        tag::normalize_tag_name,
        validate::{ensure_ordered, normalize_optional, require_name},
    },
    store::{StopStore, TagStore, TripStore},
};

/// Stop CRUD scoped to a parent trip, plus the stop's tag links.
///
/// Holds the trip store because a stop may only be created under a trip that
/// exists, and the tag store because tagging is a stop-level operation.
#[derive(Clone)]
pub struct StopService {
    trips: Arc<dyn TripStore>,
    stops: Arc<dyn StopStore>,
    tags: Arc<dyn TagStore>,
}

impl StopService {
    pub fn new(
        trips: Arc<dyn TripStore>,
        stops: Arc<dyn StopStore>,
        tags: Arc<dyn TagStore>,
    ) -> Self {
        Self { trips, stops, tags }
    }

    /// The parent trip is checked before the fields, so an unknown trip is
    /// reported as `NotFound` even when the input is also invalid.
    pub async fn create(&self, trip_id: Uuid, input: StopInput) -> Result<Stop, AppError> {
        self.trips
            .get_by_id(trip_id)
            .await
            .context("stop_service.create")?;
        let input = validate_stop(input)?;
        let stop = self
            .stops
            .create(trip_id, &input)
            .await
            .context("stop_service.create")?;
        info!(trip_id = %trip_id, stop_id = %stop.id, "stop created");
        Ok(stop)
    }

    pub async fn get_by_id(&self, trip_id: Uuid, stop_id: Uuid) -> Result<Stop, AppError> {
        self.stops
            .get_by_id(trip_id, stop_id)
            .await
            .context("stop_service.get_by_id")
    }

    /// Stops of one trip, earliest arrival first.
    pub async fn list_by_trip(&self, trip_id: Uuid) -> Result<Vec<Stop>, AppError> {
        self.stops
            .list_by_trip(trip_id)
            .await
            .context("stop_service.list_by_trip")
    }

    pub async fn list_by_trip_paged(
        &self,
        trip_id: Uuid,
        params: PageParams,
    ) -> Result<Page<Stop>, AppError> {
        let (stops, total) = self
            .stops
            .list_by_trip_paged(trip_id, params)
            .await
            .context("stop_service.list_by_trip_paged")?;
        Ok(Page::new(stops, params, total))
    }

    /// Field rules only; the trip is not re-checked. A (trip, stop) pair that
    /// does not resolve is `NotFound`.
    pub async fn update(
        &self,
        trip_id: Uuid,
        stop_id: Uuid,
        input: StopInput,
    ) -> Result<Stop, AppError> {
        let input = validate_stop(input)?;
        let stop = self
            .stops
            .update(trip_id, stop_id, &input)
            .await
            .context("stop_service.update")?;
        debug!(stop_id = %stop.id, "stop updated");
        Ok(stop)
    }

    pub async fn delete(&self, trip_id: Uuid, stop_id: Uuid) -> Result<(), AppError> {
        self.stops
            .delete(trip_id, stop_id)
            .await
            .context("stop_service.delete")?;
        info!(trip_id = %trip_id, stop_id = %stop_id, "stop deleted");
        Ok(())
    }

    /// Upserts the tag by slug and links it to the stop. Tagging a stop twice
    /// with the same slug is harmless.
    pub async fn add_tag(&self, stop_id: Uuid, tag_name: &str) -> Result<Tag, AppError> {
        let (name, slug) = normalize_tag_name(tag_name)?;
        // Two statements, no transaction: a missing stop fails the link after
        // the upsert, leaving the tag behind. Tags are never deleted anyway.
        let tag = self
            .tags
            .upsert(&name, &slug)
            .await
            .context("stop_service.add_tag")?;
        self.tags
            .add_to_stop(stop_id, tag.id)
            .await
            .context("stop_service.add_tag")?;
        debug!(stop_id = %stop_id, slug = %tag.slug, "tag linked");
        Ok(tag)
    }

    pub async fn remove_tag_from_stop(&self, stop_id: Uuid, slug: &str) -> Result<(), AppError> {
        self.tags
            .remove_from_stop(stop_id, slug)
            .await
            .context("stop_service.remove_tag_from_stop")?;
        debug!(stop_id = %stop_id, slug, "tag unlinked");
        Ok(())
    }

    pub async fn list_tags_by_stop(&self, stop_id: Uuid) -> Result<Vec<Tag>, AppError> {
        self.tags
            .list_by_stop(stop_id)
            .await
            .context("stop_service.list_tags_by_stop")
    }
}

fn validate_stop(input: StopInput) -> Result<StopInput, AppError> {
    let name = require_name(&input.name, "name")?;
    ensure_ordered(
        &input.arrived_at,
        input.departed_at.as_ref(),
        "departed_at must not be before arrived_at",
    )?;
    Ok(StopInput {
        name,
        location: normalize_optional(input.location),
        notes: normalize_optional(input.notes),
        ..input
    })
}
