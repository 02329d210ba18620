//! Persistence contracts and their SQLite implementations.
//!
//! Services only see the traits, so tests can swap in any implementation.
//! Every operation is a single statement (plus a `COUNT(*)` for paged
//! listings); nothing here opens a transaction.

pub mod stop;
pub mod tag;
pub mod trip;

#[cfg(test)]
pub(crate) mod testing;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{
        page::PageParams,
        stop::{Stop, StopInput},
        tag::Tag,
        trip::{Trip, TripInput},
    },
};

pub use stop::SqliteStopStore;
pub use tag::SqliteTagStore;
pub use trip::SqliteTripStore;

#[async_trait]
pub trait TripStore: Send + Sync {
    /// Inserts a trip with a fresh id and timestamps.
    async fn create(&self, input: &TripInput) -> Result<Trip, AppError>;

    /// `NotFound` when no trip has this id.
    async fn get_by_id(&self, id: Uuid) -> Result<Trip, AppError>;

    /// All trips, newest `start_date` first.
    async fn list(&self) -> Result<Vec<Trip>, AppError>;

    async fn list_paged(&self, params: PageParams) -> Result<(Vec<Trip>, i64), AppError>;

    /// Overwrites every mutable field. `NotFound` when no trip has this id.
    async fn update(&self, id: Uuid, input: &TripInput) -> Result<Trip, AppError>;

    /// Removes the trip and, through the foreign key, its stops.
    async fn delete(&self, id: Uuid) -> Result<(), AppError>;
}

/// Reads and writes are always scoped by the owning trip: a stop id paired
/// with the wrong trip id behaves exactly like a missing stop.
#[async_trait]
pub trait StopStore: Send + Sync {
    async fn create(&self, trip_id: Uuid, input: &StopInput) -> Result<Stop, AppError>;

    async fn get_by_id(&self, trip_id: Uuid, stop_id: Uuid) -> Result<Stop, AppError>;

    /// Stops of one trip, earliest arrival first.
    async fn list_by_trip(&self, trip_id: Uuid) -> Result<Vec<Stop>, AppError>;

    async fn list_by_trip_paged(
        &self,
        trip_id: Uuid,
        params: PageParams,
    ) -> Result<(Vec<Stop>, i64), AppError>;

    async fn update(
        &self,
        trip_id: Uuid,
        stop_id: Uuid,
        input: &StopInput,
    ) -> Result<Stop, AppError>;

    async fn delete(&self, trip_id: Uuid, stop_id: Uuid) -> Result<(), AppError>;
}

#[async_trait]
pub trait TagStore: Send + Sync {
    /// Inserts the tag, or returns the existing row for `slug` untouched.
    async fn upsert(&self, name: &str, slug: &str) -> Result<Tag, AppError>;

    /// Tags whose slug starts with `prefix`, ordered by slug. An empty prefix
    /// matches every tag.
    async fn list(&self, prefix: &str) -> Result<Vec<Tag>, AppError>;

    async fn list_paged(
        &self,
        prefix: &str,
        params: PageParams,
    ) -> Result<(Vec<Tag>, i64), AppError>;

    /// Links a tag to a stop. Linking an already linked pair is a no-op.
    async fn add_to_stop(&self, stop_id: Uuid, tag_id: Uuid) -> Result<(), AppError>;

    /// `NotFound` when the slug is not linked to the stop.
    async fn remove_from_stop(&self, stop_id: Uuid, slug: &str) -> Result<(), AppError>;

    /// Tags linked to a stop, ordered by slug.
    async fn list_by_stop(&self, stop_id: Uuid) -> Result<Vec<Tag>, AppError>;
}

fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|db_err| db_err.is_foreign_key_violation())
}
