//! Store doubles for exercising error propagation.

use async_trait::async_trait;
use uuid::Uuid;

use super::{StopStore, TagStore, TripStore};
use crate::{
    error::AppError,
    models::{
        page::PageParams,
        stop::{Stop, StopInput},
        tag::Tag,
        trip::{Trip, TripInput},
    },
};

/// Every call fails as if the database were unreachable.
#[derive(Clone, Copy, Default)]
pub(crate) struct UnreachableStore;

fn offline<T>() -> Result<T, AppError> {
    Err(AppError::Database(sqlx::Error::PoolTimedOut))
}

#[async_trait]
impl TripStore for UnreachableStore {
    async fn create(&self, _: &TripInput) -> Result<Trip, AppError> {
        offline()
    }
    async fn get_by_id(&self, _: Uuid) -> Result<Trip, AppError> {
        offline()
    }
    async fn list(&self) -> Result<Vec<Trip>, AppError> {
        offline()
    }
    async fn list_paged(&self, _: PageParams) -> Result<(Vec<Trip>, i64), AppError> {
        offline()
    }
    async fn update(&self, _: Uuid, _: &TripInput) -> Result<Trip, AppError> {
        offline()
    }
    async fn delete(&self, _: Uuid) -> Result<(), AppError> {
        offline()
    }
}

#[async_trait]
impl StopStore for UnreachableStore {
    async fn create(&self, _: Uuid, _: &StopInput) -> Result<Stop, AppError> {
        offline()
    }
    async fn get_by_id(&self, _: Uuid, _: Uuid) -> Result<Stop, AppError> {
        offline()
    }
    async fn list_by_trip(&self, _: Uuid) -> Result<Vec<Stop>, AppError> {
        offline()
    }
    async fn list_by_trip_paged(
        &self,
        _: Uuid,
        _: PageParams,
    ) -> Result<(Vec<Stop>, i64), AppError> {
        offline()
    }
    async fn update(&self, _: Uuid, _: Uuid, _: &StopInput) -> Result<Stop, AppError> {
        offline()
    }
    async fn delete(&self, _: Uuid, _: Uuid) -> Result<(), AppError> {
        offline()
    }
}

#[async_trait]
impl TagStore for UnreachableStore {
    async fn upsert(&self, _: &str, _: &str) -> Result<Tag, AppError> {
        offline()
    }
    async fn list(&self, _: &str) -> Result<Vec<Tag>, AppError> {
        offline()
    }
    async fn list_paged(&self, _: &str, _: PageParams) -> Result<(Vec<Tag>, i64), AppError> {
        offline()
    }
    async fn add_to_stop(&self, _: Uuid, _: Uuid) -> Result<(), AppError> {
        offline()
    }
    async fn remove_from_stop(&self, _: Uuid, _: &str) -> Result<(), AppError> {
        offline()
    }
    async fn list_by_stop(&self, _: Uuid) -> Result<Vec<Tag>, AppError> {
        offline()
    }
}
