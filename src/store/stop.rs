use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::{is_foreign_key_violation, StopStore};
use crate::{
    db::DbPool,
    error::AppError,
    models::{
        page::PageParams,
        stop::{Stop, StopInput},
    },
};

#[derive(Clone)]
pub struct SqliteStopStore {
    db: DbPool,
}

impl SqliteStopStore {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl StopStore for SqliteStopStore {
    async fn create(&self, trip_id: Uuid, input: &StopInput) -> Result<Stop, AppError> {
        let now = Utc::now();
        sqlx::query_as::<_, Stop>(
            r#"INSERT INTO stops
                   (id, trip_id, name, location, arrived_at, departed_at, notes, created_at, updated_at)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
               RETURNING id, trip_id, name, location, arrived_at, departed_at, notes, created_at, updated_at"#,
        )
        .bind(Uuid::new_v4())
        .bind(trip_id)
        .bind(&input.name)
        .bind(&input.location)
        .bind(input.arrived_at)
        .bind(input.departed_at)
        .bind(&input.notes)
        .bind(now)
        .fetch_one(&self.db)
        .await
        .map_err(|err| {
            // The trip vanished between the service's existence check and
            // this insert.
            if is_foreign_key_violation(&err) {
                AppError::NotFound("trip")
            } else {
                err.into()
            }
        })
    }

    async fn get_by_id(&self, trip_id: Uuid, stop_id: Uuid) -> Result<Stop, AppError> {
        sqlx::query_as::<_, Stop>(
            r#"SELECT id, trip_id, name, location, arrived_at, departed_at, notes, created_at, updated_at
               FROM stops
               WHERE id = ?1 AND trip_id = ?2"#,
        )
        .bind(stop_id)
        .bind(trip_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::NotFound("stop"))
    }

    async fn list_by_trip(&self, trip_id: Uuid) -> Result<Vec<Stop>, AppError> {
        let stops = sqlx::query_as::<_, Stop>(
            r#"SELECT id, trip_id, name, location, arrived_at, departed_at, notes, created_at, updated_at
               FROM stops
               WHERE trip_id = ?1
               ORDER BY arrived_at ASC, created_at ASC"#,
        )
        .bind(trip_id)
        .fetch_all(&self.db)
        .await?;
        Ok(stops)
    }

    async fn list_by_trip_paged(
        &self,
        trip_id: Uuid,
        params: PageParams,
    ) -> Result<(Vec<Stop>, i64), AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM stops WHERE trip_id = ?1")
            .bind(trip_id)
            .fetch_one(&self.db)
            .await?;
        let stops = sqlx::query_as::<_, Stop>(
            r#"SELECT id, trip_id, name, location, arrived_at, departed_at, notes, created_at, updated_at
               FROM stops
               WHERE trip_id = ?1
               ORDER BY arrived_at ASC, created_at ASC
               LIMIT ?2 OFFSET ?3"#,
        )
        .bind(trip_id)
        .bind(i64::from(params.limit))
        .bind(params.offset())
        .fetch_all(&self.db)
        .await?;
        Ok((stops, total))
    }

    async fn update(
        &self,
        trip_id: Uuid,
        stop_id: Uuid,
        input: &StopInput,
    ) -> Result<Stop, AppError> {
        sqlx::query_as::<_, Stop>(
            r#"UPDATE stops
               SET name = ?3, location = ?4, arrived_at = ?5, departed_at = ?6, notes = ?7,
                   updated_at = ?8
               WHERE id = ?1 AND trip_id = ?2
               RETURNING id, trip_id, name, location, arrived_at, departed_at, notes, created_at, updated_at"#,
        )
        .bind(stop_id)
        .bind(trip_id)
        .bind(&input.name)
        .bind(&input.location)
        .bind(input.arrived_at)
        .bind(input.departed_at)
        .bind(&input.notes)
        .bind(Utc::now())
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::NotFound("stop"))
    }

    async fn delete(&self, trip_id: Uuid, stop_id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM stops WHERE id = ?1 AND trip_id = ?2")
            .bind(stop_id)
            .bind(trip_id)
            .execute(&self.db)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("stop"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, NaiveDate, TimeZone};

    use super::*;
    use crate::{
        db::memory_pool,
        models::trip::TripInput,
        store::{SqliteTripStore, TripStore},
    };

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 2, hour, 0, 0).unwrap()
    }

    async fn stores_with_trip() -> (SqliteTripStore, SqliteStopStore, Uuid) {
        let db = memory_pool().await;
        let trips = SqliteTripStore::new(db.clone());
        let trip = trips
            .create(&TripInput::new(
                "Summer Tour",
                NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            ))
            .await
            .unwrap();
        (trips, SqliteStopStore::new(db), trip.id)
    }

    #[tokio::test]
    async fn list_orders_by_arrival() {
        let (_, stops, trip_id) = stores_with_trip().await;
        for (name, hour) in [("second", 14), ("first", 9), ("third", 20)] {
            stops.create(trip_id, &StopInput::new(name, at(hour))).await.unwrap();
        }

        let names: Vec<_> = stops
            .list_by_trip(trip_id)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, ["first", "second", "third"]);
    }

    #[tokio::test]
    async fn wrong_trip_id_hides_the_stop() {
        let (trips, stops, trip_id) = stores_with_trip().await;
        let other = trips
            .create(&TripInput::new(
                "Other",
                NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
            ))
            .await
            .unwrap();
        let stop = stops
            .create(trip_id, &StopInput::new("Camp", at(10)))
            .await
            .unwrap();

        assert!(stops.get_by_id(other.id, stop.id).await.unwrap_err().is_not_found());
        assert!(stops
            .update(other.id, stop.id, &StopInput::new("Moved", at(11)))
            .await
            .unwrap_err()
            .is_not_found());
        assert!(stops.delete(other.id, stop.id).await.unwrap_err().is_not_found());
        assert_eq!(stops.get_by_id(trip_id, stop.id).await.unwrap().name, "Camp");
    }

    #[tokio::test]
    async fn deleting_the_trip_cascades_to_stops() {
        let (trips, stops, trip_id) = stores_with_trip().await;
        stops.create(trip_id, &StopInput::new("Camp", at(10))).await.unwrap();

        trips.delete(trip_id).await.unwrap();

        assert!(stops.list_by_trip(trip_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn insert_under_missing_trip_is_not_found() {
        let (_, stops, _) = stores_with_trip().await;
        let err = stops
            .create(Uuid::new_v4(), &StopInput::new("Nowhere", at(10)))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn paged_listing_counts_only_this_trip() {
        let (trips, stops, trip_id) = stores_with_trip().await;
        let other = trips
            .create(&TripInput::new(
                "Other",
                NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
            ))
            .await
            .unwrap();
        for hour in 1..=3 {
            stops.create(trip_id, &StopInput::new("here", at(hour))).await.unwrap();
        }
        stops.create(other.id, &StopInput::new("there", at(5))).await.unwrap();

        let (page, total) = stops
            .list_by_trip_paged(trip_id, PageParams::new(Some(2), Some(2)))
            .await
            .unwrap();
        assert_eq!(total, 3);
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].arrived_at, at(3));
    }
}
