use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::TripStore;
use crate::{
    db::DbPool,
    error::AppError,
    models::{
        page::PageParams,
        trip::{Trip, TripInput},
    },
};

#[derive(Clone)]
pub struct SqliteTripStore {
    db: DbPool,
}

impl SqliteTripStore {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TripStore for SqliteTripStore {
    async fn create(&self, input: &TripInput) -> Result<Trip, AppError> {
        let now = Utc::now();
        let trip = sqlx::query_as::<_, Trip>(
            r#"INSERT INTO trips (id, name, start_date, end_date, notes, created_at, updated_at)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
               RETURNING id, name, start_date, end_date, notes, created_at, updated_at"#,
        )
        .bind(Uuid::new_v4())
        .bind(&input.name)
        .bind(input.start_date)
        .bind(input.end_date)
        .bind(&input.notes)
        .bind(now)
        .fetch_one(&self.db)
        .await?;
        Ok(trip)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Trip, AppError> {
        sqlx::query_as::<_, Trip>(
            "SELECT id, name, start_date, end_date, notes, created_at, updated_at FROM trips WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::NotFound("trip"))
    }

    async fn list(&self) -> Result<Vec<Trip>, AppError> {
        let trips = sqlx::query_as::<_, Trip>(
            r#"SELECT id, name, start_date, end_date, notes, created_at, updated_at
               FROM trips
               ORDER BY start_date DESC, created_at DESC"#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(trips)
    }

    async fn list_paged(&self, params: PageParams) -> Result<(Vec<Trip>, i64), AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM trips")
            .fetch_one(&self.db)
            .await?;
        let trips = sqlx::query_as::<_, Trip>(
            r#"SELECT id, name, start_date, end_date, notes, created_at, updated_at
               FROM trips
               ORDER BY start_date DESC, created_at DESC
               LIMIT ?1 OFFSET ?2"#,
        )
        .bind(i64::from(params.limit))
        .bind(params.offset())
        .fetch_all(&self.db)
        .await?;
        Ok((trips, total))
    }

    async fn update(&self, id: Uuid, input: &TripInput) -> Result<Trip, AppError> {
        sqlx::query_as::<_, Trip>(
            r#"UPDATE trips
               SET name = ?2, start_date = ?3, end_date = ?4, notes = ?5, updated_at = ?6
               WHERE id = ?1
               RETURNING id, name, start_date, end_date, notes, created_at, updated_at"#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(input.start_date)
        .bind(input.end_date)
        .bind(&input.notes)
        .bind(Utc::now())
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::NotFound("trip"))
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM trips WHERE id = ?1")
            .bind(id)
            .execute(&self.db)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("trip"));
        }
        Ok(())
    }
}
