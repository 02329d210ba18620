use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::{is_foreign_key_violation, TagStore};
use crate::{db::DbPool, error::AppError, models::page::PageParams, models::tag::Tag};

#[derive(Clone)]
pub struct SqliteTagStore {
    db: DbPool,
}

impl SqliteTagStore {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }
}

/// `LIKE` pattern matching everything that starts with `prefix` literally.
fn prefix_pattern(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for ch in prefix.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

#[async_trait]
impl TagStore for SqliteTagStore {
    async fn upsert(&self, name: &str, slug: &str) -> Result<Tag, AppError> {
        // The no-op DO UPDATE makes RETURNING yield the existing row on
        // conflict; DO NOTHING would return nothing at all.
        let tag = sqlx::query_as::<_, Tag>(
            r#"INSERT INTO tags (id, name, slug, created_at)
               VALUES (?1, ?2, ?3, ?4)
               ON CONFLICT (slug) DO UPDATE SET slug = excluded.slug
               RETURNING id, name, slug, created_at"#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(slug)
        .bind(Utc::now())
        .fetch_one(&self.db)
        .await?;
        Ok(tag)
    }

    async fn list(&self, prefix: &str) -> Result<Vec<Tag>, AppError> {
        let tags = sqlx::query_as::<_, Tag>(
            r#"SELECT id, name, slug, created_at
               FROM tags
               WHERE slug LIKE ?1 ESCAPE '\'
               ORDER BY slug"#,
        )
        .bind(prefix_pattern(prefix))
        .fetch_all(&self.db)
        .await?;
        Ok(tags)
    }

    async fn list_paged(
        &self,
        prefix: &str,
        params: PageParams,
    ) -> Result<(Vec<Tag>, i64), AppError> {
        let pattern = prefix_pattern(prefix);
        let total: i64 =
            sqlx::query_scalar(r#"SELECT COUNT(*) FROM tags WHERE slug LIKE ?1 ESCAPE '\'"#)
                .bind(&pattern)
                .fetch_one(&self.db)
                .await?;
        let tags = sqlx::query_as::<_, Tag>(
            r#"SELECT id, name, slug, created_at
               FROM tags
               WHERE slug LIKE ?1 ESCAPE '\'
               ORDER BY slug
               LIMIT ?2 OFFSET ?3"#,
        )
        .bind(&pattern)
        .bind(i64::from(params.limit))
        .bind(params.offset())
        .fetch_all(&self.db)
        .await?;
        Ok((tags, total))
    }

    async fn add_to_stop(&self, stop_id: Uuid, tag_id: Uuid) -> Result<(), AppError> {
        sqlx::query(
            r#"INSERT INTO stop_tags (stop_id, tag_id)
               VALUES (?1, ?2)
               ON CONFLICT (stop_id, tag_id) DO NOTHING"#,
        )
        .bind(stop_id)
        .bind(tag_id)
        .execute(&self.db)
        .await
        .map_err(|err| {
            if is_foreign_key_violation(&err) {
                AppError::NotFound("stop")
            } else {
                err.into()
            }
        })?;
        Ok(())
    }

    async fn remove_from_stop(&self, stop_id: Uuid, slug: &str) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"DELETE FROM stop_tags
               WHERE stop_id = ?1
                 AND tag_id = (SELECT id FROM tags WHERE slug = ?2)"#,
        )
        .bind(stop_id)
        .bind(slug)
        .execute(&self.db)
        .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("tag link"));
        }
        Ok(())
    }

    async fn list_by_stop(&self, stop_id: Uuid) -> Result<Vec<Tag>, AppError> {
        let tags = sqlx::query_as::<_, Tag>(
            r#"SELECT t.id, t.name, t.slug, t.created_at
               FROM tags t
               JOIN stop_tags st ON st.tag_id = t.id
               WHERE st.stop_id = ?1
               ORDER BY t.slug"#,
        )
        .bind(stop_id)
        .fetch_all(&self.db)
        .await?;
        Ok(tags)
    }
}
