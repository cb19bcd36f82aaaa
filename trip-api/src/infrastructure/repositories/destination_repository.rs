use async_trait::async_trait;
use sqlx::MySqlPool;
use uuid::Uuid;

use super::{map_write_error, to_total};
use crate::domain::models::destination::Destination;
use crate::domain::repositories::{BaseRepository, DestinationRepository};
use crate::error::AppResult;
use crate::utils::pagination::{Page, PageRequest};

const COLUMNS: &str = "id, name, country, description, image_url, created_at, updated_at";

pub struct MySqlDestinationRepository {
    pool: MySqlPool,
}

impl MySqlDestinationRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseRepository<Destination> for MySqlDestinationRepository {
    async fn create(&self, destination: &Destination) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO destinations (id, name, country, description, image_url, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(destination.id)
        .bind(&destination.name)
        .bind(&destination.country)
        .bind(&destination.description)
        .bind(&destination.image_url)
        .bind(destination.created_at)
        .bind(destination.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "destination"))?;

        Ok(())
    }

    async fn find(&self, page: PageRequest) -> AppResult<Page<Destination>> {
        self.search(None, page).await
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Destination>> {
        let destination =
            sqlx::query_as::<_, Destination>(&format!("SELECT {} FROM destinations WHERE id = ?", COLUMNS))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(destination)
    }

    async fn update(&self, destination: &Destination) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE destinations
            SET name = ?, country = ?, description = ?, image_url = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&destination.name)
        .bind(&destination.country)
        .bind(&destination.description)
        .bind(&destination.image_url)
        .bind(destination.updated_at)
        .bind(destination.id)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "destination"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM destinations WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_write_error(e, "destination"))?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl DestinationRepository for MySqlDestinationRepository {
    async fn search(&self, pattern: Option<String>, page: PageRequest) -> AppResult<Page<Destination>> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM destinations WHERE (? IS NULL OR name LIKE ? OR country LIKE ?)",
        )
        .bind(&pattern)
        .bind(&pattern)
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await?;

        let items = sqlx::query_as::<_, Destination>(&format!(
            r#"
            SELECT {} FROM destinations
            WHERE (? IS NULL OR name LIKE ? OR country LIKE ?)
            ORDER BY name ASC
            LIMIT ? OFFSET ?
            "#,
            COLUMNS
        ))
        .bind(&pattern)
        .bind(&pattern)
        .bind(&pattern)
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(Page::new(items, to_total(total), page))
    }
}
