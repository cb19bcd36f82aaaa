use async_trait::async_trait;
use sqlx::MySqlPool;
use uuid::Uuid;

use super::{map_write_error, to_total};
use crate::domain::models::category::Category;
use crate::domain::repositories::{BaseRepository, CategoryRepository};
use crate::error::AppResult;
use crate::utils::pagination::{Page, PageRequest};

const COLUMNS: &str = "id, name, description, created_at, updated_at";

pub struct MySqlCategoryRepository {
    pool: MySqlPool,
}

impl MySqlCategoryRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseRepository<Category> for MySqlCategoryRepository {
    async fn create(&self, category: &Category) -> AppResult<()> {
        sqlx::query("INSERT INTO categories (id, name, description, created_at, updated_at) VALUES (?, ?, ?, ?, ?)")
            .bind(category.id)
            .bind(&category.name)
            .bind(&category.description)
            .bind(category.created_at)
            .bind(category.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| map_write_error(e, "category"))?;
        Ok(())
    }

    async fn find(&self, page: PageRequest) -> AppResult<Page<Category>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
            .fetch_one(&self.pool)
            .await?;

        let items = sqlx::query_as::<_, Category>(&format!(
            "SELECT {} FROM categories ORDER BY name ASC LIMIT ? OFFSET ?",
            COLUMNS
        ))
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(Page::new(items, to_total(total), page))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(&format!("SELECT {} FROM categories WHERE id = ?", COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(category)
    }

    async fn update(&self, category: &Category) -> AppResult<bool> {
        let result = sqlx::query("UPDATE categories SET name = ?, description = ?, updated_at = ? WHERE id = ?")
            .bind(&category.name)
            .bind(&category.description)
            .bind(category.updated_at)
            .bind(category.id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_write_error(e, "category"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM categories WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_write_error(e, "category"))?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl CategoryRepository for MySqlCategoryRepository {
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(&format!(
            "SELECT {} FROM categories WHERE LOWER(name) = LOWER(?)",
            COLUMNS
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(category)
    }
}
