use async_trait::async_trait;
use sqlx::MySqlPool;
use uuid::Uuid;

use super::{map_write_error, to_total};
use crate::domain::models::activity::Activity;
use crate::domain::models::enums::ApprovalStatus;
use crate::domain::repositories::{ActivityQuery, ActivityRepository, BaseRepository};
use crate::error::AppResult;
use crate::utils::pagination::{Page, PageRequest};

const COLUMNS: &str = "id, vendor_id, category_id, destination_id, title, description, price, \
                       max_participants, status, rejection_reason, created_at, updated_at";

const PUBLIC_FILTER: &str = r#"
    status = 'approved'
    AND (? IS NULL OR title LIKE ? OR description LIKE ?)
    AND (? IS NULL OR category_id = ?)
    AND (? IS NULL OR destination_id = ?)
"#;

pub struct MySqlActivityRepository {
    pool: MySqlPool,
}

impl MySqlActivityRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseRepository<Activity> for MySqlActivityRepository {
    async fn create(&self, activity: &Activity) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO activities (id, vendor_id, category_id, destination_id, title, description, price,
                                    max_participants, status, rejection_reason, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(activity.id)
        .bind(activity.vendor_id)
        .bind(activity.category_id)
        .bind(activity.destination_id)
        .bind(&activity.title)
        .bind(&activity.description)
        .bind(activity.price)
        .bind(activity.max_participants)
        .bind(activity.status.as_ref())
        .bind(&activity.rejection_reason)
        .bind(activity.created_at)
        .bind(activity.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "activity"))?;

        Ok(())
    }

    async fn find(&self, page: PageRequest) -> AppResult<Page<Activity>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM activities")
            .fetch_one(&self.pool)
            .await?;

        let items = sqlx::query_as::<_, Activity>(&format!(
            "SELECT {} FROM activities ORDER BY created_at DESC LIMIT ? OFFSET ?",
            COLUMNS
        ))
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(Page::new(items, to_total(total), page))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Activity>> {
        let activity = sqlx::query_as::<_, Activity>(&format!("SELECT {} FROM activities WHERE id = ?", COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(activity)
    }

    async fn update(&self, activity: &Activity) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE activities
            SET category_id = ?, destination_id = ?, title = ?, description = ?, price = ?,
                max_participants = ?, status = ?, rejection_reason = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(activity.category_id)
        .bind(activity.destination_id)
        .bind(&activity.title)
        .bind(&activity.description)
        .bind(activity.price)
        .bind(activity.max_participants)
        .bind(activity.status.as_ref())
        .bind(&activity.rejection_reason)
        .bind(activity.updated_at)
        .bind(activity.id)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "activity"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM activities WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_write_error(e, "activity"))?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl ActivityRepository for MySqlActivityRepository {
    async fn list_public(&self, query: ActivityQuery, page: PageRequest) -> AppResult<Page<Activity>> {
        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM activities WHERE {}", PUBLIC_FILTER))
            .bind(&query.pattern)
            .bind(&query.pattern)
            .bind(&query.pattern)
            .bind(query.category_id)
            .bind(query.category_id)
            .bind(query.destination_id)
            .bind(query.destination_id)
            .fetch_one(&self.pool)
            .await?;

        let items = sqlx::query_as::<_, Activity>(&format!(
            "SELECT {} FROM activities WHERE {} ORDER BY created_at DESC LIMIT ? OFFSET ?",
            COLUMNS, PUBLIC_FILTER
        ))
        .bind(&query.pattern)
        .bind(&query.pattern)
        .bind(&query.pattern)
        .bind(query.category_id)
        .bind(query.category_id)
        .bind(query.destination_id)
        .bind(query.destination_id)
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(Page::new(items, to_total(total), page))
    }

    async fn list_by_vendor(
        &self,
        vendor_id: Uuid,
        status: Option<ApprovalStatus>,
        page: PageRequest,
    ) -> AppResult<Page<Activity>> {
        let status = status.map(|s| s.as_ref().to_string());

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM activities WHERE vendor_id = ? AND (? IS NULL OR status = ?)",
        )
        .bind(vendor_id)
        .bind(&status)
        .bind(&status)
        .fetch_one(&self.pool)
        .await?;

        let items = sqlx::query_as::<_, Activity>(&format!(
            r#"
            SELECT {} FROM activities
            WHERE vendor_id = ? AND (? IS NULL OR status = ?)
            ORDER BY created_at DESC
            LIMIT ? OFFSET ?
            "#,
            COLUMNS
        ))
        .bind(vendor_id)
        .bind(&status)
        .bind(&status)
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(Page::new(items, to_total(total), page))
    }

    async fn list_by_status(&self, status: ApprovalStatus, page: PageRequest) -> AppResult<Page<Activity>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM activities WHERE status = ?")
            .bind(status.as_ref())
            .fetch_one(&self.pool)
            .await?;

        // 审核队列先进先出
        let items = sqlx::query_as::<_, Activity>(&format!(
            "SELECT {} FROM activities WHERE status = ? ORDER BY created_at ASC LIMIT ? OFFSET ?",
            COLUMNS
        ))
        .bind(status.as_ref())
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(Page::new(items, to_total(total), page))
    }

    async fn set_status(&self, activity: &Activity, expected: ApprovalStatus) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE activities SET status = ?, rejection_reason = ?, updated_at = ? WHERE id = ? AND status = ?",
        )
        .bind(activity.status.as_ref())
        .bind(&activity.rejection_reason)
        .bind(activity.updated_at)
        .bind(activity.id)
        .bind(expected.as_ref())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }
}
