use async_trait::async_trait;
use sqlx::MySqlPool;
use uuid::Uuid;

use super::{map_write_error, to_total};
use crate::domain::models::subscription::{SubscriptionPlan, VendorSubscription};
use crate::domain::repositories::{BaseRepository, SubscriptionRepository};
use crate::error::AppResult;
use crate::utils::pagination::{Page, PageRequest};

const PLAN_COLUMNS: &str = "id, name, description, price, duration_days, active, created_at, updated_at";
const SUBSCRIPTION_COLUMNS: &str = "id, vendor_id, plan_id, amount, starts_at, expires_at, created_at";

pub struct MySqlSubscriptionRepository {
    pool: MySqlPool,
}

impl MySqlSubscriptionRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseRepository<SubscriptionPlan> for MySqlSubscriptionRepository {
    async fn create(&self, plan: &SubscriptionPlan) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO subscription_plans (id, name, description, price, duration_days, active, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(plan.id)
        .bind(&plan.name)
        .bind(&plan.description)
        .bind(plan.price)
        .bind(plan.duration_days)
        .bind(plan.active)
        .bind(plan.created_at)
        .bind(plan.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "subscription plan"))?;

        Ok(())
    }

    async fn find(&self, page: PageRequest) -> AppResult<Page<SubscriptionPlan>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM subscription_plans")
            .fetch_one(&self.pool)
            .await?;

        let items = sqlx::query_as::<_, SubscriptionPlan>(&format!(
            "SELECT {} FROM subscription_plans ORDER BY created_at DESC LIMIT ? OFFSET ?",
            PLAN_COLUMNS
        ))
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(Page::new(items, to_total(total), page))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<SubscriptionPlan>> {
        let plan = sqlx::query_as::<_, SubscriptionPlan>(&format!(
            "SELECT {} FROM subscription_plans WHERE id = ?",
            PLAN_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(plan)
    }

    async fn update(&self, plan: &SubscriptionPlan) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE subscription_plans
            SET name = ?, description = ?, price = ?, duration_days = ?, active = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&plan.name)
        .bind(&plan.description)
        .bind(plan.price)
        .bind(plan.duration_days)
        .bind(plan.active)
        .bind(plan.updated_at)
        .bind(plan.id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM subscription_plans WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_write_error(e, "subscription plan"))?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl SubscriptionRepository for MySqlSubscriptionRepository {
    async fn list_active_plans(&self, page: PageRequest) -> AppResult<Page<SubscriptionPlan>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM subscription_plans WHERE active = TRUE")
            .fetch_one(&self.pool)
            .await?;

        let items = sqlx::query_as::<_, SubscriptionPlan>(&format!(
            "SELECT {} FROM subscription_plans WHERE active = TRUE ORDER BY price ASC LIMIT ? OFFSET ?",
            PLAN_COLUMNS
        ))
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(Page::new(items, to_total(total), page))
    }

    async fn create_vendor_subscription(&self, subscription: &VendorSubscription) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO vendor_subscriptions (id, vendor_id, plan_id, amount, starts_at, expires_at, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(subscription.id)
        .bind(subscription.vendor_id)
        .bind(subscription.plan_id)
        .bind(subscription.amount)
        .bind(subscription.starts_at)
        .bind(subscription.expires_at)
        .bind(subscription.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "subscription"))?;

        Ok(())
    }

    async fn latest_for_vendor(&self, vendor_id: Uuid) -> AppResult<Option<VendorSubscription>> {
        let subscription = sqlx::query_as::<_, VendorSubscription>(&format!(
            "SELECT {} FROM vendor_subscriptions WHERE vendor_id = ? ORDER BY expires_at DESC LIMIT 1",
            SUBSCRIPTION_COLUMNS
        ))
        .bind(vendor_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(subscription)
    }

    async fn list_for_vendor(&self, vendor_id: Uuid, page: PageRequest) -> AppResult<Page<VendorSubscription>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM vendor_subscriptions WHERE vendor_id = ?")
            .bind(vendor_id)
            .fetch_one(&self.pool)
            .await?;

        let items = sqlx::query_as::<_, VendorSubscription>(&format!(
            "SELECT {} FROM vendor_subscriptions WHERE vendor_id = ? ORDER BY created_at DESC LIMIT ? OFFSET ?",
            SUBSCRIPTION_COLUMNS
        ))
        .bind(vendor_id)
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(Page::new(items, to_total(total), page))
    }
}
