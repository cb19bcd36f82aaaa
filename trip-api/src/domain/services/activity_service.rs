use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::domain::models::activity::{Activity, ActivityFilter, NewActivity};
use crate::domain::models::auth::AuthUser;
use crate::domain::models::enums::{ApprovalStatus, NotificationKind, Role};
use crate::domain::repositories::{
    AccountRepository, ActivityQuery, ActivityRepository, CategoryRepository, DestinationRepository,
};
use crate::domain::services::approved_vendor;
use crate::domain::services::notification_service::NotificationService;
use crate::error::{AppError, AppResult};
use crate::utils::pagination::{Page, PageRequest};
use crate::utils::search::normalize_term;

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ActivityChanges {
    pub category_id: Option<Uuid>,
    pub destination_id: Option<Uuid>,
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 0))]
    pub price: Option<i64>,
    #[validate(range(min = 1))]
    pub max_participants: Option<i32>,
}

pub struct ActivityService {
    activities: Arc<dyn ActivityRepository>,
    categories: Arc<dyn CategoryRepository>,
    destinations: Arc<dyn DestinationRepository>,
    accounts: Arc<dyn AccountRepository>,
    notifications: Arc<NotificationService>,
}

impl ActivityService {
    pub fn new(
        activities: Arc<dyn ActivityRepository>,
        categories: Arc<dyn CategoryRepository>,
        destinations: Arc<dyn DestinationRepository>,
        accounts: Arc<dyn AccountRepository>,
        notifications: Arc<NotificationService>,
    ) -> Self {
        Self {
            activities,
            categories,
            destinations,
            accounts,
            notifications,
        }
    }

    pub async fn create(&self, user: &AuthUser, input: NewActivity) -> AppResult<Activity> {
        approved_vendor(self.accounts.as_ref(), user).await?;

        let activity = Activity::new(user.id, input);
        check(&activity)?;
        self.ensure_references(activity.category_id, activity.destination_id).await?;

        self.activities.create(&activity).await?;
        tracing::info!(activity = %activity.id, vendor = %user.id, "activity submitted for review");
        Ok(activity)
    }

    /// 任何修改都会让活动重新进入审核
    pub async fn update(&self, user: &AuthUser, id: Uuid, changes: ActivityChanges) -> AppResult<Activity> {
        let mut activity = self.find(id).await?;
        if activity.vendor_id != user.id {
            return Err(AppError::Forbidden("Only the owning vendor can edit this activity".to_string()));
        }

        if let Some(category_id) = changes.category_id {
            activity.category_id = category_id;
        }
        if let Some(destination_id) = changes.destination_id {
            activity.destination_id = destination_id;
        }
        if let Some(title) = changes.title {
            activity.title = title.trim().to_string();
        }
        if let Some(description) = changes.description {
            activity.description = description;
        }
        if let Some(price) = changes.price {
            activity.price = price;
        }
        if let Some(max) = changes.max_participants {
            activity.max_participants = max;
        }
        check(&activity)?;
        if changes.category_id.is_some() || changes.destination_id.is_some() {
            self.ensure_references(activity.category_id, activity.destination_id).await?;
        }

        activity.resubmit();
        if !self.activities.update(&activity).await? {
            return Err(not_found(id));
        }
        tracing::info!(activity = %id, "activity resubmitted for review");
        Ok(activity)
    }

    pub async fn delete(&self, user: &AuthUser, id: Uuid) -> AppResult<()> {
        let activity = self.find(id).await?;
        if activity.vendor_id != user.id && !user.is_admin() {
            return Err(AppError::Forbidden("Only the owning vendor or an admin can delete this activity".to_string()));
        }

        self.activities.delete(id).await?;
        tracing::info!(activity = %id, by = %user.id, "activity deleted");
        Ok(())
    }

    pub async fn list_public(&self, filter: ActivityFilter, page: PageRequest) -> AppResult<Page<Activity>> {
        let query = ActivityQuery {
            pattern: normalize_term(filter.q.as_deref()),
            category_id: filter.category_id,
            destination_id: filter.destination_id,
        };
        self.activities.list_public(query, page).await
    }

    pub async fn list_mine(
        &self,
        user: &AuthUser,
        status: Option<ApprovalStatus>,
        page: PageRequest,
    ) -> AppResult<Page<Activity>> {
        self.activities.list_by_vendor(user.id, status, page).await
    }

    pub async fn list_for_moderation(&self, status: ApprovalStatus, page: PageRequest) -> AppResult<Page<Activity>> {
        self.activities.list_by_status(status, page).await
    }

    pub async fn approve(&self, id: Uuid) -> AppResult<Activity> {
        self.moderate(id, ApprovalStatus::Approved, None).await
    }

    pub async fn reject(&self, id: Uuid, reason: &str) -> AppResult<Activity> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(AppError::Validation("A rejection reason is required".to_string()));
        }
        self.moderate(id, ApprovalStatus::Rejected, Some(reason.to_string())).await
    }

    /// 未审核通过的活动只对所属供应商和管理员可见
    pub async fn get(&self, viewer: Option<&AuthUser>, id: Uuid) -> AppResult<Activity> {
        let activity = self.find(id).await?;
        let visible = activity.is_public()
            || viewer.is_some_and(|v| v.is_admin() || (v.role == Role::Vendor && v.id == activity.vendor_id));

        if visible { Ok(activity) } else { Err(not_found(id)) }
    }

    async fn moderate(&self, id: Uuid, decision: ApprovalStatus, reason: Option<String>) -> AppResult<Activity> {
        let mut activity = self.find(id).await?;
        if !activity.status.can_transition_to(decision) {
            return Err(AppError::BadRequest(format!(
                "Activity is {} and cannot be {}",
                activity.status, decision
            )));
        }

        let previous = activity.status;
        activity.status = decision;
        activity.rejection_reason = reason;
        activity.updated_at = Utc::now();
        // 并发审核时只有一方能落库
        if !self.activities.set_status(&activity, previous).await? {
            return Err(AppError::BadRequest("Activity has already been moderated".to_string()));
        }
        tracing::info!(activity = %id, status = %decision, "activity moderated");

        let body = match &activity.rejection_reason {
            Some(reason) => format!("\"{}\" was rejected: {}", activity.title, reason),
            None => format!("\"{}\" is now live", activity.title),
        };
        if let Err(e) = self
            .notifications
            .notify(activity.vendor_id, NotificationKind::Activity, "Activity reviewed", &body)
            .await
        {
            tracing::warn!(activity = %id, error = %e, "moderation notification failed");
        }

        Ok(activity)
    }

    async fn ensure_references(&self, category_id: Uuid, destination_id: Uuid) -> AppResult<()> {
        if self.categories.find_by_id(category_id).await?.is_none() {
            return Err(AppError::Validation(format!("Category {} does not exist", category_id)));
        }
        if self.destinations.find_by_id(destination_id).await?.is_none() {
            return Err(AppError::Validation(format!("Destination {} does not exist", destination_id)));
        }
        Ok(())
    }

    async fn find(&self, id: Uuid) -> AppResult<Activity> {
        self.activities.find_by_id(id).await?.ok_or_else(|| not_found(id))
    }
}

fn check(activity: &Activity) -> AppResult<()> {
    if activity.title.is_empty() {
        return Err(AppError::Validation("Title cannot be empty".to_string()));
    }
    if activity.price < 0 {
        return Err(AppError::Validation("Price must not be negative".to_string()));
    }
    if activity.max_participants < 1 {
        return Err(AppError::Validation("At least one participant must be allowed".to_string()));
    }
    Ok(())
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Activity with ID {} not found", id))
}
