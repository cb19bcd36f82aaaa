use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::models::category::Category;
use crate::domain::models::enums::{ApprovalStatus, NotificationKind, Role};
use crate::domain::repositories::{AccountRepository, CategoryRepository};
use crate::domain::services::notification_service::NotificationService;
use crate::error::{AppError, AppResult};
use crate::utils::pagination::{Page, PageRequest};

pub struct CategoryService {
    categories: Arc<dyn CategoryRepository>,
    accounts: Arc<dyn AccountRepository>,
    notifications: Arc<NotificationService>,
}

impl CategoryService {
    pub fn new(
        categories: Arc<dyn CategoryRepository>,
        accounts: Arc<dyn AccountRepository>,
        notifications: Arc<NotificationService>,
    ) -> Self {
        Self { categories, accounts, notifications }
    }

    pub async fn list(&self, page: PageRequest) -> AppResult<Page<Category>> {
        self.categories.find(page).await
    }

    /// 新分类写入后通知所有已通过审核的供应商，通知失败不影响创建结果
    pub async fn create(&self, name: &str, description: Option<String>) -> AppResult<Category> {
        let name = required_name(name)?;
        self.ensure_unique(name, None).await?;

        let category = Category::new(name, description);
        self.categories.create(&category).await?;
        tracing::info!(category = %category.id, name = %category.name, "category created");

        let vendors = match self.accounts.find_ids_by_role(Role::Vendor, ApprovalStatus::Approved).await {
            Ok(vendors) => vendors,
            Err(e) => {
                tracing::warn!(category = %category.id, error = %e, "vendor lookup failed, skipping notifications");
                return Ok(category);
            }
        };
        let body = format!("You can now publish packages under \"{}\"", category.name);
        let delivered = self
            .notifications
            .notify_each(&vendors, NotificationKind::Category, "New category available", &body)
            .await;
        tracing::info!(category = %category.id, vendors = vendors.len(), delivered, "vendors notified");

        Ok(category)
    }

    pub async fn update(&self, id: Uuid, name: Option<&str>, description: Option<String>) -> AppResult<Category> {
        let mut category = self
            .categories
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))?;

        if let Some(name) = name {
            let name = required_name(name)?;
            self.ensure_unique(name, Some(id)).await?;
            category.name = name.to_string();
        }
        if description.is_some() {
            category.description = description;
        }
        category.updated_at = Utc::now();

        if !self.categories.update(&category).await? {
            return Err(not_found(id));
        }
        Ok(category)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        if !self.categories.delete(id).await? {
            return Err(not_found(id));
        }
        tracing::info!(category = %id, "category deleted");
        Ok(())
    }

    async fn ensure_unique(&self, name: &str, current: Option<Uuid>) -> AppResult<()> {
        match self.categories.find_by_name(name).await? {
            Some(existing) if Some(existing.id) != current => {
                Err(AppError::Conflict(format!("Category \"{}\" already exists", name)))
            }
            _ => Ok(()),
        }
    }
}

fn required_name(name: &str) -> AppResult<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Category name cannot be empty".to_string()));
    }
    Ok(name)
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Category with ID {} not found", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::mocks::{accounts_without_tokens, MockAccountRepo, MockCategoryRepo, MockNotificationRepo};

    fn service(categories: MockCategoryRepo, accounts: MockAccountRepo, notifications: MockNotificationRepo) -> CategoryService {
        let notifications = NotificationService::new(Arc::new(notifications), Arc::new(accounts_without_tokens()), None);
        CategoryService::new(Arc::new(categories), Arc::new(accounts), Arc::new(notifications))
    }

    #[tokio::test]
    async fn create_notifies_every_approved_vendor_even_when_one_fails() {
        let vendors: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();
        let unlucky = vendors[1];

        let mut categories = MockCategoryRepo::new();
        categories.expect_find_by_name().returning(|_| Ok(None));
        categories
            .expect_create()
            .withf(|c| c.name == "Diving")
            .times(1)
            .returning(|_| Ok(()));

        let mut accounts = MockAccountRepo::new();
        let listed = vendors.clone();
        accounts
            .expect_find_ids_by_role()
            .withf(|role, status| *role == Role::Vendor && *status == ApprovalStatus::Approved)
            .returning(move |_, _| Ok(listed.clone()));

        let mut notifications = MockNotificationRepo::new();
        notifications.expect_create().times(3).returning(move |n| {
            if n.recipient_id == unlucky {
                Err(AppError::Internal("deadlock".into()))
            } else {
                Ok(())
            }
        });

        let category = service(categories, accounts, notifications)
            .create("  Diving ", Some("Under the sea".into()))
            .await
            .unwrap();
        assert_eq!(category.name, "Diving");
    }

    #[tokio::test]
    async fn vendor_lookup_failure_keeps_the_new_category() {
        let mut categories = MockCategoryRepo::new();
        categories.expect_find_by_name().returning(|_| Ok(None));
        categories.expect_create().times(1).returning(|_| Ok(()));

        let mut accounts = MockAccountRepo::new();
        accounts
            .expect_find_ids_by_role()
            .returning(|_, _| Err(AppError::Internal("pool timed out".into())));

        let mut notifications = MockNotificationRepo::new();
        notifications.expect_create().never();

        let category = service(categories, accounts, notifications)
            .create("Caving", None)
            .await
            .unwrap();
        assert_eq!(category.name, "Caving");
    }

    #[tokio::test]
    async fn updating_a_vanished_category_is_not_found() {
        let existing = Category::new("Hiking", None);
        let id = existing.id;
        let mut categories = MockCategoryRepo::new();
        categories.expect_find_by_id().returning(move |_| Ok(Some(existing.clone())));
        categories.expect_update().times(1).returning(|_| Ok(false));

        let result = service(categories, MockAccountRepo::new(), MockNotificationRepo::new())
            .update(id, None, Some("Trails".into()))
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn duplicate_name_conflicts() {
        let mut categories = MockCategoryRepo::new();
        categories
            .expect_find_by_name()
            .returning(|name| Ok(Some(Category::new(name, None))));
        categories.expect_create().never();

        let result = service(categories, MockAccountRepo::new(), MockNotificationRepo::new())
            .create("Hiking", None)
            .await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn blank_name_is_rejected() {
        let result = service(MockCategoryRepo::new(), MockAccountRepo::new(), MockNotificationRepo::new())
            .create("   ", None)
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn renaming_to_own_name_is_allowed() {
        let existing = Category::new("Hiking", None);
        let id = existing.id;
        let mut categories = MockCategoryRepo::new();
        let found = existing.clone();
        categories.expect_find_by_id().returning(move |_| Ok(Some(found.clone())));
        categories.expect_find_by_name().returning(move |_| Ok(Some(existing.clone())));
        categories.expect_update().times(1).returning(|_| Ok(true));

        let updated = service(categories, MockAccountRepo::new(), MockNotificationRepo::new())
            .update(id, Some("Hiking"), Some("Trails".into()))
            .await
            .unwrap();
        assert_eq!(updated.description.as_deref(), Some("Trails"));
    }
}
