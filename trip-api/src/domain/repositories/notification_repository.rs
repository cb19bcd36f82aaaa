use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::models::notification::Notification;
use crate::error::AppResult;
use crate::utils::pagination::{Page, PageRequest};

/// 所有查询都限定在接收者范围内
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn create(&self, notification: &Notification) -> AppResult<()>;

    async fn list_for(&self, recipient_id: Uuid, unread_only: bool, page: PageRequest) -> AppResult<Page<Notification>>;

    async fn count_unread(&self, recipient_id: Uuid) -> AppResult<u64>;

    async fn mark_read(&self, recipient_id: Uuid, id: Uuid) -> AppResult<bool>;

    async fn mark_all_read(&self, recipient_id: Uuid) -> AppResult<u64>;

    async fn delete(&self, recipient_id: Uuid, id: Uuid) -> AppResult<bool>;
}
