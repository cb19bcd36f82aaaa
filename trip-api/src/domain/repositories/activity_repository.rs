use async_trait::async_trait;
use uuid::Uuid;

use super::BaseRepository;
use crate::domain::models::activity::Activity;
use crate::domain::models::enums::ApprovalStatus;
use crate::error::AppResult;
use crate::utils::pagination::{Page, PageRequest};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivityQuery {
    pub pattern: Option<String>,
    pub category_id: Option<Uuid>,
    pub destination_id: Option<Uuid>,
}

#[async_trait]
pub trait ActivityRepository: BaseRepository<Activity> {
    /// 只返回已审核通过的活动
    async fn list_public(&self, query: ActivityQuery, page: PageRequest) -> AppResult<Page<Activity>>;

    async fn list_by_vendor(
        &self,
        vendor_id: Uuid,
        status: Option<ApprovalStatus>,
        page: PageRequest,
    ) -> AppResult<Page<Activity>>;

    async fn list_by_status(&self, status: ApprovalStatus, page: PageRequest) -> AppResult<Page<Activity>>;

    /// 仅当库中状态仍为 `expected` 时写入新的审核状态，返回是否写入
    async fn set_status(&self, activity: &Activity, expected: ApprovalStatus) -> AppResult<bool>;
}
