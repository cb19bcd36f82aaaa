use async_trait::async_trait;
use uuid::Uuid;

use super::BaseRepository;
use crate::domain::models::account::Account;
use crate::domain::models::enums::{ApprovalStatus, Role};
use crate::error::AppResult;
use crate::utils::pagination::{Page, PageRequest};

#[async_trait]
pub trait AccountRepository: BaseRepository<Account> {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>>;

    async fn list_by_role(
        &self,
        role: Role,
        status: Option<ApprovalStatus>,
        page: PageRequest,
    ) -> AppResult<Page<Account>>;

    /// 通知广播用，只返回未被封禁的账号
    async fn find_ids_by_role(&self, role: Role, status: ApprovalStatus) -> AppResult<Vec<Uuid>>;

    async fn set_fcm_token(&self, id: Uuid, token: Option<String>) -> AppResult<bool>;
}
