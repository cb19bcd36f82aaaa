use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::models::wallet::{Wallet, WalletTransaction};
use crate::error::AppResult;
use crate::utils::pagination::{Page, PageRequest};

#[async_trait]
pub trait WalletRepository: Send + Sync {
    async fn find_or_create(&self, user_id: Uuid) -> AppResult<Wallet>;

    /// 余额变更与流水写入在同一事务中完成
    async fn credit(&self, user_id: Uuid, amount: i64, description: &str) -> AppResult<WalletTransaction>;

    /// 余额不足时返回 `None`，不做任何修改
    async fn debit(&self, user_id: Uuid, amount: i64, description: &str) -> AppResult<Option<WalletTransaction>>;

    async fn transactions(&self, user_id: Uuid, page: PageRequest) -> AppResult<Page<WalletTransaction>>;
}
