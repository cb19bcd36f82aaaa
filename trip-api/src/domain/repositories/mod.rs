//! 仓储接口。每个实体一个 trait，MySQL 实现位于 `infrastructure::repositories`。

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppResult;
use crate::utils::pagination::{Page, PageRequest};

pub mod account_repository;
pub mod activity_repository;
pub mod booking_repository;
pub mod category_repository;
pub mod chat_repository;
pub mod destination_repository;
pub mod flight_repository;
pub mod notification_repository;
pub mod subscription_repository;
pub mod wallet_repository;

#[cfg(test)]
pub mod mocks;

pub use account_repository::AccountRepository;
pub use activity_repository::{ActivityQuery, ActivityRepository};
pub use booking_repository::BookingRepository;
pub use category_repository::CategoryRepository;
pub use chat_repository::ChatRepository;
pub use destination_repository::DestinationRepository;
pub use flight_repository::FlightRepository;
pub use notification_repository::NotificationRepository;
pub use subscription_repository::SubscriptionRepository;
pub use wallet_repository::WalletRepository;

/// 每个方法对应一条 SQL 语句
#[async_trait]
pub trait BaseRepository<T>: Send + Sync
where
    T: Send + Sync + 'static,
{
    async fn create(&self, entity: &T) -> AppResult<()>;

    /// 按创建时间倒序分页
    async fn find(&self, page: PageRequest) -> AppResult<Page<T>>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<T>>;

    /// 返回是否有记录被更新
    async fn update(&self, entity: &T) -> AppResult<bool>;

    /// 返回是否有记录被删除
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}
