//! 基于 sqlx 的 MySQL 仓储实现

use crate::error::AppError;

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

pub use account_repository::MySqlAccountRepository;
pub use activity_repository::MySqlActivityRepository;
pub use booking_repository::MySqlBookingRepository;
pub use category_repository::MySqlCategoryRepository;
pub use chat_repository::MySqlChatRepository;
pub use destination_repository::MySqlDestinationRepository;
pub use flight_repository::MySqlFlightRepository;
pub use notification_repository::MySqlNotificationRepository;
pub use subscription_repository::MySqlSubscriptionRepository;
pub use wallet_repository::MySqlWalletRepository;

/// 唯一键和外键冲突转换成业务冲突，其余保持数据库错误
pub(crate) fn map_write_error(err: sqlx::Error, entity: &str) -> AppError {
    if let Some(db_err) = err.as_database_error() {
        if db_err.is_unique_violation() {
            return AppError::Conflict(format!("{} already exists", entity));
        }
        if db_err.is_foreign_key_violation() {
            return AppError::Conflict(format!("{} is referenced by other records", entity));
        }
    }
    AppError::Database(err)
}

pub(crate) fn to_total(count: i64) -> u64 {
    u64::try_from(count).unwrap_or_default()
}
