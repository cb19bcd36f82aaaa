//! 业务用例。服务只依赖仓储 trait，由 `server::AppState` 组装。

use uuid::Uuid;

use crate::domain::models::account::Account;
use crate::domain::models::auth::AuthUser;
use crate::domain::models::enums::Role;
use crate::domain::repositories::AccountRepository;
use crate::error::{AppError, AppResult};

pub mod account_service;
pub mod activity_service;
pub mod auth_service;
pub mod booking_service;
pub mod category_service;
pub mod chat_service;
pub mod destination_service;
pub mod flight_service;
pub mod notification_service;
pub mod subscription_service;
pub mod wallet_service;

pub use account_service::AccountService;
pub use activity_service::ActivityService;
pub use auth_service::AuthService;
pub use booking_service::BookingService;
pub use category_service::CategoryService;
pub use chat_service::ChatService;
pub use destination_service::DestinationService;
pub use flight_service::FlightService;
pub use notification_service::NotificationService;
pub use subscription_service::SubscriptionService;
pub use wallet_service::WalletService;

/// 发布内容前要求账号是已通过审核且未被封禁的供应商
pub(crate) async fn approved_vendor(accounts: &dyn AccountRepository, user: &AuthUser) -> AppResult<Account> {
    user.require(Role::Vendor)?;

    let account = accounts
        .find_by_id(user.id)
        .await?
        .ok_or_else(|| AppError::Auth("Account no longer exists".to_string()))?;

    if account.blocked || !account.is_approved_vendor() {
        return Err(AppError::Forbidden("Vendor account is not approved".to_string()));
    }
    Ok(account)
}

pub(crate) fn account_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Account with ID {} not found", id))
}
