use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::models::account::Account;
use crate::domain::models::auth::AuthUser;
use crate::domain::models::enums::{ApprovalStatus, NotificationKind, Role};
use crate::domain::repositories::AccountRepository;
use crate::domain::services::account_not_found;
use crate::domain::services::notification_service::NotificationService;
use crate::error::{AppError, AppResult};
use crate::utils::pagination::{Page, PageRequest};

pub struct AccountService {
    accounts: Arc<dyn AccountRepository>,
    notifications: Arc<NotificationService>,
}

impl AccountService {
    pub fn new(accounts: Arc<dyn AccountRepository>, notifications: Arc<NotificationService>) -> Self {
        Self { accounts, notifications }
    }

    pub async fn me(&self, user: &AuthUser) -> AppResult<Account> {
        self.get(user.id).await
    }

    pub async fn set_fcm_token(&self, user: &AuthUser, token: Option<String>) -> AppResult<()> {
        let token = token.map(|t| t.trim().to_string()).filter(|t| !t.is_empty());
        if !self.accounts.set_fcm_token(user.id, token).await? {
            return Err(account_not_found(user.id));
        }
        Ok(())
    }

    pub async fn list_accounts(
        &self,
        role: Role,
        status: Option<ApprovalStatus>,
        page: PageRequest,
    ) -> AppResult<Page<Account>> {
        self.accounts.list_by_role(role, status, page).await
    }

    pub async fn approve_vendor(&self, id: Uuid) -> AppResult<Account> {
        self.decide_vendor(id, ApprovalStatus::Approved).await
    }

    pub async fn reject_vendor(&self, id: Uuid) -> AppResult<Account> {
        self.decide_vendor(id, ApprovalStatus::Rejected).await
    }

    pub async fn set_blocked(&self, id: Uuid, blocked: bool) -> AppResult<Account> {
        let mut account = self.get(id).await?;
        if account.role == Role::Admin {
            return Err(AppError::BadRequest("Admin accounts cannot be blocked".to_string()));
        }

        account.blocked = blocked;
        account.updated_at = Utc::now();
        if !self.accounts.update(&account).await? {
            return Err(account_not_found(id));
        }
        tracing::info!(account = %id, blocked, "account block state changed");

        Ok(account)
    }

    async fn decide_vendor(&self, id: Uuid, decision: ApprovalStatus) -> AppResult<Account> {
        let mut account = self.get(id).await?;
        if account.role != Role::Vendor {
            return Err(AppError::BadRequest("Account is not a vendor".to_string()));
        }
        if account.status == decision {
            return Ok(account);
        }

        account.status = decision;
        account.updated_at = Utc::now();
        if !self.accounts.update(&account).await? {
            return Err(account_not_found(id));
        }
        tracing::info!(vendor = %id, status = %decision, "vendor reviewed");

        let (title, body) = match decision {
            ApprovalStatus::Approved => ("Vendor account approved", "You can now publish travel packages"),
            _ => ("Vendor account rejected", "Your vendor application was not approved"),
        };
        if let Err(e) = self.notifications.notify(id, NotificationKind::Vendor, title, body).await {
            tracing::warn!(vendor = %id, error = %e, "vendor decision notification failed");
        }

        Ok(account)
    }

    async fn get(&self, id: Uuid) -> AppResult<Account> {
        self.accounts.find_by_id(id).await?.ok_or_else(|| account_not_found(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::mocks::{accounts_without_tokens, quiet_notifications, MockAccountRepo, MockNotificationRepo};

    fn service(accounts: MockAccountRepo, notifications: MockNotificationRepo) -> AccountService {
        let notifications = NotificationService::new(Arc::new(notifications), Arc::new(accounts_without_tokens()), None);
        AccountService::new(Arc::new(accounts), Arc::new(notifications))
    }

    fn repo_with(account: Account) -> MockAccountRepo {
        let mut accounts = MockAccountRepo::new();
        accounts.expect_find_by_id().returning(move |_| Ok(Some(account.clone())));
        accounts
    }

    #[tokio::test]
    async fn approving_a_vendor_notifies_it() {
        let vendor = Account::new("Sea Tours", "ops@seatours.com", "hash", Role::Vendor);
        let vendor_id = vendor.id;
        let mut accounts = repo_with(vendor);
        accounts
            .expect_update()
            .withf(|a| a.status == ApprovalStatus::Approved)
            .times(1)
            .returning(|_| Ok(true));
        let mut notifications = MockNotificationRepo::new();
        notifications
            .expect_create()
            .withf(move |n| n.recipient_id == vendor_id && n.kind == NotificationKind::Vendor)
            .times(1)
            .returning(|_| Ok(()));

        let approved = service(accounts, notifications).approve_vendor(vendor_id).await.unwrap();
        assert!(approved.is_approved_vendor());
    }

    #[tokio::test]
    async fn only_vendors_can_be_reviewed() {
        let user = Account::new("Ana", "ana@example.com", "hash", Role::User);
        let id = user.id;
        let mut accounts = repo_with(user);
        accounts.expect_update().never();

        let result = service(accounts, quiet_notifications()).reject_vendor(id).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn blocking_updates_the_account() {
        let user = Account::new("Ana", "ana@example.com", "hash", Role::User);
        let id = user.id;
        let mut accounts = repo_with(user);
        accounts.expect_update().withf(|a| a.blocked).times(1).returning(|_| Ok(true));

        assert!(service(accounts, quiet_notifications()).set_blocked(id, true).await.unwrap().blocked);
    }

    #[tokio::test]
    async fn missing_account_is_not_found() {
        let mut accounts = MockAccountRepo::new();
        accounts.expect_find_by_id().returning(|_| Ok(None));

        let result = service(accounts, quiet_notifications()).approve_vendor(Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
