use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::domain::models::auth::AuthUser;
use crate::domain::models::subscription::{SubscriptionPlan, VendorSubscription};
use crate::domain::repositories::{AccountRepository, SubscriptionRepository};
use crate::domain::services::approved_vendor;
use crate::domain::services::wallet_service::WalletService;
use crate::error::{AppError, AppResult};
use crate::utils::pagination::{Page, PageRequest};

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct PlanChanges {
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 0))]
    pub price: Option<i64>,
    #[validate(range(min = 1))]
    pub duration_days: Option<i32>,
    pub active: Option<bool>,
}

pub struct SubscriptionService {
    subscriptions: Arc<dyn SubscriptionRepository>,
    accounts: Arc<dyn AccountRepository>,
    wallet: Arc<WalletService>,
}

impl SubscriptionService {
    pub fn new(
        subscriptions: Arc<dyn SubscriptionRepository>,
        accounts: Arc<dyn AccountRepository>,
        wallet: Arc<WalletService>,
    ) -> Self {
        Self { subscriptions, accounts, wallet }
    }

    pub async fn list_plans(&self, page: PageRequest) -> AppResult<Page<SubscriptionPlan>> {
        self.subscriptions.list_active_plans(page).await
    }

    pub async fn create_plan(
        &self,
        name: &str,
        description: Option<String>,
        price: i64,
        duration_days: i32,
    ) -> AppResult<SubscriptionPlan> {
        let plan = SubscriptionPlan::new(name, description, price, duration_days);
        check(&plan)?;

        self.subscriptions.create(&plan).await?;
        tracing::info!(plan = %plan.id, "subscription plan created");
        Ok(plan)
    }

    pub async fn update_plan(&self, id: Uuid, changes: PlanChanges) -> AppResult<SubscriptionPlan> {
        let mut plan = self.plan(id).await?;

        if let Some(name) = changes.name {
            plan.name = name.trim().to_string();
        }
        if changes.description.is_some() {
            plan.description = changes.description;
        }
        if let Some(price) = changes.price {
            plan.price = price;
        }
        if let Some(days) = changes.duration_days {
            plan.duration_days = days;
        }
        if let Some(active) = changes.active {
            plan.active = active;
        }
        check(&plan)?;
        plan.updated_at = Utc::now();

        if !self.subscriptions.update(&plan).await? {
            return Err(plan_not_found(id));
        }
        Ok(plan)
    }

    pub async fn delete_plan(&self, id: Uuid) -> AppResult<()> {
        if !self.subscriptions.delete(id).await? {
            return Err(plan_not_found(id));
        }
        Ok(())
    }

    /// 从供应商钱包扣款，写入失败时退回
    pub async fn subscribe(&self, user: &AuthUser, plan_id: Uuid) -> AppResult<VendorSubscription> {
        approved_vendor(self.accounts.as_ref(), user).await?;

        let plan = self.plan(plan_id).await?;
        if !plan.active {
            return Err(AppError::BadRequest(format!("Plan \"{}\" is no longer offered", plan.name)));
        }

        let current = self.subscriptions.latest_for_vendor(user.id).await?;
        let subscription = VendorSubscription::purchase(user.id, &plan, current.as_ref(), Utc::now());

        let description = format!("Subscription: {}", plan.name);
        self.wallet.debit(user.id, plan.price, &description).await?;

        if let Err(e) = self.subscriptions.create_vendor_subscription(&subscription).await {
            tracing::error!(vendor = %user.id, plan = %plan.id, error = %e, "subscription insert failed, refunding");
            self.wallet
                .credit(user.id, plan.price, &format!("Refund: {}", plan.name))
                .await?;
            return Err(e);
        }

        tracing::info!(
            vendor = %user.id,
            plan = %plan.id,
            expires_at = %subscription.expires_at,
            "vendor subscribed"
        );
        Ok(subscription)
    }

    pub async fn my_subscriptions(&self, user: &AuthUser, page: PageRequest) -> AppResult<Page<VendorSubscription>> {
        self.subscriptions.list_for_vendor(user.id, page).await
    }

    /// 结束时间最晚且尚未过期的订阅
    pub async fn current(&self, user: &AuthUser) -> AppResult<Option<VendorSubscription>> {
        let now = Utc::now();
        Ok(self
            .subscriptions
            .latest_for_vendor(user.id)
            .await?
            .filter(|s| s.expires_at > now))
    }

    async fn plan(&self, id: Uuid) -> AppResult<SubscriptionPlan> {
        self.subscriptions.find_by_id(id).await?.ok_or_else(|| plan_not_found(id))
    }
}

fn check(plan: &SubscriptionPlan) -> AppResult<()> {
    if plan.name.is_empty() {
        return Err(AppError::Validation("Plan name cannot be empty".to_string()));
    }
    if plan.price < 0 || plan.duration_days < 1 {
        return Err(AppError::Validation(
            "Price must not be negative and duration must be at least one day".to_string(),
        ));
    }
    Ok(())
}

fn plan_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Subscription plan with ID {} not found", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::enums::{ApprovalStatus, Role, TransactionKind};
    use crate::domain::models::wallet::WalletTransaction;
    use crate::domain::repositories::mocks::*;
    use chrono::Duration;

    fn service(subscriptions: MockSubscriptionRepo, accounts: MockAccountRepo, wallet: MockWalletRepo) -> SubscriptionService {
        SubscriptionService::new(
            Arc::new(subscriptions),
            Arc::new(accounts),
            Arc::new(WalletService::new(Arc::new(wallet))),
        )
    }

    fn approved(user: &AuthUser) -> MockAccountRepo {
        let account = account_for(user, ApprovalStatus::Approved);
        let mut accounts = MockAccountRepo::new();
        accounts.expect_find_by_id().returning(move |_| Ok(Some(account.clone())));
        accounts
    }

    fn debits_ok(wallet: &mut MockWalletRepo) {
        wallet
            .expect_debit()
            .times(1)
            .returning(|id, amount, d| Ok(Some(WalletTransaction::new(id, TransactionKind::Debit, amount, d))));
    }

    #[tokio::test]
    async fn renewal_starts_when_current_period_ends() {
        let vendor = auth_user(Role::Vendor);
        let plan = SubscriptionPlan::new("Gold", None, 4_900, 30);
        let plan_id = plan.id;
        let current = VendorSubscription::purchase(vendor.id, &plan, None, Utc::now() - Duration::days(5));
        let current_end = current.expires_at;

        let mut subscriptions = MockSubscriptionRepo::new();
        subscriptions.expect_find_by_id().returning(move |_| Ok(Some(plan.clone())));
        subscriptions
            .expect_latest_for_vendor()
            .returning(move |_| Ok(Some(current.clone())));
        subscriptions
            .expect_create_vendor_subscription()
            .times(1)
            .returning(|_| Ok(()));
        let mut wallet = MockWalletRepo::new();
        debits_ok(&mut wallet);

        let renewal = service(subscriptions, approved(&vendor), wallet)
            .subscribe(&vendor, plan_id)
            .await
            .unwrap();
        assert_eq!(renewal.starts_at, current_end);
        assert_eq!(renewal.expires_at, current_end + Duration::days(30));
    }

    #[tokio::test]
    async fn failed_insert_refunds_the_wallet() {
        let vendor = auth_user(Role::Vendor);
        let plan = SubscriptionPlan::new("Basic", None, 900, 7);
        let plan_id = plan.id;

        let mut subscriptions = MockSubscriptionRepo::new();
        subscriptions.expect_find_by_id().returning(move |_| Ok(Some(plan.clone())));
        subscriptions.expect_latest_for_vendor().returning(|_| Ok(None));
        subscriptions
            .expect_create_vendor_subscription()
            .returning(|_| Err(AppError::Internal("connection reset".into())));
        let mut wallet = MockWalletRepo::new();
        debits_ok(&mut wallet);
        wallet
            .expect_credit()
            .withf(|_, amount, _| *amount == 900)
            .times(1)
            .returning(|id, amount, d| Ok(WalletTransaction::new(id, TransactionKind::Credit, amount, d)));

        let result = service(subscriptions, approved(&vendor), wallet).subscribe(&vendor, plan_id).await;
        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[tokio::test]
    async fn inactive_plan_cannot_be_bought() {
        let vendor = auth_user(Role::Vendor);
        let mut plan = SubscriptionPlan::new("Legacy", None, 100, 30);
        plan.active = false;
        let plan_id = plan.id;

        let mut subscriptions = MockSubscriptionRepo::new();
        subscriptions.expect_find_by_id().returning(move |_| Ok(Some(plan.clone())));
        let mut wallet = MockWalletRepo::new();
        wallet.expect_debit().never();

        let result = service(subscriptions, approved(&vendor), wallet).subscribe(&vendor, plan_id).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn users_cannot_subscribe() {
        let user = auth_user(Role::User);
        let result = service(MockSubscriptionRepo::new(), MockAccountRepo::new(), MockWalletRepo::new())
            .subscribe(&user, Uuid::new_v4())
            .await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn plan_validation() {
        let mut subscriptions = MockSubscriptionRepo::new();
        subscriptions.expect_create().never();
        let service = service(subscriptions, MockAccountRepo::new(), MockWalletRepo::new());

        assert!(matches!(
            service.create_plan("Zero days", None, 100, 0).await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            service.create_plan(" ", None, 100, 30).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn updating_a_deleted_plan_is_not_found() {
        let existing = SubscriptionPlan::new("Pro", None, 2_900, 30);
        let id = existing.id;
        let mut subscriptions = MockSubscriptionRepo::new();
        subscriptions.expect_find_by_id().returning(move |_| Ok(Some(existing.clone())));
        subscriptions.expect_update().times(1).returning(|_| Ok(false));

        let result = service(subscriptions, MockAccountRepo::new(), MockWalletRepo::new())
            .update_plan(
                id,
                PlanChanges {
                    price: Some(3_900),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
