use std::sync::Arc;

use uuid::Uuid;

use crate::domain::models::wallet::{Wallet, WalletTransaction};
use crate::domain::repositories::WalletRepository;
use crate::error::{AppError, AppResult};
use crate::utils::pagination::{Page, PageRequest};

pub struct WalletService {
    wallets: Arc<dyn WalletRepository>,
}

impl WalletService {
    pub fn new(wallets: Arc<dyn WalletRepository>) -> Self {
        Self { wallets }
    }

    pub async fn balance(&self, user_id: Uuid) -> AppResult<Wallet> {
        self.wallets.find_or_create(user_id).await
    }

    /// 充值视为已结算，不经过支付渠道
    pub async fn top_up(&self, user_id: Uuid, amount: i64) -> AppResult<WalletTransaction> {
        if amount <= 0 {
            return Err(AppError::Validation("Top-up amount must be positive".to_string()));
        }
        let entry = self.credit(user_id, amount, "Wallet top-up").await?;
        tracing::info!(user = %user_id, amount, "wallet topped up");
        Ok(entry)
    }

    pub async fn credit(&self, user_id: Uuid, amount: i64, description: &str) -> AppResult<WalletTransaction> {
        self.wallets.credit(user_id, amount, description).await
    }

    pub async fn debit(&self, user_id: Uuid, amount: i64, description: &str) -> AppResult<WalletTransaction> {
        match self.wallets.debit(user_id, amount, description).await? {
            Some(entry) => Ok(entry),
            None => {
                let wallet = self.wallets.find_or_create(user_id).await?;
                Err(AppError::InsufficientFunds {
                    balance: wallet.balance,
                    required: amount,
                })
            }
        }
    }

    pub async fn transactions(&self, user_id: Uuid, page: PageRequest) -> AppResult<Page<WalletTransaction>> {
        self.wallets.transactions(user_id, page).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::enums::TransactionKind;
    use crate::domain::repositories::mocks::MockWalletRepo;
    use chrono::Utc;
    use rstest::rstest;

    #[rstest]
    #[case(0)]
    #[case(-500)]
    #[tokio::test]
    async fn top_up_rejects_non_positive_amounts(#[case] amount: i64) {
        let mut repo = MockWalletRepo::new();
        repo.expect_credit().never();
        let service = WalletService::new(Arc::new(repo));

        assert!(matches!(
            service.top_up(Uuid::new_v4(), amount).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn top_up_credits_the_wallet() {
        let user = Uuid::new_v4();
        let mut repo = MockWalletRepo::new();
        repo.expect_credit()
            .withf(move |id, amount, _| *id == user && *amount == 2_500)
            .times(1)
            .returning(|id, amount, description| {
                Ok(WalletTransaction::new(id, TransactionKind::Credit, amount, description))
            });
        let service = WalletService::new(Arc::new(repo));

        let entry = service.top_up(user, 2_500).await.unwrap();
        assert_eq!(entry.kind, TransactionKind::Credit);
        assert_eq!(entry.amount, 2_500);
    }

    #[tokio::test]
    async fn declined_debit_reports_balance() {
        let user = Uuid::new_v4();
        let mut repo = MockWalletRepo::new();
        repo.expect_debit().returning(|_, _, _| Ok(None));
        repo.expect_find_or_create().returning(|id| {
            Ok(Wallet {
                user_id: id,
                balance: 300,
                updated_at: Utc::now(),
            })
        });
        let service = WalletService::new(Arc::new(repo));

        let err = service.debit(user, 1_000, "booking").await.unwrap_err();
        assert!(matches!(
            err,
            AppError::InsufficientFunds {
                balance: 300,
                required: 1_000
            }
        ));
    }
}
