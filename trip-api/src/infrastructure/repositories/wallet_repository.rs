use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySql, MySqlPool, Transaction};
use uuid::Uuid;

use super::to_total;
use crate::domain::models::enums::TransactionKind;
use crate::domain::models::wallet::{Wallet, WalletTransaction};
use crate::domain::repositories::WalletRepository;
use crate::error::AppResult;
use crate::utils::pagination::{Page, PageRequest};

const TRANSACTION_COLUMNS: &str = "id, user_id, kind, amount, description, created_at";

pub struct MySqlWalletRepository {
    pool: MySqlPool,
}

impl MySqlWalletRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// 钱包在第一次使用时创建，余额为 0
    async fn ensure_wallet(tx: &mut Transaction<'_, MySql>, user_id: Uuid) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO wallets (user_id, balance, updated_at)
            VALUES (?, 0, ?)
            ON DUPLICATE KEY UPDATE user_id = user_id
            "#,
        )
        .bind(user_id)
        .bind(Utc::now())
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    async fn record(tx: &mut Transaction<'_, MySql>, entry: &WalletTransaction) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO wallet_transactions (id, user_id, kind, amount, description, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(entry.id)
        .bind(entry.user_id)
        .bind(entry.kind.as_ref())
        .bind(entry.amount)
        .bind(&entry.description)
        .bind(entry.created_at)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl WalletRepository for MySqlWalletRepository {
    async fn find_or_create(&self, user_id: Uuid) -> AppResult<Wallet> {
        let mut tx = self.pool.begin().await?;
        Self::ensure_wallet(&mut tx, user_id).await?;

        let wallet = sqlx::query_as::<_, Wallet>("SELECT user_id, balance, updated_at FROM wallets WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(wallet)
    }

    async fn credit(&self, user_id: Uuid, amount: i64, description: &str) -> AppResult<WalletTransaction> {
        let entry = WalletTransaction::new(user_id, TransactionKind::Credit, amount, description);

        let mut tx = self.pool.begin().await?;
        Self::ensure_wallet(&mut tx, user_id).await?;

        sqlx::query("UPDATE wallets SET balance = balance + ?, updated_at = ? WHERE user_id = ?")
            .bind(amount)
            .bind(entry.created_at)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        Self::record(&mut tx, &entry).await?;

        tx.commit().await?;
        Ok(entry)
    }

    async fn debit(&self, user_id: Uuid, amount: i64, description: &str) -> AppResult<Option<WalletTransaction>> {
        let entry = WalletTransaction::new(user_id, TransactionKind::Debit, amount, description);

        let mut tx = self.pool.begin().await?;
        Self::ensure_wallet(&mut tx, user_id).await?;

        // 条件更新保证并发扣款不会出现负余额
        let result = sqlx::query(
            "UPDATE wallets SET balance = balance - ?, updated_at = ? WHERE user_id = ? AND balance >= ?",
        )
        .bind(amount)
        .bind(entry.created_at)
        .bind(user_id)
        .bind(amount)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        Self::record(&mut tx, &entry).await?;
        tx.commit().await?;
        Ok(Some(entry))
    }

    async fn transactions(&self, user_id: Uuid, page: PageRequest) -> AppResult<Page<WalletTransaction>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM wallet_transactions WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        let items = sqlx::query_as::<_, WalletTransaction>(&format!(
            "SELECT {} FROM wallet_transactions WHERE user_id = ? ORDER BY created_at DESC LIMIT ? OFFSET ?",
            TRANSACTION_COLUMNS
        ))
        .bind(user_id)
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(Page::new(items, to_total(total), page))
    }
}
