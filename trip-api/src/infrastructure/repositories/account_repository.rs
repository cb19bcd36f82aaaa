use async_trait::async_trait;
use sqlx::MySqlPool;
use uuid::Uuid;

use super::{map_write_error, to_total};
use crate::domain::models::account::Account;
use crate::domain::models::enums::{ApprovalStatus, Role};
use crate::domain::repositories::{AccountRepository, BaseRepository};
use crate::error::AppResult;
use crate::utils::pagination::{Page, PageRequest};

const COLUMNS: &str =
    "id, name, email, password_hash, role, status, blocked, fcm_token, created_at, updated_at";

pub struct MySqlAccountRepository {
    pool: MySqlPool,
}

impl MySqlAccountRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseRepository<Account> for MySqlAccountRepository {
    async fn create(&self, account: &Account) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO accounts (id, name, email, password_hash, role, status, blocked, fcm_token, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(account.id)
        .bind(&account.name)
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(account.role.as_ref())
        .bind(account.status.as_ref())
        .bind(account.blocked)
        .bind(&account.fcm_token)
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "account"))?;

        Ok(())
    }

    async fn find(&self, page: PageRequest) -> AppResult<Page<Account>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM accounts")
            .fetch_one(&self.pool)
            .await?;

        let items = sqlx::query_as::<_, Account>(&format!(
            "SELECT {} FROM accounts ORDER BY created_at DESC LIMIT ? OFFSET ?",
            COLUMNS
        ))
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(Page::new(items, to_total(total), page))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(&format!("SELECT {} FROM accounts WHERE id = ?", COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(account)
    }

    async fn update(&self, account: &Account) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET name = ?, email = ?, password_hash = ?, status = ?, blocked = ?, fcm_token = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&account.name)
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(account.status.as_ref())
        .bind(account.blocked)
        .bind(&account.fcm_token)
        .bind(account.updated_at)
        .bind(account.id)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "account"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_write_error(e, "account"))?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl AccountRepository for MySqlAccountRepository {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(&format!("SELECT {} FROM accounts WHERE email = ?", COLUMNS))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(account)
    }

    async fn list_by_role(
        &self,
        role: Role,
        status: Option<ApprovalStatus>,
        page: PageRequest,
    ) -> AppResult<Page<Account>> {
        let status = status.map(|s| s.to_string());

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM accounts WHERE role = ? AND (? IS NULL OR status = ?)",
        )
        .bind(role.as_ref())
        .bind(&status)
        .bind(&status)
        .fetch_one(&self.pool)
        .await?;

        let items = sqlx::query_as::<_, Account>(&format!(
            r#"
            SELECT {} FROM accounts
            WHERE role = ? AND (? IS NULL OR status = ?)
            ORDER BY created_at DESC
            LIMIT ? OFFSET ?
            "#,
            COLUMNS
        ))
        .bind(role.as_ref())
        .bind(&status)
        .bind(&status)
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(Page::new(items, to_total(total), page))
    }

    async fn find_ids_by_role(&self, role: Role, status: ApprovalStatus) -> AppResult<Vec<Uuid>> {
        let ids = sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM accounts WHERE role = ? AND status = ? AND blocked = FALSE ORDER BY created_at",
        )
        .bind(role.as_ref())
        .bind(status.as_ref())
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }

    async fn set_fcm_token(&self, id: Uuid, token: Option<String>) -> AppResult<bool> {
        let result = sqlx::query("UPDATE accounts SET fcm_token = ?, updated_at = UTC_TIMESTAMP(6) WHERE id = ?")
            .bind(token)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
