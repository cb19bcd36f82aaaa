use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::enums::TransactionKind;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Wallet {
    pub user_id: Uuid,
    pub balance: i64,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WalletTransaction {
    pub id: Uuid,
    pub user_id: Uuid,
    #[sqlx(try_from = "String")]
    pub kind: TransactionKind,
    pub amount: i64,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl WalletTransaction {
    pub fn new(user_id: Uuid, kind: TransactionKind, amount: i64, description: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            kind,
            amount,
            description: description.to_string(),
            created_at: Utc::now(),
        }
    }
}
