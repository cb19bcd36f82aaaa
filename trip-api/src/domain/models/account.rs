use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::enums::{ApprovalStatus, Role};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    #[sqlx(try_from = "String")]
    pub status: ApprovalStatus,
    pub blocked: bool,
    #[serde(skip_serializing)]
    pub fcm_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// 普通用户直接通过，供应商需要管理员审核
    pub fn new(name: &str, email: &str, password_hash: &str, role: Role) -> Self {
        let now = Utc::now();
        let status = match role {
            Role::Vendor => ApprovalStatus::Pending,
            Role::User | Role::Admin => ApprovalStatus::Approved,
        };
        Self {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            email: normalize_email(email),
            password_hash: password_hash.to_string(),
            role,
            status,
            blocked: false,
            fcm_token: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_approved_vendor(&self) -> bool {
        self.role == Role::Vendor && self.status == ApprovalStatus::Approved
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vendors_start_pending() {
        let vendor = Account::new("Sea Tours", "ops@seatours.com", "hash", Role::Vendor);
        assert_eq!(vendor.status, ApprovalStatus::Pending);
        assert!(!vendor.is_approved_vendor());

        let user = Account::new("Ana", "ana@example.com", "hash", Role::User);
        assert_eq!(user.status, ApprovalStatus::Approved);
    }

    #[test]
    fn email_is_normalized_and_secrets_hidden() {
        let account = Account::new(" Ana ", "  Ana@Example.COM ", "hash", Role::User);
        assert_eq!(account.email, "ana@example.com");
        assert_eq!(account.name, "Ana");

        let json = serde_json::to_value(&account).unwrap();
        assert!(json.get("password_hash").is_none());
        assert!(json.get("fcm_token").is_none());
        assert_eq!(json["role"], "user");
    }
}
