use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use crate::config::AuthConfig;
use crate::domain::models::account::{normalize_email, Account};
use crate::domain::models::auth::AuthUser;
use crate::domain::models::enums::{ApprovalStatus, NotificationKind, Role};
use crate::domain::repositories::AccountRepository;
use crate::domain::services::notification_service::NotificationService;
use crate::error::{AppError, AppResult};
use crate::infrastructure::token_store::TokenStore;
use crate::utils::jwt::{generate_token, verify_token};
use crate::utils::password::{hash_password, verify_password};

#[derive(Debug, Serialize)]
pub struct AuthToken {
    pub token: String,
    pub token_type: &'static str,
    pub expires_at: i64,
    pub account: Account,
}

#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

pub struct AuthService {
    accounts: Arc<dyn AccountRepository>,
    tokens: Arc<dyn TokenStore>,
    notifications: Arc<NotificationService>,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        tokens: Arc<dyn TokenStore>,
        notifications: Arc<NotificationService>,
        config: AuthConfig,
    ) -> Self {
        Self { accounts, tokens, notifications, config }
    }

    pub async fn register(&self, input: Registration) -> AppResult<AuthToken> {
        if input.role == Role::Admin {
            return Err(AppError::Validation("Role must be user or vendor".to_string()));
        }

        // 检查邮箱是否已存在
        let email = normalize_email(&input.email);
        if self.accounts.find_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        let password_hash = hash_password(&input.password)?;
        let account = Account::new(&input.name, &email, &password_hash, input.role);
        self.accounts.create(&account).await?;
        tracing::info!(account = %account.id, role = %account.role, "account registered");

        if account.role == Role::Vendor {
            match self.accounts.find_ids_by_role(Role::Admin, ApprovalStatus::Approved).await {
                Ok(admins) => {
                    let body = format!("{} ({}) is waiting for approval", account.name, account.email);
                    self.notifications
                        .notify_each(&admins, NotificationKind::Vendor, "New vendor request", &body)
                        .await;
                }
                Err(e) => tracing::warn!(account = %account.id, error = %e, "admin lookup failed, skipping notifications"),
            }
        }

        self.issue(account)
    }

    pub async fn login(&self, email: &str, password: &str) -> AppResult<AuthToken> {
        let invalid = || AppError::Auth("Invalid email or password".to_string());

        let account = self
            .accounts
            .find_by_email(&normalize_email(email))
            .await?
            .ok_or_else(invalid)?;

        if !verify_password(password, &account.password_hash) {
            return Err(invalid());
        }
        if account.blocked {
            return Err(AppError::Forbidden("Account is blocked".to_string()));
        }

        self.issue(account)
    }

    /// 令牌在剩余有效期内进入黑名单，已过期的令牌至少保留 1 秒
    pub async fn logout(&self, user: &AuthUser) -> AppResult<()> {
        let ttl = u64::try_from(user.exp - Utc::now().timestamp()).unwrap_or_default().max(1);
        self.tokens.revoke(&user.jti.to_string(), ttl).await?;
        tracing::info!(account = %user.id, "token revoked");
        Ok(())
    }

    pub async fn authenticate(&self, token: &str) -> AppResult<AuthUser> {
        let claims = verify_token(token, self.config.jwt_secret.as_bytes())?;

        if self.tokens.is_revoked(&claims.jti.to_string()).await? {
            return Err(AppError::Auth("Token has been revoked".to_string()));
        }

        Ok(AuthUser::from(claims))
    }

    fn issue(&self, account: Account) -> AppResult<AuthToken> {
        let (token, claims) = generate_token(
            account.id,
            account.role,
            self.config.jwt_secret.as_bytes(),
            self.config.token_expiry_hours,
        )?;

        Ok(AuthToken {
            token,
            token_type: "Bearer",
            expires_at: claims.exp,
            account,
        })
    }
}
