use chrono::{TimeDelta, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::models::enums::Role;
use crate::error::{AppError, AppResult};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    pub sub: Uuid,  // 账号 ID
    pub role: Role, // 账号角色
    pub jti: Uuid,  // 令牌 ID，注销时写入黑名单
    pub iat: i64,   // 签发时间
    pub exp: i64,   // 过期时间
}

impl Claims {
    /// 距离过期的剩余秒数，已过期为 0
    pub fn remaining_secs(&self) -> u64 {
        u64::try_from(self.exp - Utc::now().timestamp()).unwrap_or_default()
    }
}

pub fn generate_token(account_id: Uuid, role: Role, secret: &[u8], ttl_hours: u64) -> AppResult<(String, Claims)> {
    let now = Utc::now();
    let expires_at = i64::try_from(ttl_hours)
        .ok()
        .and_then(TimeDelta::try_hours)
        .and_then(|ttl| now.checked_add_signed(ttl))
        .ok_or_else(|| AppError::Internal(format!("Token lifetime of {} hours is out of range", ttl_hours)))?;

    let claims = Claims {
        sub: account_id,
        role,
        jti: Uuid::new_v4(),
        iat: now.timestamp(),
        exp: expires_at.timestamp(),
    };

    let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(secret))
        .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))?;

    Ok((token, claims))
}

pub fn verify_token(token: &str, secret: &[u8]) -> AppResult<Claims> {
    let token_data = decode::<Claims>(token, &DecodingKey::from_secret(secret), &Validation::default())
        .map_err(|_| AppError::Auth("Invalid or expired token".to_string()))?;

    Ok(token_data.claims)
}
