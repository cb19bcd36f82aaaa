use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use crate::error::AppResult;

/// 已注销令牌的黑名单
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// 在令牌剩余有效期内记住它的 `jti`，`ttl_secs` 至少为 1
    async fn revoke(&self, jti: &str, ttl_secs: u64) -> AppResult<()>;

    async fn is_revoked(&self, jti: &str) -> AppResult<bool>;
}

pub struct RedisTokenStore {
    conn: ConnectionManager,
}

impl RedisTokenStore {
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }

    fn key(jti: &str) -> String {
        format!("auth:revoked:{}", jti)
    }
}

#[async_trait]
impl TokenStore for RedisTokenStore {
    async fn revoke(&self, jti: &str, ttl_secs: u64) -> AppResult<()> {
        let mut conn = self.conn.clone();
        let _: () = conn.set_ex(Self::key(jti), 1, ttl_secs).await?;
        Ok(())
    }

    async fn is_revoked(&self, jti: &str) -> AppResult<bool> {
        let mut conn = self.conn.clone();
        let revoked: bool = conn.exists(Self::key(jti)).await?;
        Ok(revoked)
    }
}
