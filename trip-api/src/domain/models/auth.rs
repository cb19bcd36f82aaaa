use uuid::Uuid;

use super::enums::Role;
use crate::error::{AppError, AppResult};
use crate::utils::jwt::Claims;

/// 认证中间件写入请求扩展的当前账号
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub id: Uuid,
    pub role: Role,
    pub jti: Uuid,
    pub exp: i64,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            role: claims.role,
            jti: claims.jti,
            exp: claims.exp,
        }
    }
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn require(&self, role: Role) -> AppResult<()> {
        self.require_any(&[role])
    }

    pub fn require_any(&self, roles: &[Role]) -> AppResult<()> {
        if roles.contains(&self.role) {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!("{} accounts cannot perform this action", self.role)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> AuthUser {
        AuthUser { id: Uuid::new_v4(), role, jti: Uuid::new_v4(), exp: 0 }
    }

    #[test]
    fn role_checks() {
        assert!(user(Role::Vendor).require(Role::Vendor).is_ok());
        assert!(matches!(user(Role::User).require(Role::Admin), Err(AppError::Forbidden(_))));
        assert!(user(Role::Admin).require_any(&[Role::Vendor, Role::Admin]).is_ok());
        assert!(user(Role::Admin).is_admin());
    }
}
