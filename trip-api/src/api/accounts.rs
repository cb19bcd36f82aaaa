use std::sync::Arc;

use axum::{
    extract::State,
    middleware,
    routing::{get, put},
    Json, Router,
};
use serde::Deserialize;

use crate::domain::models::account::Account;
use crate::domain::models::auth::AuthUser;
use crate::error::AppError;
use crate::middleware::auth::require_auth;
use crate::server::AppState;
use crate::utils::response::ApiResponse;

pub fn routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/me", get(me))
        .route("/me/fcm-token", put(set_fcm_token))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}

#[derive(Debug, Deserialize)]
pub struct FcmTokenRequest {
    /// `null` 表示清除
    pub token: Option<String>,
}

async fn me(State(state): State<Arc<AppState>>, user: AuthUser) -> Result<ApiResponse<Account>, AppError> {
    let account = state.accounts.me(&user).await?;
    Ok(ApiResponse::success(account))
}

async fn set_fcm_token(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<FcmTokenRequest>,
) -> Result<ApiResponse<()>, AppError> {
    state.accounts.set_fcm_token(&user, payload.token).await?;
    Ok(ApiResponse::message("Push token updated"))
}
