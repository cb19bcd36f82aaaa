use std::sync::Arc;

use axum::{
    extract::{Query, State},
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use validator::Validate;

use crate::domain::models::auth::AuthUser;
use crate::domain::models::wallet::{Wallet, WalletTransaction};
use crate::error::AppError;
use crate::middleware::auth::require_auth;
use crate::server::AppState;
use crate::utils::pagination::{Page, PaginationParams};
use crate::utils::response::ApiResponse;

pub fn routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(balance))
        .route("/top-up", post(top_up))
        .route("/transactions", get(transactions))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}

#[derive(Debug, Deserialize, Validate)]
pub struct TopUpRequest {
    #[validate(range(min = 1, message = "Amount must be positive"))]
    pub amount: i64,
}

async fn balance(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<ApiResponse<Wallet>, AppError> {
    Ok(ApiResponse::success(state.wallet.balance(user.id).await?))
}

async fn top_up(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<TopUpRequest>,
) -> Result<ApiResponse<WalletTransaction>, AppError> {
    payload.validate()?;

    let transaction = state.wallet.top_up(user.id, payload.amount).await?;
    Ok(ApiResponse::with_message("Wallet topped up", transaction))
}

async fn transactions(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(pagination): Query<PaginationParams>,
) -> Result<ApiResponse<Page<WalletTransaction>>, AppError> {
    let page = pagination.resolve(&state.config.pagination);
    Ok(ApiResponse::success(state.wallet.transactions(user.id, page).await?))
}
