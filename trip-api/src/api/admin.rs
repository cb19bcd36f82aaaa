use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    middleware,
    routing::{get, patch},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::domain::models::account::Account;
use crate::domain::models::activity::Activity;
use crate::domain::models::enums::{ApprovalStatus, Role};
use crate::error::AppError;
use crate::middleware::auth::{require_admin, require_auth};
use crate::server::AppState;
use crate::utils::pagination::{Page, PaginationParams};
use crate::utils::response::ApiResponse;

pub fn routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/accounts", get(list_accounts))
        .route("/accounts/{id}/block", patch(block_account))
        .route("/accounts/{id}/unblock", patch(unblock_account))
        .route("/vendors/{id}/approve", patch(approve_vendor))
        .route("/vendors/{id}/reject", patch(reject_vendor))
        .route("/activities", get(list_activities))
        .route("/activities/{id}/approve", patch(approve_activity))
        .route("/activities/{id}/reject", patch(reject_activity))
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}

#[derive(Debug, Deserialize)]
pub struct AccountFilter {
    pub role: Option<Role>,
    pub status: Option<ApprovalStatus>,
}

#[derive(Debug, Deserialize)]
pub struct ModerationFilter {
    pub status: Option<ApprovalStatus>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RejectRequest {
    #[validate(length(min = 1, max = 500, message = "Reason must be 1-500 characters"))]
    pub reason: String,
}

/// 默认列出供应商
async fn list_accounts(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<AccountFilter>,
    Query(pagination): Query<PaginationParams>,
) -> Result<ApiResponse<Page<Account>>, AppError> {
    let page = pagination.resolve(&state.config.pagination);
    let accounts = state
        .accounts
        .list_accounts(filter.role.unwrap_or(Role::Vendor), filter.status, page)
        .await?;
    Ok(ApiResponse::success(accounts))
}

async fn block_account(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<Account>, AppError> {
    let account = state.accounts.set_blocked(id, true).await?;
    Ok(ApiResponse::with_message("Account blocked", account))
}

async fn unblock_account(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<Account>, AppError> {
    let account = state.accounts.set_blocked(id, false).await?;
    Ok(ApiResponse::with_message("Account unblocked", account))
}

async fn approve_vendor(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<Account>, AppError> {
    let account = state.accounts.approve_vendor(id).await?;
    Ok(ApiResponse::with_message("Vendor approved", account))
}

async fn reject_vendor(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<Account>, AppError> {
    let account = state.accounts.reject_vendor(id).await?;
    Ok(ApiResponse::with_message("Vendor rejected", account))
}

/// 默认列出待审核的活动
async fn list_activities(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<ModerationFilter>,
    Query(pagination): Query<PaginationParams>,
) -> Result<ApiResponse<Page<Activity>>, AppError> {
    let page = pagination.resolve(&state.config.pagination);
    let activities = state
        .activities
        .list_for_moderation(filter.status.unwrap_or(ApprovalStatus::Pending), page)
        .await?;
    Ok(ApiResponse::success(activities))
}

async fn approve_activity(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<Activity>, AppError> {
    let activity = state.activities.approve(id).await?;
    Ok(ApiResponse::with_message("Activity approved", activity))
}

async fn reject_activity(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RejectRequest>,
) -> Result<ApiResponse<Activity>, AppError> {
    payload.validate()?;

    let activity = state.activities.reject(id, &payload.reason).await?;
    Ok(ApiResponse::with_message("Activity rejected", activity))
}
