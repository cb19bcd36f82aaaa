use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::domain::models::auth::AuthUser;
use crate::domain::models::enums::Role;
use crate::domain::models::subscription::{SubscriptionPlan, VendorSubscription};
use crate::domain::services::subscription_service::PlanChanges;
use crate::error::AppError;
use crate::middleware::auth::require_auth;
use crate::server::AppState;
use crate::utils::pagination::{Page, PaginationParams};
use crate::utils::response::ApiResponse;

pub fn routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let protected = Router::new()
        .route("/plans", post(create_plan))
        .route("/plans/{id}", put(update_plan).delete(delete_plan))
        .route("/plans/{id}/subscribe", post(subscribe))
        .route("/mine", get(my_subscriptions))
        .route("/current", get(current_subscription))
        .route_layer(middleware::from_fn_with_state(state, require_auth));

    Router::new().route("/plans", get(list_plans)).merge(protected)
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePlanRequest {
    #[validate(length(min = 1, max = 120, message = "Name must be 1-120 characters"))]
    pub name: String,
    pub description: Option<String>,
    #[validate(range(min = 0, message = "Price must not be negative"))]
    pub price: i64,
    #[validate(range(min = 1, message = "Duration must be at least one day"))]
    pub duration_days: i32,
}

async fn list_plans(
    State(state): State<Arc<AppState>>,
    Query(pagination): Query<PaginationParams>,
) -> Result<ApiResponse<Page<SubscriptionPlan>>, AppError> {
    let page = pagination.resolve(&state.config.pagination);
    let plans = state.subscriptions.list_plans(page).await?;
    Ok(ApiResponse::success(plans))
}

async fn create_plan(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<CreatePlanRequest>,
) -> Result<(StatusCode, ApiResponse<SubscriptionPlan>), AppError> {
    user.require(Role::Admin)?;
    payload.validate()?;

    let plan = state
        .subscriptions
        .create_plan(&payload.name, payload.description, payload.price, payload.duration_days)
        .await?;
    Ok((StatusCode::CREATED, ApiResponse::with_message("Plan created", plan)))
}

async fn update_plan(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<PlanChanges>,
) -> Result<ApiResponse<SubscriptionPlan>, AppError> {
    user.require(Role::Admin)?;
    payload.validate()?;

    let plan = state.subscriptions.update_plan(id, payload).await?;
    Ok(ApiResponse::with_message("Plan updated", plan))
}

async fn delete_plan(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<()>, AppError> {
    user.require(Role::Admin)?;

    state.subscriptions.delete_plan(id).await?;
    Ok(ApiResponse::message("Plan deleted"))
}

async fn subscribe(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(plan_id): Path<Uuid>,
) -> Result<(StatusCode, ApiResponse<VendorSubscription>), AppError> {
    let subscription = state.subscriptions.subscribe(&user, plan_id).await?;
    Ok((StatusCode::CREATED, ApiResponse::with_message("Subscribed", subscription)))
}

async fn my_subscriptions(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(pagination): Query<PaginationParams>,
) -> Result<ApiResponse<Page<VendorSubscription>>, AppError> {
    user.require(Role::Vendor)?;

    let page = pagination.resolve(&state.config.pagination);
    let subscriptions = state.subscriptions.my_subscriptions(&user, page).await?;
    Ok(ApiResponse::success(subscriptions))
}

async fn current_subscription(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<ApiResponse<Option<VendorSubscription>>, AppError> {
    user.require(Role::Vendor)?;

    let current = state.subscriptions.current(&user).await?;
    Ok(ApiResponse::success(current))
}
