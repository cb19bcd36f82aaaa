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

use crate::domain::models::activity::{Activity, ActivityFilter, NewActivity};
use crate::domain::models::auth::AuthUser;
use crate::domain::models::enums::{ApprovalStatus, Role};
use crate::domain::services::activity_service::ActivityChanges;
use crate::error::AppError;
use crate::middleware::auth::{optional_auth, require_auth, MaybeUser};
use crate::server::AppState;
use crate::utils::pagination::{Page, PaginationParams};
use crate::utils::response::ApiResponse;

pub fn routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let protected = Router::new()
        .route("/", post(create_activity))
        .route("/mine", get(list_mine))
        .route("/{id}", put(update_activity).delete(delete_activity))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    // 未审核的活动只对所属供应商和管理员可见，所以详情接口识别可选身份
    let detail = Router::new()
        .route("/{id}", get(get_activity))
        .route_layer(middleware::from_fn_with_state(state, optional_auth));

    Router::new()
        .route("/", get(list_activities))
        .merge(detail)
        .merge(protected)
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateActivityRequest {
    pub category_id: Uuid,
    pub destination_id: Uuid,
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[validate(range(min = 0, message = "Price must not be negative"))]
    pub price: i64,
    #[validate(range(min = 1, message = "At least one participant must be allowed"))]
    pub max_participants: i32,
}

impl From<CreateActivityRequest> for NewActivity {
    fn from(req: CreateActivityRequest) -> Self {
        Self {
            category_id: req.category_id,
            destination_id: req.destination_id,
            title: req.title,
            description: req.description,
            price: req.price,
            max_participants: req.max_participants,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StatusFilter {
    pub status: Option<ApprovalStatus>,
}

async fn list_activities(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<ActivityFilter>,
    Query(pagination): Query<PaginationParams>,
) -> Result<ApiResponse<Page<Activity>>, AppError> {
    let page = pagination.resolve(&state.config.pagination);
    let activities = state.activities.list_public(filter, page).await?;
    Ok(ApiResponse::success(activities))
}

async fn get_activity(
    State(state): State<Arc<AppState>>,
    MaybeUser(viewer): MaybeUser,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<Activity>, AppError> {
    let activity = state.activities.get(viewer.as_ref(), id).await?;
    Ok(ApiResponse::success(activity))
}

async fn list_mine(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(filter): Query<StatusFilter>,
    Query(pagination): Query<PaginationParams>,
) -> Result<ApiResponse<Page<Activity>>, AppError> {
    user.require(Role::Vendor)?;

    let page = pagination.resolve(&state.config.pagination);
    let activities = state.activities.list_mine(&user, filter.status, page).await?;
    Ok(ApiResponse::success(activities))
}

async fn create_activity(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<CreateActivityRequest>,
) -> Result<(StatusCode, ApiResponse<Activity>), AppError> {
    user.require(Role::Vendor)?;
    payload.validate()?;

    let activity = state.activities.create(&user, payload.into()).await?;
    Ok((StatusCode::CREATED, ApiResponse::with_message("Activity submitted for review", activity)))
}

async fn update_activity(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ActivityChanges>,
) -> Result<ApiResponse<Activity>, AppError> {
    user.require(Role::Vendor)?;
    payload.validate()?;

    let activity = state.activities.update(&user, id, payload).await?;
    Ok(ApiResponse::with_message("Activity resubmitted for review", activity))
}

async fn delete_activity(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<()>, AppError> {
    user.require_any(&[Role::Vendor, Role::Admin])?;

    state.activities.delete(&user, id).await?;
    Ok(ApiResponse::message("Activity deleted"))
}
