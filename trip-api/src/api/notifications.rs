use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    middleware,
    routing::{delete, get, patch},
    Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::models::auth::AuthUser;
use crate::domain::models::notification::Notification;
use crate::error::AppError;
use crate::middleware::auth::require_auth;
use crate::server::AppState;
use crate::utils::pagination::{Page, PaginationParams};
use crate::utils::response::ApiResponse;

pub fn routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_notifications))
        .route("/unread-count", get(unread_count))
        .route("/read-all", patch(mark_all_read))
        .route("/{id}", delete(delete_notification))
        .route("/{id}/read", patch(mark_read))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}

#[derive(Debug, Default, Deserialize)]
pub struct NotificationFilter {
    #[serde(default)]
    pub unread_only: bool,
}

#[derive(Debug, Serialize)]
pub struct UnreadCount {
    pub unread: u64,
}

async fn list_notifications(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(filter): Query<NotificationFilter>,
    Query(pagination): Query<PaginationParams>,
) -> Result<ApiResponse<Page<Notification>>, AppError> {
    let page = pagination.resolve(&state.config.pagination);
    let notifications = state.notifications.list(&user, filter.unread_only, page).await?;
    Ok(ApiResponse::success(notifications))
}

async fn unread_count(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<ApiResponse<UnreadCount>, AppError> {
    let unread = state.notifications.unread_count(&user).await?;
    Ok(ApiResponse::success(UnreadCount { unread }))
}

async fn mark_read(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<()>, AppError> {
    state.notifications.mark_read(&user, id).await?;
    Ok(ApiResponse::message("Notification marked as read"))
}

async fn mark_all_read(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<ApiResponse<UnreadCount>, AppError> {
    state.notifications.mark_all_read(&user).await?;
    Ok(ApiResponse::with_message("All notifications marked as read", UnreadCount { unread: 0 }))
}

async fn delete_notification(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<()>, AppError> {
    state.notifications.delete(&user, id).await?;
    Ok(ApiResponse::message("Notification deleted"))
}
