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
use crate::domain::models::category::Category;
use crate::domain::models::enums::Role;
use crate::error::AppError;
use crate::middleware::auth::require_auth;
use crate::server::AppState;
use crate::utils::pagination::{Page, PaginationParams};
use crate::utils::response::ApiResponse;

pub fn routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let protected = Router::new()
        .route("/", post(create_category))
        .route("/{id}", put(update_category).delete(delete_category))
        .route_layer(middleware::from_fn_with_state(state, require_auth));

    Router::new().route("/", get(list_categories)).merge(protected)
}

#[derive(Debug, Deserialize, Validate)]
pub struct CategoryRequest {
    #[validate(length(max = 120, message = "Name cannot exceed 120 characters"))]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCategoryRequest {
    #[validate(length(max = 120, message = "Name cannot exceed 120 characters"))]
    pub name: Option<String>,
    pub description: Option<String>,
}

async fn list_categories(
    State(state): State<Arc<AppState>>,
    Query(pagination): Query<PaginationParams>,
) -> Result<ApiResponse<Page<Category>>, AppError> {
    let page = pagination.resolve(&state.config.pagination);
    let categories = state.categories.list(page).await?;
    Ok(ApiResponse::success(categories))
}

async fn create_category(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<CategoryRequest>,
) -> Result<(StatusCode, ApiResponse<Category>), AppError> {
    user.require(Role::Admin)?;
    payload.validate()?;

    let category = state.categories.create(&payload.name, payload.description).await?;
    Ok((StatusCode::CREATED, ApiResponse::with_message("Category created", category)))
}

async fn update_category(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCategoryRequest>,
) -> Result<ApiResponse<Category>, AppError> {
    user.require(Role::Admin)?;
    payload.validate()?;

    let category = state
        .categories
        .update(id, payload.name.as_deref(), payload.description)
        .await?;
    Ok(ApiResponse::with_message("Category updated", category))
}

async fn delete_category(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<()>, AppError> {
    user.require(Role::Admin)?;

    state.categories.delete(id).await?;
    Ok(ApiResponse::message("Category deleted"))
}
