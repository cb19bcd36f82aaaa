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
use crate::domain::models::destination::Destination;
use crate::domain::models::enums::Role;
use crate::domain::services::destination_service::DestinationChanges;
use crate::error::AppError;
use crate::middleware::auth::require_auth;
use crate::server::AppState;
use crate::utils::pagination::{Page, PaginationParams};
use crate::utils::response::ApiResponse;

pub fn routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let protected = Router::new()
        .route("/", post(create_destination))
        .route("/{id}", put(update_destination).delete(delete_destination))
        .route_layer(middleware::from_fn_with_state(state, require_auth));

    Router::new()
        .route("/", get(list_destinations))
        .route("/{id}", get(get_destination))
        .merge(protected)
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateDestinationRequest {
    #[validate(length(min = 1, max = 160, message = "Name must be 1-160 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 120, message = "Country must be 1-120 characters"))]
    pub country: String,
    #[serde(default)]
    pub description: String,
    #[validate(url(message = "Image URL must be a valid URL"))]
    pub image_url: Option<String>,
}

async fn list_destinations(
    State(state): State<Arc<AppState>>,
    Query(search): Query<SearchQuery>,
    Query(pagination): Query<PaginationParams>,
) -> Result<ApiResponse<Page<Destination>>, AppError> {
    let page = pagination.resolve(&state.config.pagination);
    let destinations = state.destinations.list(search.q.as_deref(), page).await?;
    Ok(ApiResponse::success(destinations))
}

async fn get_destination(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<Destination>, AppError> {
    let destination = state.destinations.get(id).await?;
    Ok(ApiResponse::success(destination))
}

async fn create_destination(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<CreateDestinationRequest>,
) -> Result<(StatusCode, ApiResponse<Destination>), AppError> {
    user.require(Role::Admin)?;
    payload.validate()?;

    let destination = state
        .destinations
        .create(&payload.name, &payload.country, &payload.description, payload.image_url)
        .await?;
    Ok((StatusCode::CREATED, ApiResponse::with_message("Destination created", destination)))
}

async fn update_destination(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<DestinationChanges>,
) -> Result<ApiResponse<Destination>, AppError> {
    user.require(Role::Admin)?;
    payload.validate()?;

    let destination = state.destinations.update(id, payload).await?;
    Ok(ApiResponse::with_message("Destination updated", destination))
}

async fn delete_destination(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<()>, AppError> {
    user.require(Role::Admin)?;

    state.destinations.delete(id).await?;
    Ok(ApiResponse::message("Destination deleted"))
}
