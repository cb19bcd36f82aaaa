use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    routing::{get, patch, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::domain::models::auth::AuthUser;
use crate::domain::models::booking::Booking;
use crate::error::AppError;
use crate::middleware::auth::require_auth;
use crate::server::AppState;
use crate::utils::pagination::{Page, PaginationParams};
use crate::utils::response::ApiResponse;

pub fn routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_booking))
        .route("/mine", get(list_mine))
        .route("/vendor", get(list_for_vendor))
        .route("/{id}", get(get_booking))
        .route("/{id}/cancel", patch(cancel_booking))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}

#[derive(Debug, Deserialize, Validate)]
pub struct BookingRequest {
    pub activity_id: Uuid,
    #[validate(range(min = 1, message = "At least one participant is required"))]
    pub participants: i32,
    pub travel_date: NaiveDate,
}

async fn create_booking(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<BookingRequest>,
) -> Result<(StatusCode, ApiResponse<Booking>), AppError> {
    payload.validate()?;

    let booking = state
        .bookings
        .create(&user, payload.activity_id, payload.participants, payload.travel_date)
        .await?;
    Ok((StatusCode::CREATED, ApiResponse::with_message("Booking confirmed", booking)))
}

async fn list_mine(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(pagination): Query<PaginationParams>,
) -> Result<ApiResponse<Page<Booking>>, AppError> {
    let page = pagination.resolve(&state.config.pagination);
    Ok(ApiResponse::success(state.bookings.list_mine(&user, page).await?))
}

async fn list_for_vendor(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(pagination): Query<PaginationParams>,
) -> Result<ApiResponse<Page<Booking>>, AppError> {
    let page = pagination.resolve(&state.config.pagination);
    Ok(ApiResponse::success(state.bookings.list_for_vendor(&user, page).await?))
}

async fn get_booking(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<Booking>, AppError> {
    Ok(ApiResponse::success(state.bookings.get(&user, id).await?))
}

async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<Booking>, AppError> {
    let booking = state.bookings.cancel(&user, id).await?;
    Ok(ApiResponse::with_message("Booking cancelled and refunded", booking))
}
