use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::domain::models::auth::AuthUser;
use crate::domain::models::enums::Role;
use crate::domain::models::flight::{Flight, NewFlight};
use crate::domain::services::flight_service::FlightChanges;
use crate::error::AppError;
use crate::middleware::auth::require_auth;
use crate::server::AppState;
use crate::utils::pagination::{Page, PaginationParams};
use crate::utils::response::ApiResponse;

pub fn routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let protected = Router::new()
        .route("/", post(create_flight))
        .route("/{id}", put(update_flight).delete(delete_flight))
        .route_layer(middleware::from_fn_with_state(state, require_auth));

    Router::new()
        .route("/", get(search_flights))
        .route("/{id}", get(get_flight))
        .merge(protected)
}

#[derive(Debug, Deserialize)]
pub struct FlightSearch {
    pub origin: Option<String>,
    pub destination: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateFlightRequest {
    #[validate(length(min = 1, max = 120))]
    pub airline: String,
    #[validate(length(min = 1, max = 16))]
    pub flight_number: String,
    #[validate(length(min = 1, max = 120))]
    pub origin: String,
    #[validate(length(min = 1, max = 120))]
    pub destination: String,
    pub departure_at: DateTime<Utc>,
    pub arrival_at: DateTime<Utc>,
    #[validate(range(min = 0, message = "Price must not be negative"))]
    pub price: i64,
    #[validate(range(min = 0, message = "Seats must not be negative"))]
    pub seats_available: i32,
}

impl From<CreateFlightRequest> for NewFlight {
    fn from(req: CreateFlightRequest) -> Self {
        Self {
            airline: req.airline,
            flight_number: req.flight_number,
            origin: req.origin,
            destination: req.destination,
            departure_at: req.departure_at,
            arrival_at: req.arrival_at,
            price: req.price,
            seats_available: req.seats_available,
        }
    }
}

async fn search_flights(
    State(state): State<Arc<AppState>>,
    Query(search): Query<FlightSearch>,
    Query(pagination): Query<PaginationParams>,
) -> Result<ApiResponse<Page<Flight>>, AppError> {
    let page = pagination.resolve(&state.config.pagination);
    let flights = state
        .flights
        .search(search.origin.as_deref(), search.destination.as_deref(), page)
        .await?;
    Ok(ApiResponse::success(flights))
}

async fn get_flight(State(state): State<Arc<AppState>>, Path(id): Path<Uuid>) -> Result<ApiResponse<Flight>, AppError> {
    let flight = state.flights.get(id).await?;
    Ok(ApiResponse::success(flight))
}

async fn create_flight(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<CreateFlightRequest>,
) -> Result<(StatusCode, ApiResponse<Flight>), AppError> {
    user.require(Role::Admin)?;
    payload.validate()?;

    let flight = state.flights.create(payload.into()).await?;
    Ok((StatusCode::CREATED, ApiResponse::with_message("Flight created", flight)))
}

async fn update_flight(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<FlightChanges>,
) -> Result<ApiResponse<Flight>, AppError> {
    user.require(Role::Admin)?;
    payload.validate()?;

    let flight = state.flights.update(id, payload).await?;
    Ok(ApiResponse::with_message("Flight updated", flight))
}

async fn delete_flight(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<()>, AppError> {
    user.require(Role::Admin)?;

    state.flights.delete(id).await?;
    Ok(ApiResponse::message("Flight deleted"))
}
