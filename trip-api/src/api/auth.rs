use std::sync::Arc;

use axum::{extract::State, http::StatusCode, middleware, routing::post, Json, Router};
use serde::Deserialize;
use validator::Validate;

use crate::domain::models::auth::AuthUser;
use crate::domain::models::enums::Role;
use crate::domain::services::auth_service::{AuthToken, Registration};
use crate::error::AppError;
use crate::middleware::auth::require_auth;
use crate::server::AppState;
use crate::utils::response::ApiResponse;

pub fn routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let protected = Router::new()
        .route("/logout", post(logout))
        .route_layer(middleware::from_fn_with_state(state, require_auth));

    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .merge(protected)
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 120, message = "Name must be 1-120 characters"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, ApiResponse<AuthToken>), AppError> {
    // 验证请求
    payload.validate()?;

    let token = state
        .auth
        .register(Registration {
            name: payload.name,
            email: payload.email,
            password: payload.password,
            role: payload.role,
        })
        .await?;

    Ok((StatusCode::CREATED, ApiResponse::with_message("Registered", token)))
}

async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<ApiResponse<AuthToken>, AppError> {
    payload.validate()?;

    let token = state.auth.login(&payload.email, &payload.password).await?;
    Ok(ApiResponse::with_message("Logged in", token))
}

async fn logout(State(state): State<Arc<AppState>>, user: AuthUser) -> Result<ApiResponse<()>, AppError> {
    state.auth.logout(&user).await?;
    Ok(ApiResponse::message("Logged out"))
}
