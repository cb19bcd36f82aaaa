use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use crate::config::Config;
use crate::domain::models::activity::{Activity, NewActivity};
use crate::domain::models::enums::Role;
use crate::domain::repositories::mocks::*;
use crate::infrastructure::token_store::MockTokenStore;
use crate::server::{create_app, AppState, Repositories};
use crate::utils::jwt::generate_token;
use crate::utils::pagination::Page;

const SECRET: &str = "router-test-secret";

fn test_config() -> Config {
    let mut config = Config::default();
    config.auth.jwt_secret = SECRET.to_string();
    config
}

fn repositories() -> Repositories {
    Repositories {
        accounts: Arc::new(MockAccountRepo::new()),
        destinations: Arc::new(MockDestinationRepo::new()),
        flights: Arc::new(MockFlightRepo::new()),
        categories: Arc::new(MockCategoryRepo::new()),
        activities: Arc::new(MockActivityRepo::new()),
        subscriptions: Arc::new(MockSubscriptionRepo::new()),
        bookings: Arc::new(MockBookingRepo::new()),
        wallets: Arc::new(MockWalletRepo::new()),
        notifications: Arc::new(MockNotificationRepo::new()),
        chats: Arc::new(MockChatRepo::new()),
    }
}

fn app(repos: Repositories) -> Router {
    let mut tokens = MockTokenStore::new();
    tokens.expect_is_revoked().returning(|_| Ok(false));
    create_app(AppState::new(test_config(), repos, Arc::new(tokens), None))
}

fn bearer(role: Role) -> String {
    let (token, _) = generate_token(Uuid::new_v4(), role, SECRET.as_bytes(), 1).unwrap();
    format!("Bearer {}", token)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn json_request(method: Method, uri: &str, auth: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

#[tokio::test]
async fn health_check_responds() {
    let request = Request::get("/health").body(Body::empty()).unwrap();
    let response = app(repositories()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn protected_routes_require_a_token() {
    let request = Request::get("/api/v1/wallet").body(Body::empty()).unwrap();
    let (status, body) = send(app(repositories()), request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "unauthorized");
}

#[tokio::test]
async fn malformed_tokens_are_rejected() {
    let request = Request::get("/api/v1/notifications")
        .header(header::AUTHORIZATION, "Bearer not-a-jwt")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(app(repositories()), request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn registration_payload_is_validated() {
    let request = json_request(
        Method::POST,
        "/api/v1/auth/register",
        None,
        json!({ "name": "Ana", "email": "not-an-email", "password": "short", "role": "user" }),
    );
    let (status, body) = send(app(repositories()), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation");
}

#[tokio::test]
async fn admin_routes_reject_other_roles() {
    let auth = bearer(Role::Vendor);
    let request = Request::get("/api/v1/admin/accounts")
        .header(header::AUTHORIZATION, auth.as_str())
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app(repositories()), request).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");
}

#[tokio::test]
async fn catalog_writes_are_admin_only() {
    let auth = bearer(Role::User);
    let request = json_request(
        Method::POST,
        "/api/v1/destinations",
        Some(&auth),
        json!({ "name": "Lisbon", "country": "Portugal" }),
    );
    let (status, _) = send(app(repositories()), request).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn public_listing_clamps_pagination() {
    let mut destinations = MockDestinationRepo::new();
    destinations
        .expect_search()
        .withf(|pattern, page| pattern.is_none() && page.page == 2 && page.limit == 100)
        .returning(|_, page| Ok(Page::new(vec![], 0, page)));

    let mut repos = repositories();
    repos.destinations = Arc::new(destinations);

    let request = Request::get("/api/v1/destinations?page=2&limit=500")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app(repos), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["limit"], 100);
    assert_eq!(body["data"]["total"], 0);
}

#[tokio::test]
async fn pending_activities_are_hidden_from_anonymous_visitors() {
    let activity = Activity::new(
        Uuid::new_v4(),
        NewActivity {
            category_id: Uuid::new_v4(),
            destination_id: Uuid::new_v4(),
            title: "Sunset kayak".to_string(),
            description: String::new(),
            price: 4_500,
            max_participants: 8,
        },
    );
    let id = activity.id;

    let mut activities = MockActivityRepo::new();
    activities
        .expect_find_by_id()
        .returning(move |_| Ok(Some(activity.clone())));

    let mut repos = repositories();
    repos.activities = Arc::new(activities);

    let request = Request::get(format!("/api/v1/activities/{}", id))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(app(repos), request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn top_up_amount_must_be_positive() {
    let auth = bearer(Role::User);
    let request = json_request(Method::POST, "/api/v1/wallet/top-up", Some(&auth), json!({ "amount": 0 }));
    let (status, body) = send(app(repositories()), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation");
}

