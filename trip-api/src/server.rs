use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Router};
use sqlx::MySqlPool;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::api;
use crate::config::Config;
use crate::domain::repositories::{
    AccountRepository, ActivityRepository, BookingRepository, CategoryRepository, ChatRepository,
    DestinationRepository, FlightRepository, NotificationRepository, SubscriptionRepository, WalletRepository,
};
use crate::domain::services::{
    AccountService, ActivityService, AuthService, BookingService, CategoryService, ChatService,
    DestinationService, FlightService, NotificationService, SubscriptionService, WalletService,
};
use crate::infrastructure::chat_hub::ChatHub;
use crate::infrastructure::push::PushSender;
use crate::infrastructure::repositories::{
    MySqlAccountRepository, MySqlActivityRepository, MySqlBookingRepository, MySqlCategoryRepository,
    MySqlChatRepository, MySqlDestinationRepository, MySqlFlightRepository, MySqlNotificationRepository,
    MySqlSubscriptionRepository, MySqlWalletRepository,
};
use crate::infrastructure::token_store::TokenStore;

/// 服务组装所需的全部仓储
#[derive(Clone)]
pub struct Repositories {
    pub accounts: Arc<dyn AccountRepository>,
    pub destinations: Arc<dyn DestinationRepository>,
    pub flights: Arc<dyn FlightRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub activities: Arc<dyn ActivityRepository>,
    pub subscriptions: Arc<dyn SubscriptionRepository>,
    pub bookings: Arc<dyn BookingRepository>,
    pub wallets: Arc<dyn WalletRepository>,
    pub notifications: Arc<dyn NotificationRepository>,
    pub chats: Arc<dyn ChatRepository>,
}

impl Repositories {
    pub fn mysql(pool: MySqlPool) -> Self {
        Self {
            accounts: Arc::new(MySqlAccountRepository::new(pool.clone())),
            destinations: Arc::new(MySqlDestinationRepository::new(pool.clone())),
            flights: Arc::new(MySqlFlightRepository::new(pool.clone())),
            categories: Arc::new(MySqlCategoryRepository::new(pool.clone())),
            activities: Arc::new(MySqlActivityRepository::new(pool.clone())),
            subscriptions: Arc::new(MySqlSubscriptionRepository::new(pool.clone())),
            bookings: Arc::new(MySqlBookingRepository::new(pool.clone())),
            wallets: Arc::new(MySqlWalletRepository::new(pool.clone())),
            notifications: Arc::new(MySqlNotificationRepository::new(pool.clone())),
            chats: Arc::new(MySqlChatRepository::new(pool)),
        }
    }
}

pub struct AppState {
    pub config: Config,
    pub auth: Arc<AuthService>,
    pub accounts: Arc<AccountService>,
    pub destinations: Arc<DestinationService>,
    pub flights: Arc<FlightService>,
    pub categories: Arc<CategoryService>,
    pub activities: Arc<ActivityService>,
    pub subscriptions: Arc<SubscriptionService>,
    pub bookings: Arc<BookingService>,
    pub wallet: Arc<WalletService>,
    pub notifications: Arc<NotificationService>,
    pub chat: Arc<ChatService>,
}

impl AppState {
    pub fn new(
        config: Config,
        repos: Repositories,
        tokens: Arc<dyn TokenStore>,
        push: Option<Arc<dyn PushSender>>,
    ) -> Self {
        let notifications = Arc::new(NotificationService::new(
            repos.notifications.clone(),
            repos.accounts.clone(),
            push,
        ));
        let wallet = Arc::new(WalletService::new(repos.wallets.clone()));

        Self {
            auth: Arc::new(AuthService::new(
                repos.accounts.clone(),
                tokens,
                notifications.clone(),
                config.auth.clone(),
            )),
            accounts: Arc::new(AccountService::new(repos.accounts.clone(), notifications.clone())),
            destinations: Arc::new(DestinationService::new(repos.destinations.clone())),
            flights: Arc::new(FlightService::new(repos.flights.clone())),
            categories: Arc::new(CategoryService::new(
                repos.categories.clone(),
                repos.accounts.clone(),
                notifications.clone(),
            )),
            activities: Arc::new(ActivityService::new(
                repos.activities.clone(),
                repos.categories.clone(),
                repos.destinations.clone(),
                repos.accounts.clone(),
                notifications.clone(),
            )),
            subscriptions: Arc::new(SubscriptionService::new(
                repos.subscriptions.clone(),
                repos.accounts.clone(),
                wallet.clone(),
            )),
            bookings: Arc::new(BookingService::new(
                repos.bookings.clone(),
                repos.activities.clone(),
                wallet.clone(),
                notifications.clone(),
            )),
            chat: Arc::new(ChatService::new(
                repos.chats.clone(),
                repos.accounts.clone(),
                Arc::new(ChatHub::default()),
                notifications.clone(),
            )),
            wallet,
            notifications,
            config,
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    let app_state = Arc::new(state);
    let timeout = Duration::from_secs(app_state.config.server.request_timeout_secs);

    // 健康检查路由
    let health_route = Router::new().route("/health", get(|| async { "OK" }));

    // WebSocket 长连接不受请求超时限制
    let realtime_routes = Router::new().route("/api/v1/chat/ws/{id}", get(api::chat::websocket));

    // API 路由
    let api_routes = Router::new()
        .nest("/auth", api::auth::routes(app_state.clone()))
        .nest("/accounts", api::accounts::routes(app_state.clone()))
        .nest("/admin", api::admin::routes(app_state.clone()))
        .nest("/destinations", api::destinations::routes(app_state.clone()))
        .nest("/flights", api::flights::routes(app_state.clone()))
        .nest("/categories", api::categories::routes(app_state.clone()))
        .nest("/activities", api::activities::routes(app_state.clone()))
        .nest("/subscriptions", api::subscriptions::routes(app_state.clone()))
        .nest("/bookings", api::bookings::routes(app_state.clone()))
        .nest("/chat", api::chat::routes(app_state.clone()))
        .nest("/notifications", api::notifications::routes(app_state.clone()))
        .nest("/wallet", api::wallet::routes(app_state.clone()))
        .layer(TimeoutLayer::new(timeout));

    // 组合所有路由
    Router::new()
        .nest("/api/v1", api_routes)
        .merge(realtime_routes)
        .merge(health_route)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .with_state(app_state)
}
