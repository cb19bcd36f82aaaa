use std::sync::Arc;

use trip_api::config::Config;
use trip_api::infrastructure::database::{mysql::init_mysql, redis::init_redis};
use trip_api::infrastructure::push::{FcmPushSender, PushSender};
use trip_api::infrastructure::token_store::RedisTokenStore;
use trip_api::logging::init_logging;
use trip_api::server::{create_app, AppState, Repositories};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载环境变量
    dotenvy::dotenv().ok();

    let config = Config::load()?;
    init_logging(&config)?;

    tracing::info!("Starting trip marketplace API");

    let db_pool = init_mysql(&config).await?;
    let redis = init_redis(&config).await?;

    let push: Option<Arc<dyn PushSender>> = if config.push.enabled {
        Some(Arc::new(FcmPushSender::new(&config.push)?))
    } else {
        tracing::info!("Push delivery disabled");
        None
    };

    let app_state = AppState::new(
        config.clone(),
        Repositories::mysql(db_pool),
        Arc::new(RedisTokenStore::new(redis)),
        push,
    );

    let app = create_app(app_state);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", &addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
