use redis::aio::ConnectionManager;

use crate::config::Config;
use crate::error::AppError;

pub async fn init_redis(config: &Config) -> Result<ConnectionManager, AppError> {
    tracing::info!("Initializing Redis connection");

    let client = redis::Client::open(config.redis.url.as_str())?;
    let mut manager = client.get_connection_manager().await?;

    // 测试连接
    let _: String = redis::cmd("PING").query_async(&mut manager).await?;

    Ok(manager)
}
