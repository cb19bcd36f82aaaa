use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter};

use crate::config::{Config, LoggingConfig};
use crate::error::AppError;

/// `RUST_LOG` 优先于配置文件中的级别
pub fn init_logging(config: &Config) -> Result<(), AppError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| configured_filter(&config.logging));

    let layer = if config.logging.format.eq_ignore_ascii_case("json") {
        fmt::layer()
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .with_span_list(false)
            .boxed()
    } else {
        fmt::layer().pretty().with_target(false).boxed()
    };

    registry()
        .with(filter)
        .with(layer)
        .try_init()
        .map_err(|e| AppError::Internal(format!("Failed to initialize logging: {}", e)))
}

// 无法解析的级别退回 info
fn configured_filter(logging: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_new(&logging.level).unwrap_or_else(|e| {
        eprintln!("invalid logging.level {:?}: {}, falling back to info", logging.level, e);
        EnvFilter::new("info")
    })
}
