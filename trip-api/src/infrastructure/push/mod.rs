use std::collections::HashMap;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::AppResult;

pub mod fcm;

pub use fcm::FcmPushSender;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PushMessage {
    pub token: String,
    pub title: String,
    pub body: String,
    pub data: HashMap<String, String>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PushSender: Send + Sync {
    async fn send(&self, message: &PushMessage) -> AppResult<()>;
}
