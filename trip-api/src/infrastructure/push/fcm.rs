use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{PushMessage, PushSender};
use crate::config::PushConfig;
use crate::error::{AppError, AppResult};

/// Firebase Cloud Messaging HTTP 客户端
pub struct FcmPushSender {
    client: reqwest::Client,
    endpoint: String,
    server_key: String,
}

impl FcmPushSender {
    pub fn new(config: &PushConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AppError::Push(format!("failed to build http client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            server_key: config.server_key.clone(),
        })
    }

    fn payload(message: &PushMessage) -> Value {
        json!({
            "message": {
                "token": message.token,
                "notification": {
                    "title": message.title,
                    "body": message.body,
                },
                "data": message.data,
            }
        })
    }
}

#[async_trait]
impl PushSender for FcmPushSender {
    async fn send(&self, message: &PushMessage) -> AppResult<()> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.server_key)
            .json(&Self::payload(message))
            .send()
            .await
            .map_err(|e| AppError::Push(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Push(format!("FCM responded {}: {}", status, body)));
        }

        tracing::debug!(title = %message.title, "push delivered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn payload_follows_fcm_message_shape() {
        let message = PushMessage {
            token: "device-1".to_string(),
            title: "Booking confirmed".to_string(),
            body: "See you in Bali".to_string(),
            data: HashMap::from([("kind".to_string(), "booking".to_string())]),
        };

        let payload = FcmPushSender::payload(&message);
        assert_eq!(payload["message"]["token"], "device-1");
        assert_eq!(payload["message"]["notification"]["title"], "Booking confirmed");
        assert_eq!(payload["message"]["data"]["kind"], "booking");
    }
}
