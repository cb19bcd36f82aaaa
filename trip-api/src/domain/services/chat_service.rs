use std::sync::Arc;

use tokio::sync::broadcast;
use uuid::Uuid;

use crate::domain::models::auth::AuthUser;
use crate::domain::models::chat::{Conversation, ConversationSummary, Message, MAX_MESSAGE_LEN};
use crate::domain::models::enums::{NotificationKind, Role};
use crate::domain::repositories::{AccountRepository, ChatRepository};
use crate::domain::services::account_not_found;
use crate::domain::services::notification_service::NotificationService;
use crate::error::{AppError, AppResult};
use crate::infrastructure::chat_hub::ChatHub;
use crate::utils::pagination::{Page, PageRequest};

pub struct ChatService {
    chats: Arc<dyn ChatRepository>,
    accounts: Arc<dyn AccountRepository>,
    hub: Arc<ChatHub>,
    notifications: Arc<NotificationService>,
}

impl ChatService {
    pub fn new(
        chats: Arc<dyn ChatRepository>,
        accounts: Arc<dyn AccountRepository>,
        hub: Arc<ChatHub>,
        notifications: Arc<NotificationService>,
    ) -> Self {
        Self {
            chats,
            accounts,
            hub,
            notifications,
        }
    }

    /// 用户与供应商之间只有一个会话，已存在时直接返回
    pub async fn open(&self, user: &AuthUser, vendor_id: Uuid) -> AppResult<Conversation> {
        user.require(Role::User)?;

        let vendor = self
            .accounts
            .find_by_id(vendor_id)
            .await?
            .ok_or_else(|| account_not_found(vendor_id))?;
        if vendor.role != Role::Vendor {
            return Err(AppError::BadRequest("Conversations can only be opened with a vendor".to_string()));
        }

        if let Some(existing) = self.chats.find_between(user.id, vendor_id).await? {
            return Ok(existing);
        }

        let conversation = Conversation::new(user.id, vendor_id);
        match self.chats.create_conversation(&conversation).await {
            Ok(()) => {
                tracing::info!(conversation = %conversation.id, "conversation opened");
                Ok(conversation)
            }
            // 并发打开时唯一键冲突，读取对方刚创建的会话
            Err(AppError::Conflict(_)) => self
                .chats
                .find_between(user.id, vendor_id)
                .await?
                .ok_or_else(|| AppError::Internal("Conversation vanished after conflict".to_string())),
            Err(e) => Err(e),
        }
    }

    pub async fn list(&self, user: &AuthUser) -> AppResult<Vec<ConversationSummary>> {
        self.chats.list_for(user.id).await
    }

    pub async fn messages(&self, user: &AuthUser, conversation_id: Uuid, page: PageRequest) -> AppResult<Page<Message>> {
        self.participant_of(user, conversation_id).await?;
        self.chats.list_messages(conversation_id, page).await
    }

    pub async fn send(&self, user: &AuthUser, conversation_id: Uuid, body: &str) -> AppResult<Message> {
        let body = body.trim();
        if body.is_empty() {
            return Err(AppError::Validation("Message cannot be empty".to_string()));
        }
        if body.chars().count() > MAX_MESSAGE_LEN {
            return Err(AppError::Validation(format!(
                "Message cannot exceed {} characters",
                MAX_MESSAGE_LEN
            )));
        }

        let conversation = self.participant_of(user, conversation_id).await?;
        let message = Message::new(conversation_id, user.id, body);
        self.chats.insert_message(&message).await?;

        let listeners = self.hub.publish(&message);
        tracing::debug!(conversation = %conversation_id, listeners, "message published");

        if let Some(recipient) = conversation.counterpart(user.id) {
            if let Err(e) = self
                .notifications
                .notify(recipient, NotificationKind::Chat, "New message", preview(body))
                .await
            {
                tracing::warn!(conversation = %conversation_id, error = %e, "chat notification failed");
            }
        }

        Ok(message)
    }

    pub async fn mark_read(&self, user: &AuthUser, conversation_id: Uuid) -> AppResult<u64> {
        self.participant_of(user, conversation_id).await?;
        self.chats.mark_read(conversation_id, user.id).await
    }

    /// WebSocket 订阅入口，只允许会话参与者
    pub async fn subscribe(&self, user: &AuthUser, conversation_id: Uuid) -> AppResult<broadcast::Receiver<Message>> {
        self.participant_of(user, conversation_id).await?;
        Ok(self.hub.subscribe(conversation_id))
    }

    pub fn unsubscribe(&self, conversation_id: Uuid) {
        self.hub.release(conversation_id);
    }

    async fn participant_of(&self, user: &AuthUser, conversation_id: Uuid) -> AppResult<Conversation> {
        let conversation = self
            .chats
            .find_conversation(conversation_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Conversation with ID {} not found", conversation_id)))?;

        if !conversation.has_participant(user.id) {
            return Err(AppError::Forbidden("You are not part of this conversation".to_string()));
        }
        Ok(conversation)
    }
}

fn preview(body: &str) -> &str {
    match body.char_indices().nth(120) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
