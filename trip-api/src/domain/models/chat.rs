use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const MAX_MESSAGE_LEN: usize = 2000;

/// 一个用户与一个供应商之间唯一的会话
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Conversation {
    pub id: Uuid,
    pub user_id: Uuid,
    pub vendor_id: Uuid,
    pub last_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    pub fn new(user_id: Uuid, vendor_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            vendor_id,
            last_message: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn has_participant(&self, account_id: Uuid) -> bool {
        self.user_id == account_id || self.vendor_id == account_id
    }

    /// 会话中另一方的 id；非参与者返回 `None`
    pub fn counterpart(&self, account_id: Uuid) -> Option<Uuid> {
        if account_id == self.user_id {
            Some(self.vendor_id)
        } else if account_id == self.vendor_id {
            Some(self.user_id)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Message {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub sender_id: Uuid,
    pub body: String,
    #[sqlx(rename = "is_read")]
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn new(conversation_id: Uuid, sender_id: Uuid, body: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            conversation_id,
            sender_id,
            body: body.to_string(),
            read: false,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConversationSummary {
    #[serde(flatten)]
    pub conversation: Conversation,
    pub unread: u64,
}
