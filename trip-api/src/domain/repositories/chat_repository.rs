use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::models::chat::{Conversation, ConversationSummary, Message};
use crate::error::AppResult;
use crate::utils::pagination::{Page, PageRequest};

#[async_trait]
pub trait ChatRepository: Send + Sync {
    async fn find_conversation(&self, id: Uuid) -> AppResult<Option<Conversation>>;

    async fn find_between(&self, user_id: Uuid, vendor_id: Uuid) -> AppResult<Option<Conversation>>;

    async fn create_conversation(&self, conversation: &Conversation) -> AppResult<()>;

    /// 最近活跃的会话在前，附带对方发来的未读数
    async fn list_for(&self, account_id: Uuid) -> AppResult<Vec<ConversationSummary>>;

    /// 写入消息并刷新会话的 `last_message` / `updated_at`
    async fn insert_message(&self, message: &Message) -> AppResult<()>;

    /// 页内按时间正序
    async fn list_messages(&self, conversation_id: Uuid, page: PageRequest) -> AppResult<Page<Message>>;

    /// 把对方发来的消息标记为已读，返回变更条数
    async fn mark_read(&self, conversation_id: Uuid, reader_id: Uuid) -> AppResult<u64>;
}
