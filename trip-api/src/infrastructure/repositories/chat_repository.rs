use async_trait::async_trait;
use sqlx::{FromRow, MySqlPool};
use uuid::Uuid;

use super::{map_write_error, to_total};
use crate::domain::models::chat::{Conversation, ConversationSummary, Message};
use crate::domain::repositories::ChatRepository;
use crate::error::AppResult;
use crate::utils::pagination::{Page, PageRequest};

const CONVERSATION_COLUMNS: &str = "id, user_id, vendor_id, last_message, created_at, updated_at";
const MESSAGE_COLUMNS: &str = "id, conversation_id, sender_id, body, is_read, created_at";

#[derive(FromRow)]
struct SummaryRow {
    #[sqlx(flatten)]
    conversation: Conversation,
    unread: i64,
}

impl From<SummaryRow> for ConversationSummary {
    fn from(row: SummaryRow) -> Self {
        Self {
            conversation: row.conversation,
            unread: to_total(row.unread),
        }
    }
}

pub struct MySqlChatRepository {
    pool: MySqlPool,
}

impl MySqlChatRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChatRepository for MySqlChatRepository {
    async fn find_conversation(&self, id: Uuid) -> AppResult<Option<Conversation>> {
        let conversation = sqlx::query_as::<_, Conversation>(&format!(
            "SELECT {} FROM conversations WHERE id = ?",
            CONVERSATION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(conversation)
    }

    async fn find_between(&self, user_id: Uuid, vendor_id: Uuid) -> AppResult<Option<Conversation>> {
        let conversation = sqlx::query_as::<_, Conversation>(&format!(
            "SELECT {} FROM conversations WHERE user_id = ? AND vendor_id = ?",
            CONVERSATION_COLUMNS
        ))
        .bind(user_id)
        .bind(vendor_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(conversation)
    }

    async fn create_conversation(&self, conversation: &Conversation) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO conversations (id, user_id, vendor_id, last_message, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(conversation.id)
        .bind(conversation.user_id)
        .bind(conversation.vendor_id)
        .bind(&conversation.last_message)
        .bind(conversation.created_at)
        .bind(conversation.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "conversation"))?;

        Ok(())
    }

    async fn list_for(&self, account_id: Uuid) -> AppResult<Vec<ConversationSummary>> {
        let rows = sqlx::query_as::<_, SummaryRow>(
            r#"
            SELECT c.id, c.user_id, c.vendor_id, c.last_message, c.created_at, c.updated_at,
                   (SELECT COUNT(*) FROM messages m
                     WHERE m.conversation_id = c.id AND m.sender_id <> ? AND m.is_read = FALSE) AS unread
            FROM conversations c
            WHERE c.user_id = ? OR c.vendor_id = ?
            ORDER BY c.updated_at DESC
            "#,
        )
        .bind(account_id)
        .bind(account_id)
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ConversationSummary::from).collect())
    }

    async fn insert_message(&self, message: &Message) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO messages (id, conversation_id, sender_id, body, is_read, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(message.id)
        .bind(message.conversation_id)
        .bind(message.sender_id)
        .bind(&message.body)
        .bind(message.read)
        .bind(message.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_write_error(e, "message"))?;

        sqlx::query("UPDATE conversations SET last_message = ?, updated_at = ? WHERE id = ?")
            .bind(&message.body)
            .bind(message.created_at)
            .bind(message.conversation_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn list_messages(&self, conversation_id: Uuid, page: PageRequest) -> AppResult<Page<Message>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM messages WHERE conversation_id = ?")
            .bind(conversation_id)
            .fetch_one(&self.pool)
            .await?;

        // 第一页是最新的一批消息，页内再按时间正序返回
        let items = sqlx::query_as::<_, Message>(&format!(
            r#"
            SELECT {cols} FROM (
                SELECT {cols} FROM messages
                WHERE conversation_id = ?
                ORDER BY created_at DESC
                LIMIT ? OFFSET ?
            ) AS recent
            ORDER BY created_at ASC
            "#,
            cols = MESSAGE_COLUMNS
        ))
        .bind(conversation_id)
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(Page::new(items, to_total(total), page))
    }

    async fn mark_read(&self, conversation_id: Uuid, reader_id: Uuid) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE messages SET is_read = TRUE WHERE conversation_id = ? AND sender_id <> ? AND is_read = FALSE",
        )
        .bind(conversation_id)
        .bind(reader_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}
