use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{ConversationId, MessageId, UserId};

/// Message - immutable once created; only ever cascade-deleted with its
/// conversation.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Message {
    pub id: MessageId,
    pub conversation_id: ConversationId,
    pub sender_id: UserId,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Message with its sender eagerly joined - the fixed projection shipped to
/// clients and carried in MESSAGE_SENT events.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MessagePopulated {
    pub id: MessageId,
    pub conversation_id: ConversationId,
    pub sender_id: UserId,
    pub sender_username: Option<String>,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Message {
    /// Create a new message. The id is caller-supplied (clients generate it
    /// so optimistic UI updates can reference the row before the roundtrip).
    pub async fn create(
        id: MessageId,
        conversation_id: ConversationId,
        sender_id: UserId,
        body: &str,
        pool: &PgPool,
    ) -> Result<Self> {
        let message = sqlx::query_as::<_, Message>(
            r#"
            INSERT INTO messages (id, conversation_id, sender_id, body)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(conversation_id)
        .bind(sender_id)
        .bind(body)
        .fetch_one(pool)
        .await?;
        Ok(message)
    }

    /// Delete all messages in a conversation (conversation-deletion cascade)
    pub async fn delete_all_for_conversation(
        conversation_id: ConversationId,
        executor: impl sqlx::PgExecutor<'_>,
    ) -> Result<()> {
        sqlx::query("DELETE FROM messages WHERE conversation_id = $1")
            .bind(conversation_id)
            .execute(executor)
            .await?;
        Ok(())
    }
}

impl MessagePopulated {
    /// Fetch one message with its sender joined
    pub async fn find_by_id(id: MessageId, pool: &PgPool) -> Result<Option<Self>> {
        let message = sqlx::query_as::<_, MessagePopulated>(
            r#"
            SELECT m.id, m.conversation_id, m.sender_id, u.username AS sender_username,
                   m.body, m.created_at, m.updated_at
            FROM messages m
            JOIN users u ON u.id = m.sender_id
            WHERE m.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(message)
    }

    /// All messages of a conversation with senders joined, newest first
    pub async fn list_for_conversation(
        conversation_id: ConversationId,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        let messages = sqlx::query_as::<_, MessagePopulated>(
            r#"
            SELECT m.id, m.conversation_id, m.sender_id, u.username AS sender_username,
                   m.body, m.created_at, m.updated_at
            FROM messages m
            JOIN users u ON u.id = m.sender_id
            WHERE m.conversation_id = $1
            ORDER BY m.created_at DESC
            "#,
        )
        .bind(conversation_id)
        .fetch_all(pool)
        .await?;
        Ok(messages)
    }
}
