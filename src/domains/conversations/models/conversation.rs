use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{ConversationId, MessageId, UserId};
use crate::domains::messages::models::MessagePopulated;

use super::participant::ParticipantPopulated;

/// Conversation - a thread of messages between a set of participants.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Conversation {
    pub id: ConversationId,
    pub latest_message_id: Option<MessageId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Conversation with participants and latest message eagerly joined.
///
/// This is the fixed projection shipped to clients and carried in
/// conversation events; every resolver that returns a conversation returns
/// this aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationPopulated {
    pub id: ConversationId,
    pub participants: Vec<ParticipantPopulated>,
    pub latest_message: Option<MessagePopulated>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Create an empty conversation row
    pub async fn create(executor: impl sqlx::PgExecutor<'_>) -> Result<Self> {
        let conversation = sqlx::query_as::<_, Conversation>(
            "INSERT INTO conversations DEFAULT VALUES RETURNING *",
        )
        .fetch_one(executor)
        .await?;
        Ok(conversation)
    }

    /// Find conversation by ID
    pub async fn find_by_id(id: ConversationId, pool: &PgPool) -> Result<Option<Self>> {
        let conversation =
            sqlx::query_as::<_, Conversation>("SELECT * FROM conversations WHERE id = $1")
                .bind(id)
                .fetch_optional(pool)
                .await?;
        Ok(conversation)
    }

    /// Point a conversation at its newest message and bump activity
    pub async fn set_latest_message(
        id: ConversationId,
        message_id: MessageId,
        executor: impl sqlx::PgExecutor<'_>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE conversations
            SET latest_message_id = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(message_id)
        .execute(executor)
        .await?;
        Ok(())
    }

    /// Clear the latest-message pointer (needed before deleting messages,
    /// which the pointer references)
    pub async fn clear_latest_message(
        id: ConversationId,
        executor: impl sqlx::PgExecutor<'_>,
    ) -> Result<()> {
        sqlx::query("UPDATE conversations SET latest_message_id = NULL WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(())
    }

    /// Delete a conversation row
    pub async fn delete(id: ConversationId, executor: impl sqlx::PgExecutor<'_>) -> Result<()> {
        sqlx::query("DELETE FROM conversations WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(())
    }

    /// IDs of every conversation a user participates in, newest activity
    /// first
    pub async fn ids_for_user(user_id: UserId, pool: &PgPool) -> Result<Vec<ConversationId>> {
        let ids = sqlx::query_scalar::<_, ConversationId>(
            r#"
            SELECT c.id
            FROM conversations c
            JOIN conversation_participants p ON p.conversation_id = c.id
            WHERE p.user_id = $1
            ORDER BY c.updated_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;
        Ok(ids)
    }
}

impl ConversationPopulated {
    /// Fetch a conversation with participants and latest message joined
    pub async fn find_by_id(id: ConversationId, pool: &PgPool) -> Result<Option<Self>> {
        let Some(conversation) = Conversation::find_by_id(id, pool).await? else {
            return Ok(None);
        };

        let participants = ParticipantPopulated::list_for_conversation(id, pool).await?;
        let latest_message = match conversation.latest_message_id {
            Some(message_id) => MessagePopulated::find_by_id(message_id, pool).await?,
            None => None,
        };

        Ok(Some(Self {
            id: conversation.id,
            participants,
            latest_message,
            created_at: conversation.created_at,
            updated_at: conversation.updated_at,
        }))
    }

    /// All populated conversations a user participates in, newest activity
    /// first
    pub async fn list_for_user(user_id: UserId, pool: &PgPool) -> Result<Vec<Self>> {
        let ids = Conversation::ids_for_user(user_id, pool).await?;

        let mut conversations = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(conversation) = Self::find_by_id(id, pool).await? {
                conversations.push(conversation);
            }
        }
        Ok(conversations)
    }
}
