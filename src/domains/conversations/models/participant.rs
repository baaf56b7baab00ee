use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{ConversationId, ParticipantId, UserId};

/// ConversationParticipant - join row linking a user to a conversation,
/// carrying that user's read state. Exactly one row per (conversation,
/// user) pair.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ConversationParticipant {
    pub id: ParticipantId,
    pub conversation_id: ConversationId,
    pub user_id: UserId,
    pub has_seen_latest_message: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Participant with the user's username joined - the shape embedded in
/// populated conversations.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ParticipantPopulated {
    pub id: ParticipantId,
    pub user_id: UserId,
    pub username: Option<String>,
    pub has_seen_latest_message: bool,
}

/// The one authorization rule of the system: a user may act on a
/// conversation iff they appear in its participant list.
pub fn user_is_participant(participants: &[ParticipantPopulated], user_id: UserId) -> bool {
    participants.iter().any(|p| p.user_id == user_id)
}

impl ConversationParticipant {
    /// Create a participant row
    pub async fn create(
        conversation_id: ConversationId,
        user_id: UserId,
        has_seen_latest_message: bool,
        executor: impl sqlx::PgExecutor<'_>,
    ) -> Result<Self> {
        let participant = sqlx::query_as::<_, ConversationParticipant>(
            r#"
            INSERT INTO conversation_participants (conversation_id, user_id, has_seen_latest_message)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(conversation_id)
        .bind(user_id)
        .bind(has_seen_latest_message)
        .fetch_one(executor)
        .await?;
        Ok(participant)
    }

    /// Find the participant row for a (conversation, user) pair
    pub async fn find_by_conversation_and_user(
        conversation_id: ConversationId,
        user_id: UserId,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        let participant = sqlx::query_as::<_, ConversationParticipant>(
            "SELECT * FROM conversation_participants WHERE conversation_id = $1 AND user_id = $2",
        )
        .bind(conversation_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
        Ok(participant)
    }

    /// Mark one participant's read flag true. Returns the number of rows
    /// updated (0 means no such participant).
    pub async fn mark_seen(
        conversation_id: ConversationId,
        user_id: UserId,
        pool: &PgPool,
    ) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE conversation_participants
            SET has_seen_latest_message = TRUE, updated_at = NOW()
            WHERE conversation_id = $1 AND user_id = $2
            "#,
        )
        .bind(conversation_id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Flip read flags for a new message: true for the sender, false for
    /// everyone else in the conversation.
    pub async fn reset_seen_flags(
        conversation_id: ConversationId,
        sender_id: UserId,
        executor: impl sqlx::PgExecutor<'_>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE conversation_participants
            SET has_seen_latest_message = (user_id = $2), updated_at = NOW()
            WHERE conversation_id = $1
            "#,
        )
        .bind(conversation_id)
        .bind(sender_id)
        .execute(executor)
        .await?;
        Ok(())
    }

    /// Delete one user's participant row. Returns the number of rows
    /// deleted (0 means the user was not a participant).
    pub async fn delete_for_user(
        conversation_id: ConversationId,
        user_id: UserId,
        pool: &PgPool,
    ) -> Result<u64> {
        let result = sqlx::query(
            "DELETE FROM conversation_participants WHERE conversation_id = $1 AND user_id = $2",
        )
        .bind(conversation_id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Delete all participant rows of a conversation (deletion cascade)
    pub async fn delete_all_for_conversation(
        conversation_id: ConversationId,
        executor: impl sqlx::PgExecutor<'_>,
    ) -> Result<()> {
        sqlx::query("DELETE FROM conversation_participants WHERE conversation_id = $1")
            .bind(conversation_id)
            .execute(executor)
            .await?;
        Ok(())
    }
}

impl ParticipantPopulated {
    /// All participants of a conversation with usernames joined
    pub async fn list_for_conversation(
        conversation_id: ConversationId,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        let participants = sqlx::query_as::<_, ParticipantPopulated>(
            r#"
            SELECT p.id, p.user_id, u.username, p.has_seen_latest_message
            FROM conversation_participants p
            JOIN users u ON u.id = p.user_id
            WHERE p.conversation_id = $1
            ORDER BY p.created_at
            "#,
        )
        .bind(conversation_id)
        .fetch_all(pool)
        .await?;
        Ok(participants)
    }
}
