//! Delete conversation action.

use anyhow::Result;
use sqlx::PgPool;
use tracing::info;

use crate::common::{ChatError, ConversationId, UserId};
use crate::domains::conversations::models::{
    user_is_participant, Conversation, ConversationParticipant, ConversationPopulated,
};
use crate::domains::messages::models::Message;

/// Delete a conversation with all its participants and messages.
///
/// Only a participant may delete. The populated snapshot is taken before
/// anything is removed (the CONVERSATION_DELETED event needs it); the
/// deletes themselves run in one all-or-nothing transaction, ordered so
/// foreign keys hold: pointer cleared, then messages, then participants,
/// then the conversation row.
pub async fn delete_conversation(
    caller_id: UserId,
    conversation_id: ConversationId,
    pool: &PgPool,
) -> Result<ConversationPopulated> {
    info!(conversation_id = %conversation_id, "Deleting conversation");

    let snapshot = ConversationPopulated::find_by_id(conversation_id, pool)
        .await?
        .ok_or(ChatError::ConversationNotFound)?;

    if !user_is_participant(&snapshot.participants, caller_id) {
        return Err(ChatError::NotAuthorized.into());
    }

    let mut tx = pool.begin().await?;

    Conversation::clear_latest_message(conversation_id, &mut *tx).await?;
    Message::delete_all_for_conversation(conversation_id, &mut *tx).await?;
    ConversationParticipant::delete_all_for_conversation(conversation_id, &mut *tx).await?;
    Conversation::delete(conversation_id, &mut *tx).await?;

    tx.commit().await?;

    Ok(snapshot)
}
