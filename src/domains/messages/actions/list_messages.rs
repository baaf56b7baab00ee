//! List messages action.

use anyhow::Result;
use sqlx::PgPool;

use crate::common::{ChatError, ConversationId, UserId};
use crate::domains::conversations::models::{user_is_participant, ParticipantPopulated};
use crate::domains::messages::models::MessagePopulated;

/// All messages of a conversation, newest first.
///
/// Visible only to participants; everyone else gets an authorization
/// error, whether or not the conversation exists.
pub async fn list_messages(
    caller_id: UserId,
    conversation_id: ConversationId,
    pool: &PgPool,
) -> Result<Vec<MessagePopulated>> {
    let participants = ParticipantPopulated::list_for_conversation(conversation_id, pool).await?;
    if !user_is_participant(&participants, caller_id) {
        return Err(ChatError::NotAuthorized.into());
    }

    MessagePopulated::list_for_conversation(conversation_id, pool).await
}
