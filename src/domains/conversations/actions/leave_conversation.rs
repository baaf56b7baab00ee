//! Leave conversation action.

use anyhow::{Context, Result};
use sqlx::PgPool;
use tracing::info;

use crate::common::{ChatError, ConversationId, UserId};
use crate::domains::conversations::models::{ConversationParticipant, ConversationPopulated};

/// Remove the caller's own participant row from a conversation.
///
/// Other participants are untouched. A missing row is an error and nothing
/// is deleted. Returns the conversation as it looks after the leave, for
/// the CONVERSATION_UPDATED event.
pub async fn leave_conversation(
    caller_id: UserId,
    conversation_id: ConversationId,
    pool: &PgPool,
) -> Result<ConversationPopulated> {
    info!(user_id = %caller_id, conversation_id = %conversation_id, "Leaving conversation");

    let deleted = ConversationParticipant::delete_for_user(conversation_id, caller_id, pool).await?;
    if deleted == 0 {
        return Err(ChatError::ParticipantNotFound.into());
    }

    ConversationPopulated::find_by_id(conversation_id, pool)
        .await?
        .context("conversation missing after participant left")
}
