//! Mark conversation as read action.

use anyhow::Result;
use sqlx::PgPool;
use tracing::info;

use crate::common::{ChatError, ConversationId, UserId};
use crate::domains::conversations::models::ConversationParticipant;

/// Set the caller's `has_seen_latest_message` flag for a conversation.
///
/// A missing participant row is a reported error, not a silent no-op. Read
/// state is not broadcast; no event accompanies this write.
pub async fn mark_as_read(user_id: UserId, conversation_id: ConversationId, pool: &PgPool) -> Result<()> {
    info!(user_id = %user_id, conversation_id = %conversation_id, "Marking conversation as read");

    let updated = ConversationParticipant::mark_seen(conversation_id, user_id, pool).await?;
    if updated == 0 {
        return Err(ChatError::ParticipantNotFound.into());
    }
    Ok(())
}
