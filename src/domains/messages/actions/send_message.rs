//! Send message action.

use anyhow::{Context, Result};
use sqlx::PgPool;
use tracing::info;

use crate::common::{ChatError, ConversationId, MessageId, UserId};
use crate::domains::conversations::models::{
    Conversation, ConversationParticipant, ConversationPopulated,
};
use crate::domains::messages::models::{Message, MessagePopulated};

/// Insert a message, then update its conversation.
///
/// These are two separate calls, not one transaction: the insert can
/// succeed and the conversation update still fail (e.g. the sender's
/// participant row is gone), leaving a message persisted without the
/// latest-message pointer moved. The second call is itself transactional
/// so the pointer and the read flags always move together.
///
/// Returns the populated message and the updated populated conversation.
pub async fn send_message(
    message_id: MessageId,
    sender_id: UserId,
    conversation_id: ConversationId,
    body: &str,
    pool: &PgPool,
) -> Result<(MessagePopulated, ConversationPopulated)> {
    info!(
        message_id = %message_id,
        sender_id = %sender_id,
        conversation_id = %conversation_id,
        "Sending message"
    );

    // Write (a): the message row
    Message::create(message_id, conversation_id, sender_id, body, pool).await?;
    let message = MessagePopulated::find_by_id(message_id, pool)
        .await?
        .context("message missing immediately after create")?;

    // Write (b): conversation update. The sender must still be a
    // participant; if not, the message above stays behind and the caller
    // gets an error.
    let sender_row =
        ConversationParticipant::find_by_conversation_and_user(conversation_id, sender_id, pool)
            .await?;
    if sender_row.is_none() {
        return Err(ChatError::ParticipantNotFound.into());
    }

    let mut tx = pool.begin().await?;
    Conversation::set_latest_message(conversation_id, message_id, &mut *tx).await?;
    ConversationParticipant::reset_seen_flags(conversation_id, sender_id, &mut *tx).await?;
    tx.commit().await?;

    let conversation = ConversationPopulated::find_by_id(conversation_id, pool)
        .await?
        .ok_or(ChatError::ConversationNotFound)?;

    Ok((message, conversation))
}
