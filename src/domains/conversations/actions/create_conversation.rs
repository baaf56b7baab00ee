//! Create conversation action.

use anyhow::{Context, Result};
use sqlx::PgPool;
use tracing::info;

use crate::common::UserId;
use crate::domains::conversations::models::{
    Conversation, ConversationParticipant, ConversationPopulated,
};

/// Create a conversation with the given participants.
///
/// The creator is added if the client left them out of the list. Only the
/// creator's participant row starts with `has_seen_latest_message = true`.
/// The conversation row and all participant rows are written in one
/// transaction.
pub async fn create_conversation(
    creator_id: UserId,
    mut participant_ids: Vec<UserId>,
    pool: &PgPool,
) -> Result<ConversationPopulated> {
    info!(creator_id = %creator_id, count = participant_ids.len(), "Creating conversation");

    if !participant_ids.contains(&creator_id) {
        participant_ids.push(creator_id);
    }
    // Duplicate ids would violate the (conversation, user) uniqueness
    participant_ids.sort();
    participant_ids.dedup();

    let mut tx = pool.begin().await?;

    let conversation = Conversation::create(&mut *tx).await?;
    for user_id in &participant_ids {
        ConversationParticipant::create(
            conversation.id,
            *user_id,
            *user_id == creator_id,
            &mut *tx,
        )
        .await?;
    }

    tx.commit().await?;

    ConversationPopulated::find_by_id(conversation.id, pool)
        .await?
        .context("conversation missing immediately after create")
}
