//! List conversations action.

use anyhow::Result;
use sqlx::PgPool;

use crate::common::UserId;
use crate::domains::conversations::models::ConversationPopulated;

/// All conversations the user participates in, populated, newest activity
/// first.
pub async fn list_conversations(
    user_id: UserId,
    pool: &PgPool,
) -> Result<Vec<ConversationPopulated>> {
    ConversationPopulated::list_for_user(user_id, pool).await
}
