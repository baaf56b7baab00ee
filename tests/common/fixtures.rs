//! Test data fixtures.
//!
//! Every fixture uses random identifiers so tests sharing one database
//! never collide.

use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use server_core::common::{ConversationId, UserId};
use server_core::domains::conversations::actions::create_conversation;
use server_core::domains::conversations::models::ConversationPopulated;
use server_core::domains::users::models::User;

/// Create a user with a chosen username.
pub async fn create_user(pool: &PgPool, username: &str) -> Result<User> {
    // Random suffix keeps usernames and emails unique across tests
    let suffix = &Uuid::new_v4().simple().to_string()[..8];
    let unique_username = format!("{}_{}", username, suffix);
    let email = format!("{}@example.com", unique_username);

    let user = User::upsert_by_email(&email, Some(username.to_string()), None, pool).await?;
    let user = User::set_username(user.id, &unique_username, pool).await?;
    Ok(user)
}

/// Create a user who has not picked a username yet.
pub async fn create_user_without_username(pool: &PgPool) -> Result<User> {
    let email = format!("{}@example.com", Uuid::new_v4().simple());
    let user = User::upsert_by_email(&email, None, None, pool).await?;
    Ok(user)
}

/// Create a conversation between the given users; the first is the creator.
pub async fn create_test_conversation(
    pool: &PgPool,
    users: &[&User],
) -> Result<ConversationPopulated> {
    let creator_id = users[0].id;
    let participant_ids: Vec<UserId> = users.iter().map(|u| u.id).collect();
    create_conversation(creator_id, participant_ids, pool).await
}

/// Look up a conversation's current populated state.
pub async fn reload_conversation(
    pool: &PgPool,
    id: ConversationId,
) -> Result<Option<ConversationPopulated>> {
    ConversationPopulated::find_by_id(id, pool).await
}
