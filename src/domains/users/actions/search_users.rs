//! Search users action.

use anyhow::Result;
use sqlx::PgPool;

use crate::domains::users::models::User;

/// Case-insensitive username search for the conversation-creation modal.
///
/// Excludes the caller and anyone whose username is already present in the
/// conversation being built.
pub async fn search_users(
    searched_username: &str,
    signed_in_username: &str,
    usernames_in_current_convo: Vec<String>,
    pool: &PgPool,
) -> Result<Vec<User>> {
    let users = User::search_by_username(
        searched_username,
        signed_in_username,
        &usernames_in_current_convo,
        pool,
    )
    .await?;
    Ok(users)
}
