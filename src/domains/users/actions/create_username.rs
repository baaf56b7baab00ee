//! Create username action - one-time username selection.

use anyhow::Result;
use sqlx::PgPool;
use tracing::info;

use crate::common::{ChatError, UserId};
use crate::domains::users::models::User;

/// Set a username for the signed-in user.
///
/// The uniqueness check runs first; a taken name fails with
/// `ChatError::UsernameTaken` and performs no update.
pub async fn create_username(user_id: UserId, username: &str, pool: &PgPool) -> Result<User> {
    info!(user_id = %user_id, username, "Creating username");

    if User::find_by_username(username, pool).await?.is_some() {
        return Err(ChatError::UsernameTaken.into());
    }

    let user = User::set_username(user_id, username, pool).await?;
    Ok(user)
}
