//! Register user action - the auth-provider first-sign-in path.

use anyhow::Result;
use sqlx::PgPool;
use tracing::info;

use crate::domains::users::models::User;

/// Upsert a user row by email.
///
/// Idempotent: signing in again with the same email refreshes name/image
/// and returns the existing row.
pub async fn register_user(
    email: &str,
    name: Option<String>,
    image: Option<String>,
    pool: &PgPool,
) -> Result<User> {
    info!(email, "Registering user");

    let user = User::upsert_by_email(email, name, image, pool).await?;
    Ok(user)
}
