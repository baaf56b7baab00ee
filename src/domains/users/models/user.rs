use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::UserId;

/// User - identity row provisioned by the auth provider on first sign-in.
///
/// `username` stays NULL until the user picks one via createUsername.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: UserId,
    pub username: Option<String>,
    pub email: String,
    pub email_verified: bool,
    pub name: Option<String>,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Find user by ID
    pub async fn find_by_id(id: UserId, pool: &PgPool) -> Result<Option<Self>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(user)
    }

    /// Find user by exact username
    pub async fn find_by_username(username: &str, pool: &PgPool) -> Result<Option<Self>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(pool)
            .await?;
        Ok(user)
    }

    /// Upsert a user by email (the auth-provider first-sign-in path)
    pub async fn upsert_by_email(
        email: &str,
        name: Option<String>,
        image: Option<String>,
        pool: &PgPool,
    ) -> Result<Self> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, name, image)
            VALUES ($1, $2, $3)
            ON CONFLICT (email) DO UPDATE
            SET name = COALESCE(EXCLUDED.name, users.name),
                image = COALESCE(EXCLUDED.image, users.image),
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(email)
        .bind(name)
        .bind(image)
        .fetch_one(pool)
        .await?;
        Ok(user)
    }

    /// Set a user's username
    pub async fn set_username(id: UserId, username: &str, pool: &PgPool) -> Result<Self> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET username = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(username)
        .fetch_one(pool)
        .await?;
        Ok(user)
    }

    /// Case-insensitive substring search on username, excluding the
    /// caller's own username and any usernames already in the current
    /// conversation.
    pub async fn search_by_username(
        searched: &str,
        signed_in_username: &str,
        excluded_usernames: &[String],
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT * FROM users
            WHERE username ILIKE '%' || $1 || '%'
              AND username IS NOT NULL
              AND username <> $2
              AND username <> ALL($3)
            ORDER BY username
            "#,
        )
        .bind(escape_like(searched))
        .bind(signed_in_username)
        .bind(excluded_usernames)
        .fetch_all(pool)
        .await?;
        Ok(users)
    }
}

/// Escape LIKE metacharacters so the searched text matches literally.
fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_neutralizes_wildcards() {
        assert_eq!(escape_like("50%_off"), "50\\%\\_off");
        assert_eq!(escape_like(r"back\slash"), r"back\\slash");
        assert_eq!(escape_like("plain"), "plain");
    }
}
