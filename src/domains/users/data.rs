//! GraphQL data types for users.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domains::users::models::User;

/// A user row matched by searchUsers
#[derive(Debug, Clone, Serialize, Deserialize, juniper::GraphQLObject)]
#[graphql(description = "A user matched by a username search")]
pub struct SearchedUser {
    /// Unique identifier
    pub id: Uuid,

    /// Chosen username
    pub username: Option<String>,

    /// Avatar URL
    pub image: Option<String>,
}

impl From<User> for SearchedUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id.into_uuid(),
            username: u.username,
            image: u.image,
        }
    }
}

/// Full user shape returned from registration
#[derive(Debug, Clone, Serialize, Deserialize, juniper::GraphQLObject)]
#[graphql(description = "A registered user")]
pub struct UserData {
    pub id: Uuid,
    pub username: Option<String>,
    pub email: String,
    pub email_verified: bool,
    pub name: Option<String>,
    pub image: Option<String>,
}

impl From<User> for UserData {
    fn from(u: User) -> Self {
        Self {
            id: u.id.into_uuid(),
            username: u.username,
            email: u.email,
            email_verified: u.email_verified,
            name: u.name,
            image: u.image,
        }
    }
}

/// Response shape for createUsername
///
/// Expected failures (name taken, no session) come back in `error` rather
/// than as a thrown GraphQL error, so clients can branch on the string.
#[derive(Debug, Clone, juniper::GraphQLObject)]
pub struct CreateUsernameResponse {
    pub success: bool,
    pub error: Option<String>,
}

/// Response shape for registerUser: the user plus a signed API token
#[derive(Debug, Clone, juniper::GraphQLObject)]
pub struct RegisterUserResponse {
    pub user: UserData,
    pub token: String,
}
