//! The authenticated identity passed explicitly into resolvers.

use crate::common::UserId;

use super::jwt::Claims;

/// Signed-in user identity for one request or subscription connection.
///
/// Built from verified JWT claims; resolvers receive it as a value instead
/// of reading authentication out of ambient state.
#[derive(Clone, Debug)]
pub struct Session {
    pub user_id: UserId,
    pub username: Option<String>,
}

impl From<Claims> for Session {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: UserId::from_uuid(claims.user_id),
            username: claims.username,
        }
    }
}
