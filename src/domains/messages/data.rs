//! GraphQL data types for messages.

use uuid::Uuid;

use crate::domains::messages::models::MessagePopulated;
use crate::server::graphql::scalars::Date;

/// GraphQL-friendly representation of a message with its sender
#[derive(Debug, Clone, juniper::GraphQLObject)]
#[graphql(description = "A message in a conversation")]
pub struct MessageData {
    /// Unique identifier (client-supplied at send time)
    pub id: Uuid,

    /// Conversation this message belongs to
    pub conversation_id: Uuid,

    /// Sender's user ID
    pub sender_id: Uuid,

    /// Sender's username
    pub sender_username: Option<String>,

    /// Message body
    pub body: String,

    /// When the message was created (epoch milliseconds)
    pub created_at: Date,

    /// When the message row was last touched (epoch milliseconds)
    pub updated_at: Date,
}

impl From<MessagePopulated> for MessageData {
    fn from(m: MessagePopulated) -> Self {
        Self {
            id: m.id.into_uuid(),
            conversation_id: m.conversation_id.into_uuid(),
            sender_id: m.sender_id.into_uuid(),
            sender_username: m.sender_username,
            body: m.body,
            created_at: m.created_at.into(),
            updated_at: m.updated_at.into(),
        }
    }
}

/// Response shape for sendMessage
#[derive(Debug, Clone, juniper::GraphQLObject)]
pub struct SendMessageResponse {
    pub success: bool,
    pub error: Option<String>,
}
