//! GraphQL data types for conversations.

use uuid::Uuid;

use crate::domains::conversations::models::{ConversationPopulated, ParticipantPopulated};
use crate::domains::messages::data::MessageData;
use crate::server::graphql::scalars::Date;

/// GraphQL-friendly representation of a conversation participant
#[derive(Debug, Clone, juniper::GraphQLObject)]
#[graphql(description = "A participant of a conversation with their read state")]
pub struct ParticipantData {
    /// Unique identifier of the join row
    pub id: Uuid,

    /// The participating user
    pub user_id: Uuid,

    /// The participating user's username
    pub username: Option<String>,

    /// Whether this user has seen the conversation's latest message
    pub has_seen_latest_message: bool,
}

impl From<ParticipantPopulated> for ParticipantData {
    fn from(p: ParticipantPopulated) -> Self {
        Self {
            id: p.id.into_uuid(),
            user_id: p.user_id.into_uuid(),
            username: p.username,
            has_seen_latest_message: p.has_seen_latest_message,
        }
    }
}

/// GraphQL-friendly representation of a populated conversation
#[derive(Debug, Clone, juniper::GraphQLObject)]
#[graphql(description = "A conversation with participants and latest message")]
pub struct ConversationData {
    /// Unique identifier
    pub id: Uuid,

    /// All participants, with usernames and read state
    pub participants: Vec<ParticipantData>,

    /// The most recently created message, if any
    pub latest_message: Option<MessageData>,

    /// When the conversation was created (epoch milliseconds)
    pub created_at: Date,

    /// When the conversation last saw activity (epoch milliseconds)
    pub updated_at: Date,
}

impl From<ConversationPopulated> for ConversationData {
    fn from(c: ConversationPopulated) -> Self {
        Self {
            id: c.id.into_uuid(),
            participants: c.participants.into_iter().map(Into::into).collect(),
            latest_message: c.latest_message.map(Into::into),
            created_at: c.created_at.into(),
            updated_at: c.updated_at.into(),
        }
    }
}

/// Payload delivered by the conversationUpdated subscription
#[derive(Debug, Clone, juniper::GraphQLObject)]
pub struct ConversationUpdatedData {
    /// The conversation after the update
    pub conversation: ConversationData,

    /// Users removed by the update (non-empty only for leaves)
    pub removed_user_ids: Vec<Uuid>,
}

/// Payload delivered by the userInvitedToConversation subscription
#[derive(Debug, Clone, juniper::GraphQLObject)]
pub struct UserInvitedData {
    pub conversation_id: Uuid,
    pub inviter_id: Uuid,
    pub inviter_username: Option<String>,
    pub invited_user_ids: Vec<Uuid>,
}

/// Response shape for createConversation
#[derive(Debug, Clone, juniper::GraphQLObject)]
pub struct CreateConversationResponse {
    pub conversation_id: Option<Uuid>,
    pub success: bool,
    pub error: Option<String>,
}

/// Response shape for leaveConversation
#[derive(Debug, Clone, juniper::GraphQLObject)]
pub struct LeaveConversationResponse {
    pub success: bool,
    pub error: Option<String>,
}

/// Response shape for inviteUsersToConversation
#[derive(Debug, Clone, juniper::GraphQLObject)]
pub struct InviteUsersToConversationResponse {
    pub success: bool,
    pub error: Option<String>,
}
