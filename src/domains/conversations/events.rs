//! Conversation domain events published on the pub/sub bus.
//!
//! Payloads are serialized to JSON by the publisher and deserialized by
//! each subscription resolver, which then applies its per-subscriber
//! delivery predicate.

use serde::{Deserialize, Serialize};

use crate::common::{ConversationId, UserId};
use crate::domains::conversations::models::ConversationPopulated;

/// Bus topic names for conversation events
pub mod topics {
    pub const CONVERSATION_CREATED: &str = "CONVERSATION_CREATED";
    pub const CONVERSATION_UPDATED: &str = "CONVERSATION_UPDATED";
    pub const CONVERSATION_DELETED: &str = "CONVERSATION_DELETED";
    pub const USER_INVITED_TO_CONVERSATION: &str = "USER_INVITED_TO_CONVERSATION";
}

/// A conversation was created; delivered to its participants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationCreated {
    pub conversation: ConversationPopulated,
}

/// A conversation changed (new latest message, or someone left).
///
/// `removed_user_ids` is non-empty only for leaves; removed users still
/// receive the event so their clients can drop the conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationUpdated {
    pub conversation: ConversationPopulated,
    pub removed_user_ids: Vec<UserId>,
}

/// A conversation was deleted; carries the pre-deletion snapshot so former
/// participants can be identified.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationDeleted {
    pub conversation: ConversationPopulated,
}

/// Users were invited to a conversation. No persistence backs this event;
/// the invited clients perform the membership mutation themselves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInvited {
    pub conversation_id: ConversationId,
    pub inviter_id: UserId,
    pub inviter_username: Option<String>,
    pub invited_user_ids: Vec<UserId>,
}
