//! Typed ID aliases for the chat domain entities.

pub use super::id::Id;

/// Marker type for User entities.
pub struct User;

/// Marker type for Conversation entities.
pub struct Conversation;

/// Marker type for ConversationParticipant entities (join rows).
pub struct ConversationParticipant;

/// Marker type for Message entities.
pub struct Message;

/// Typed ID for User entities.
pub type UserId = Id<User>;

/// Typed ID for Conversation entities.
pub type ConversationId = Id<Conversation>;

/// Typed ID for ConversationParticipant entities.
pub type ParticipantId = Id<ConversationParticipant>;

/// Typed ID for Message entities.
pub type MessageId = Id<Message>;
