//! Expected domain failures.
//!
//! Actions propagate `anyhow::Error`; these variants mark the failures that
//! carry a user-facing message. Resolvers downcast to decide whether to
//! surface the message as-is (or as a `{success, error}` response field) or
//! to rewrap an unexpected error generically.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChatError {
    #[error("Not authorized")]
    NotAuthorized,

    #[error("Username already taken. Try another")]
    UsernameTaken,

    #[error("Conversation not found")]
    ConversationNotFound,

    #[error("Participant entity not found")]
    ParticipantNotFound,
}
