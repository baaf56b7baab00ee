// Conversation use cases

pub mod create_conversation;
pub mod delete_conversation;
pub mod leave_conversation;
pub mod list_conversations;
pub mod mark_as_read;

pub use create_conversation::create_conversation;
pub use delete_conversation::delete_conversation;
pub use leave_conversation::leave_conversation;
pub use list_conversations::list_conversations;
pub use mark_as_read::mark_as_read;
