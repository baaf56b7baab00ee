// Message use cases

pub mod list_messages;
pub mod send_message;

pub use list_messages::list_messages;
pub use send_message::send_message;
