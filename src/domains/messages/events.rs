//! Message domain events published on the pub/sub bus.

use serde::{Deserialize, Serialize};

use crate::domains::messages::models::MessagePopulated;

/// Bus topic names for message events
pub mod topics {
    pub const MESSAGE_SENT: &str = "MESSAGE_SENT";
}

/// A message was sent; subscribers filter on the conversation id argument.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageSent {
    pub message: MessagePopulated,
}
