pub mod conversation;
pub mod participant;

pub use conversation::*;
pub use participant::*;
