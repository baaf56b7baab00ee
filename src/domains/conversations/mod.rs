//! Conversations domain - conversations, participant membership, read state.

pub mod actions;
pub mod data;
pub mod events;
pub mod models;

pub use models::*;
