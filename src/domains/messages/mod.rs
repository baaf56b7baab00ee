//! Messages domain - immutable chat messages and their event fanout.

pub mod actions;
pub mod data;
pub mod events;
pub mod models;

pub use models::*;
