//! Users domain - identity rows, username selection, user search.

pub mod actions;
pub mod data;
pub mod models;

pub use models::*;
