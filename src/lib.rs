// Chat application backend.
//
// GraphQL API for user search/registration, conversation management, and
// messaging, backed by Postgres, with real-time updates fanned out over an
// in-process pub/sub bus to WebSocket subscriptions.
//
// Architecture follows domain-driven design: each domain owns its models
// (sqlx), actions (use cases), data (wire types), and events (bus payloads).

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
