pub mod context;
pub mod scalars;
pub mod schema;
pub mod subscriptions;

pub use context::GraphQLContext;
pub use schema::{create_schema, Mutation, Query, Schema};
pub use subscriptions::Subscription;
