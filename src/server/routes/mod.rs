// HTTP routes
pub mod graphql;
pub mod health;
pub mod subscriptions;

pub use graphql::*;
pub use health::*;
pub use subscriptions::*;
