// Common test utilities

pub mod fixtures;
pub mod graphql;
pub mod harness;

pub use graphql::*;
pub use harness::*;
