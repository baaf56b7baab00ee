// HTTP server setup (Axum + GraphQL over HTTP and WebSocket)
pub mod app;
pub mod graphql;
pub mod middleware;
pub mod routes;

pub use app::*;
pub use graphql::*;
