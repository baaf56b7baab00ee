//! GraphQL-over-WebSocket endpoint.
//!
//! Authentication happens once per connection: clients pass their token as
//! the `authToken` connection-init param, and the resulting session covers
//! every subscription started on that socket.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    extract::{ws::WebSocketUpgrade, Extension, State},
    response::Response,
};
use juniper::Variables;
use juniper_axum::subscriptions;
use juniper_graphql_ws::ConnectionConfig;

use crate::domains::auth::Session;
use crate::server::app::AppState;
use crate::server::graphql::{GraphQLContext, Schema};

pub async fn subscriptions_handler(
    Extension(state): Extension<AppState>,
    State(schema): State<Arc<Schema>>,
    ws: WebSocketUpgrade,
) -> Response {
    ws.protocols(["graphql-transport-ws", "graphql-ws"])
        .on_upgrade(move |socket| {
            subscriptions::serve_ws(socket, schema, move |params: Variables| async move {
                let session = params
                    .get("authToken")
                    .and_then(|v| v.as_string_value())
                    .and_then(|token| state.jwt_service.verify_token(token).ok())
                    .map(Session::from);

                let context = GraphQLContext::new(
                    state.db_pool.clone(),
                    state.pubsub.clone(),
                    state.jwt_service.clone(),
                    session,
                );
                Ok::<_, Infallible>(ConnectionConfig::new(context))
            })
        })
}
