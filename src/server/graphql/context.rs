use std::sync::Arc;

use juniper::FieldError;
use sqlx::PgPool;

use crate::domains::auth::{JwtService, Session};
use crate::kernel::PubSub;

/// GraphQL context
///
/// Shared resources plus the authenticated session. Built per HTTP request
/// by middleware, or once per WebSocket connection from the
/// connection-init params.
#[derive(Clone)]
pub struct GraphQLContext {
    pub pool: PgPool,
    pub pubsub: PubSub,
    pub jwt_service: Arc<JwtService>,
    pub session: Option<Session>,
}

impl juniper::Context for GraphQLContext {}

impl GraphQLContext {
    pub fn new(
        pool: PgPool,
        pubsub: PubSub,
        jwt_service: Arc<JwtService>,
        session: Option<Session>,
    ) -> Self {
        Self {
            pool,
            pubsub,
            jwt_service,
            session,
        }
    }

    /// The session, or a "Not authorized" field error. Every guarded
    /// resolver calls this before touching the database.
    pub fn require_session(&self) -> Result<&Session, FieldError> {
        self.session
            .as_ref()
            .ok_or_else(|| FieldError::new("Not authorized", juniper::Value::null()))
    }
}
