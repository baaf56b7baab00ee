//! GraphQL client for integration testing.
//!
//! Executes operations directly against the schema without HTTP overhead.

use std::sync::Arc;

use juniper::Variables;
use serde_json::Value;
use uuid::Uuid;

use server_core::common::UserId;
use server_core::domains::auth::{JwtService, Session};
use server_core::server::graphql::{create_schema, GraphQLContext, Schema};

use super::TestHarness;

/// GraphQL client for executing queries and mutations in tests.
pub struct GraphQLClient {
    schema: Schema,
    context: GraphQLContext,
}

/// Result of a GraphQL execution.
#[derive(Debug)]
pub struct GraphQLResult {
    pub data: Option<Value>,
    pub errors: Vec<String>,
}

impl GraphQLResult {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Unwraps the data, panicking if there were errors.
    pub fn unwrap(self) -> Value {
        if !self.errors.is_empty() {
            panic!("GraphQL errors: {:?}", self.errors);
        }
        self.data.expect("No data returned")
    }

    /// Gets a value at the given dotted JSON path.
    pub fn get(&self, path: &str) -> Value {
        let data = self.data.as_ref().expect("No data returned");
        let mut current = data;
        for key in path.split('.') {
            current = &current[key];
        }
        current.clone()
    }
}

fn test_jwt_service() -> Arc<JwtService> {
    Arc::new(JwtService::new("test_secret_key", "test_issuer".to_string()))
}

impl GraphQLClient {
    /// Client with no session; guarded operations should reject it.
    pub fn anonymous(harness: &TestHarness) -> Self {
        let context = GraphQLContext::new(
            harness.db_pool.clone(),
            harness.pubsub.clone(),
            test_jwt_service(),
            None,
        );
        Self {
            schema: create_schema(),
            context,
        }
    }

    /// Client signed in as the given user.
    pub fn signed_in(harness: &TestHarness, user_id: Uuid, username: Option<&str>) -> Self {
        let session = Session {
            user_id: UserId::from_uuid(user_id),
            username: username.map(str::to_string),
        };
        let context = GraphQLContext::new(
            harness.db_pool.clone(),
            harness.pubsub.clone(),
            test_jwt_service(),
            Some(session),
        );
        Self {
            schema: create_schema(),
            context,
        }
    }

    /// Execute a GraphQL query/mutation.
    pub async fn execute(&self, query: &str) -> GraphQLResult {
        self.execute_with_vars(query, Variables::new()).await
    }

    /// Execute a GraphQL query/mutation with variables.
    pub async fn execute_with_vars(&self, query: &str, variables: Variables) -> GraphQLResult {
        let (result, errors) =
            juniper::execute(query, None, &self.schema, &variables, &self.context)
                .await
                .expect("GraphQL execution failed");

        let data = Some(serde_json::to_value(&result).expect("Failed to serialize GraphQL result"));

        let error_messages: Vec<String> = errors
            .iter()
            .map(|e| e.error().message().to_string())
            .collect();

        GraphQLResult {
            data,
            errors: error_messages,
        }
    }

    /// Execute and expect success, returning the data.
    pub async fn query(&self, query: &str) -> Value {
        self.execute(query).await.unwrap()
    }
}
