//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::{Extension, Request},
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::domains::auth::{JwtService, Session};
use crate::kernel::PubSub;
use crate::server::graphql::{create_schema, GraphQLContext};
use crate::server::middleware::jwt_auth_middleware;
use crate::server::routes::{
    graphql_handler, health_handler, subscriptions_handler,
};
#[cfg(debug_assertions)]
use crate::server::routes::graphql_playground;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub pubsub: PubSub,
    pub jwt_service: Arc<JwtService>,
}

/// Middleware to create GraphQLContext per-request
async fn create_graphql_context(
    Extension(state): Extension<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    // Session is populated by jwt_auth_middleware, if the token verified
    let session = request.extensions().get::<Session>().cloned();

    let context = GraphQLContext::new(
        state.db_pool.clone(),
        state.pubsub.clone(),
        state.jwt_service.clone(),
        session,
    );

    request.extensions_mut().insert(context);

    next.run(request).await
}

/// Build the Axum application router
pub fn build_app(
    pool: PgPool,
    jwt_secret: &str,
    jwt_issuer: String,
    allowed_origins: Vec<String>,
) -> Router {
    // Schema and bus are both singletons
    let schema = Arc::new(create_schema());
    let pubsub = PubSub::new();

    let jwt_service = Arc::new(JwtService::new(jwt_secret, jwt_issuer));

    let app_state = AppState {
        db_pool: pool,
        pubsub,
        jwt_service: jwt_service.clone(),
    };

    // CORS: explicit origin list when configured, permissive otherwise
    let cors = if allowed_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(tower_http::cors::Any)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([AUTHORIZATION, CONTENT_TYPE])
    } else {
        let origins = allowed_origins
            .iter()
            .filter_map(|origin| origin.parse::<HeaderValue>().ok())
            .collect::<Vec<_>>();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([AUTHORIZATION, CONTENT_TYPE])
    };

    let jwt_service_for_middleware = jwt_service.clone();

    let mut router = Router::new()
        .route("/graphql", post(graphql_handler))
        .route("/subscriptions", get(subscriptions_handler));

    // GraphQL playground only in debug builds (development)
    #[cfg(debug_assertions)]
    {
        router = router.route("/graphql", get(graphql_playground));
    }

    router
        // Health check
        .route("/health", get(health_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(middleware::from_fn(create_graphql_context))
        .layer(middleware::from_fn(move |req, next| {
            jwt_auth_middleware(jwt_service_for_middleware.clone(), req, next)
        }))
        .layer(Extension(app_state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        // State (schema for GraphQL handlers)
        .with_state(schema)
}
