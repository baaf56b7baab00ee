use axum::{middleware::Next, response::Response};
use std::sync::Arc;
use tracing::debug;

use crate::domains::auth::{JwtService, Session};

/// JWT authentication middleware
///
/// Extracts the token from the Authorization header, verifies it, and adds
/// a Session to the request extensions. If there is no token or it fails
/// verification, the request continues without a Session (public access);
/// guarded resolvers reject it later.
pub async fn jwt_auth_middleware(
    jwt_service: Arc<JwtService>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    match extract_session(&request, &jwt_service) {
        Some(session) => {
            debug!(user_id = %session.user_id, "Authenticated request");
            request.extensions_mut().insert(session);
        }
        None => debug!("No valid authentication token"),
    }

    next.run(request).await
}

/// Extract and verify the JWT token from a request
fn extract_session(
    request: &axum::http::Request<axum::body::Body>,
    jwt_service: &JwtService,
) -> Option<Session> {
    let auth_header = request.headers().get("authorization")?;
    let auth_str = auth_header.to_str().ok()?;

    // Accept both "Bearer <token>" and a raw token
    let token = auth_str.strip_prefix("Bearer ").unwrap_or(auth_str);

    let claims = jwt_service.verify_token(token).ok()?;
    Some(Session::from(claims))
}
