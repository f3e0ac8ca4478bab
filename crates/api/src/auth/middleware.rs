//! Bearer-token auth middleware.

use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use uuid::Uuid;

use super::jwt::JwtManager;

/// The authenticated caller, inserted as a request extension for handlers.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub account_id: Uuid,
    pub email: String,
}

#[derive(Clone)]
pub struct AuthState {
    pub jwt_manager: JwtManager,
}

/// Reject requests without a valid `Authorization: Bearer <token>` header.
pub async fn require_auth(
    State(auth): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    let Some(token) = token else {
        return unauthorized("Missing authentication token");
    };

    match auth.jwt_manager.verify(token) {
        Ok(claims) => {
            request.extensions_mut().insert(AuthUser {
                account_id: claims.sub,
                email: claims.email,
            });
            next.run(request).await
        }
        Err(e) => {
            tracing::debug!(error = %e, "Token verification failed");
            unauthorized("Invalid or expired token")
        }
    }
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": message })),
    )
        .into_response()
}
