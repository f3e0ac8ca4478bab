//! Route table.

use axum::middleware;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;

use crate::auth::require_auth;
use crate::state::AppState;

pub mod auth;
pub mod subscriptions;

pub fn create_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/api/health", get(health))
        .route("/api/auth/signup", post(auth::signup))
        .route("/api/auth/login", post(auth::login))
        .route("/api/subscriptions/plans", get(subscriptions::list_plans));

    let protected = Router::new()
        .route("/api/auth/me", get(auth::me))
        .route("/api/subscriptions/current", get(subscriptions::current))
        .route("/api/subscriptions/upgrade", post(subscriptions::upgrade))
        .route("/api/subscriptions/history", get(subscriptions::history))
        .layer(middleware::from_fn_with_state(
            state.auth_state(),
            require_auth,
        ));

    public.merge(protected).with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}
