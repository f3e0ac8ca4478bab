//! Plan catalog, plan changes, and billing history handlers.

use axum::extract::{Extension, State};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use planpilot_billing::plans;

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChangePlanRequest {
    #[serde(alias = "newPlan")]
    pub new_plan: String,
}

/// Public plan catalog, in display order.
pub async fn list_plans() -> Json<serde_json::Value> {
    Json(json!({ "plans": plans::all() }))
}

pub async fn current(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Json<serde_json::Value>> {
    let plan_state = state.subscriptions.current_state(user.account_id).await?;
    Ok(Json(json!(plan_state)))
}

pub async fn upgrade(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<ChangePlanRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let plan_state = state
        .subscriptions
        .change_plan(user.account_id, &req.new_plan)
        .await?;

    Ok(Json(json!({
        "message": format!("Successfully changed to the {} plan", plan_state.plan_details.name),
        "plan": plan_state.plan,
        "plan_details": plan_state.plan_details,
        "subscription": plan_state.subscription,
    })))
}

pub async fn history(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Json<serde_json::Value>> {
    let entries = state.subscriptions.history(user.account_id).await?;
    Ok(Json(json!({ "history": entries })))
}
