//! Signup, login, and current-user handlers.

use axum::extract::{Extension, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use planpilot_billing::accounts;

use crate::auth::{hash_password, verify_password, AuthUser};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

// Fields default to empty so a missing field reaches the 400 validation
// path instead of bouncing as a body-deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(alias = "displayName", alias = "name", default)]
    pub display_name: String,
}

impl SignupRequest {
    fn validate(&self) -> Result<(), ApiError> {
        if self.email.trim().is_empty()
            || self.password.is_empty()
            || self.display_name.trim().is_empty()
        {
            return Err(ApiError::Validation(
                "Email, password, and name are required".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl LoginRequest {
    fn validate(&self) -> Result<(), ApiError> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(ApiError::Validation(
                "Email and password are required".to_string(),
            ));
        }
        Ok(())
    }
}

pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> ApiResult<(StatusCode, Json<serde_json::Value>)> {
    req.validate()?;
    let email = req.email.trim().to_lowercase();

    if accounts::find_by_email(&state.pool, &email).await?.is_some() {
        return Err(ApiError::Validation(
            "An account with this email already exists".to_string(),
        ));
    }

    let password_hash = hash_password(&req.password)
        .map_err(|e| ApiError::Internal(format!("password hashing failed: {e}")))?;

    let account =
        accounts::create(&state.pool, &email, &password_hash, req.display_name.trim()).await?;

    let token = state
        .jwt_manager
        .generate(account.id, &account.email)
        .map_err(|e| ApiError::Internal(format!("token generation failed: {e}")))?;

    tracing::info!(account_id = %account.id, "Account created");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Account created",
            "token": token,
            "user": account,
        })),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    req.validate()?;
    let email = req.email.trim().to_lowercase();

    let Some(credentials) = accounts::find_by_email(&state.pool, &email).await? else {
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    };

    if !verify_password(&req.password, &credentials.password_hash) {
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    let token = state
        .jwt_manager
        .generate(credentials.id, &credentials.email)
        .map_err(|e| ApiError::Internal(format!("token generation failed: {e}")))?;

    Ok(Json(json!({
        "message": "Logged in",
        "token": token,
        "user": {
            "id": credentials.id,
            "email": credentials.email,
            "display_name": credentials.display_name,
            "plan": credentials.plan,
        },
    })))
}

pub async fn me(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Json<serde_json::Value>> {
    let account = accounts::find_by_id(&state.pool, user.account_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Account not found".to_string()))?;

    Ok(Json(json!({ "user": account })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signup_without_name_is_a_validation_error() {
        // A missing field deserializes to empty rather than rejecting the
        // body, so the handler can answer 400 instead of 422.
        let req: SignupRequest =
            serde_json::from_str(r#"{"email":"ada@example.com","password":"pw"}"#).unwrap();
        assert!(matches!(req.validate(), Err(ApiError::Validation(_))));
    }

    #[test]
    fn signup_accepts_name_under_either_key() {
        let req: SignupRequest = serde_json::from_str(
            r#"{"email":"ada@example.com","password":"pw","name":"Ada"}"#,
        )
        .unwrap();
        assert!(req.validate().is_ok());
        assert_eq!(req.display_name, "Ada");

        let req: SignupRequest = serde_json::from_str(
            r#"{"email":"ada@example.com","password":"pw","displayName":"Ada"}"#,
        )
        .unwrap();
        assert_eq!(req.display_name, "Ada");
    }

    #[test]
    fn signup_rejects_blank_fields() {
        let req: SignupRequest = serde_json::from_str(
            r#"{"email":"  ","password":"pw","name":"Ada"}"#,
        )
        .unwrap();
        assert!(req.validate().is_err());

        let req: SignupRequest = serde_json::from_str(
            r#"{"email":"ada@example.com","password":"","name":"Ada"}"#,
        )
        .unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn login_without_credentials_is_a_validation_error() {
        let req: LoginRequest =
            serde_json::from_str(r#"{"email":"ada@example.com"}"#).unwrap();
        assert!(matches!(req.validate(), Err(ApiError::Validation(_))));

        let req: LoginRequest = serde_json::from_str(r#"{"password":"pw"}"#).unwrap();
        assert!(matches!(req.validate(), Err(ApiError::Validation(_))));

        let req: LoginRequest =
            serde_json::from_str(r#"{"email":"ada@example.com","password":"pw"}"#).unwrap();
        assert!(req.validate().is_ok());
    }
}
