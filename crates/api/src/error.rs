//! API error types and their HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use planpilot_billing::BillingError;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            // Never leak storage details to the caller.
            ApiError::Database(e) => {
                tracing::error!(error = %e, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<BillingError> for ApiError {
    fn from(err: BillingError) -> Self {
        match err {
            BillingError::InvalidPlan(_) => ApiError::Validation(err.to_string()),
            BillingError::AccountNotFound(_) => ApiError::NotFound("Account not found".to_string()),
            BillingError::Database(e) => ApiError::Database(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn billing_errors_map_to_expected_statuses() {
        let invalid: ApiError = BillingError::InvalidPlan("gold".to_string()).into();
        assert!(matches!(invalid, ApiError::Validation(_)));

        let missing: ApiError = BillingError::AccountNotFound(Uuid::new_v4()).into();
        assert!(matches!(missing, ApiError::NotFound(_)));

        let db: ApiError = BillingError::Database(sqlx::Error::PoolClosed).into();
        assert!(matches!(db, ApiError::Database(_)));
    }
}
