//! Billing error types.

use uuid::Uuid;

/// Errors surfaced by the billing crate.
///
/// `InvalidPlan` and `AccountNotFound` are caller mistakes; `Database` wraps
/// any storage failure, after which the enclosing transaction has been rolled
/// back in full.
#[derive(Debug, thiserror::Error)]
pub enum BillingError {
    #[error("invalid plan '{0}'. Valid plans are: free, pro, ultra, extreme")]
    InvalidPlan(String),

    #[error("account {0} not found")]
    AccountNotFound(Uuid),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type BillingResult<T> = Result<T, BillingError>;
