//! Account store contract.
//!
//! The transition engine only needs `plan_for_update` and `set_plan`; the
//! signup/login helpers exist for the API crate so all account SQL lives in
//! one place.

use planpilot_shared::PlanKey;
use serde::Serialize;
use sqlx::{PgConnection, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Public account view. Never carries the credential hash.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub plan: PlanKey,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Account row including the credential hash, for login verification only.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AccountCredentials {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub display_name: String,
    pub plan: PlanKey,
}

/// Read the account's current plan while taking a row lock.
///
/// The lock serializes concurrent plan changes for the same account: a
/// second transition blocks here until the first commits, then reads the
/// committed plan instead of a stale one.
pub async fn plan_for_update(
    conn: &mut PgConnection,
    account_id: Uuid,
) -> Result<Option<PlanKey>, sqlx::Error> {
    sqlx::query_scalar("SELECT plan FROM accounts WHERE id = $1 FOR UPDATE")
        .bind(account_id)
        .fetch_optional(conn)
        .await
}

/// Update the account's current plan.
pub async fn set_plan<'e, E>(
    executor: E,
    account_id: Uuid,
    plan: PlanKey,
) -> Result<bool, sqlx::Error>
where
    E: sqlx::PgExecutor<'e>,
{
    let rows_affected = sqlx::query("UPDATE accounts SET plan = $1 WHERE id = $2")
        .bind(plan)
        .bind(account_id)
        .execute(executor)
        .await?
        .rows_affected();

    Ok(rows_affected > 0)
}

/// Fetch an account by id.
pub async fn find_by_id(pool: &PgPool, account_id: Uuid) -> Result<Option<Account>, sqlx::Error> {
    sqlx::query_as::<_, Account>(
        "SELECT id, email, display_name, plan, created_at FROM accounts WHERE id = $1",
    )
    .bind(account_id)
    .fetch_optional(pool)
    .await
}

/// Fetch an account with credentials by email, for login.
pub async fn find_by_email(
    pool: &PgPool,
    email: &str,
) -> Result<Option<AccountCredentials>, sqlx::Error> {
    sqlx::query_as::<_, AccountCredentials>(
        "SELECT id, email, password_hash, display_name, plan FROM accounts WHERE email = $1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await
}

/// Create a new account on the free plan.
pub async fn create(
    pool: &PgPool,
    email: &str,
    password_hash: &str,
    display_name: &str,
) -> Result<Account, sqlx::Error> {
    sqlx::query_as::<_, Account>(
        r#"
        INSERT INTO accounts (email, password_hash, display_name, plan)
        VALUES ($1, $2, $3, 'free')
        RETURNING id, email, display_name, plan, created_at
        "#,
    )
    .bind(email)
    .bind(password_hash)
    .bind(display_name)
    .fetch_one(pool)
    .await
}
