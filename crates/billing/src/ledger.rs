//! Subscription ledger: persisted subscription records and their data access.
//!
//! Every function takes a `PgExecutor` so it can run against the pool or
//! inside the transition engine's transaction.

use planpilot_shared::PlanKey;
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

/// Subscription lifecycle status. Rows are never deleted; superseded
/// subscriptions transition to `cancelled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Active,
    Cancelled,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SubscriptionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(SubscriptionStatus::Active),
            "cancelled" => Ok(SubscriptionStatus::Cancelled),
            other => Err(format!("unknown subscription status: {other}")),
        }
    }
}

impl sqlx::Type<sqlx::Postgres> for SubscriptionStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <&str as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <&str as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

impl<'q> sqlx::Encode<'q, sqlx::Postgres> for SubscriptionStatus {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <&str as sqlx::Encode<'q, sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
    }
}

impl<'r> sqlx::Decode<'r, sqlx::Postgres> for SubscriptionStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <&str as sqlx::Decode<'r, sqlx::Postgres>>::decode(value)?;
        s.parse().map_err(Into::into)
    }
}

/// A persisted subscription record.
///
/// `price_cents` is the catalog price captured when the subscription was
/// opened, so later catalog changes never alter history.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Subscription {
    pub id: Uuid,
    pub account_id: Uuid,
    pub plan: PlanKey,
    pub price_cents: i64,
    pub status: SubscriptionStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub next_billing_date: Option<OffsetDateTime>,
}

/// Fields for opening a new subscription.
#[derive(Debug, Clone)]
pub struct NewSubscription {
    pub account_id: Uuid,
    pub plan: PlanKey,
    pub price_cents: i64,
    pub started_at: OffsetDateTime,
    pub next_billing_date: Option<OffsetDateTime>,
}

/// Find the account's active subscription.
///
/// The "at most one active" invariant should make this unique; the
/// most-recently-started row wins as a defensive tie-break.
pub async fn find_active_by_account<'e, E>(
    executor: E,
    account_id: Uuid,
) -> Result<Option<Subscription>, sqlx::Error>
where
    E: sqlx::PgExecutor<'e>,
{
    sqlx::query_as::<_, Subscription>(
        r#"
        SELECT id, account_id, plan, price_cents, status, started_at, next_billing_date
        FROM subscriptions
        WHERE account_id = $1 AND status = 'active'
        ORDER BY started_at DESC
        LIMIT 1
        "#,
    )
    .bind(account_id)
    .fetch_optional(executor)
    .await
}

/// Open a new subscription and return the stored row.
pub async fn create<'e, E>(executor: E, new: &NewSubscription) -> Result<Subscription, sqlx::Error>
where
    E: sqlx::PgExecutor<'e>,
{
    sqlx::query_as::<_, Subscription>(
        r#"
        INSERT INTO subscriptions (account_id, plan, price_cents, status, started_at, next_billing_date)
        VALUES ($1, $2, $3, 'active', $4, $5)
        RETURNING id, account_id, plan, price_cents, status, started_at, next_billing_date
        "#,
    )
    .bind(new.account_id)
    .bind(new.plan)
    .bind(new.price_cents)
    .bind(new.started_at)
    .bind(new.next_billing_date)
    .fetch_one(executor)
    .await
}

/// Set a subscription's status. Returns false if the row does not exist.
pub async fn set_status<'e, E>(
    executor: E,
    subscription_id: Uuid,
    status: SubscriptionStatus,
) -> Result<bool, sqlx::Error>
where
    E: sqlx::PgExecutor<'e>,
{
    let rows_affected = sqlx::query("UPDATE subscriptions SET status = $1 WHERE id = $2")
        .bind(status)
        .bind(subscription_id)
        .execute(executor)
        .await?
        .rows_affected();

    Ok(rows_affected > 0)
}

/// Fetch a subscription by id.
pub async fn find_by_id<'e, E>(
    executor: E,
    subscription_id: Uuid,
) -> Result<Option<Subscription>, sqlx::Error>
where
    E: sqlx::PgExecutor<'e>,
{
    sqlx::query_as::<_, Subscription>(
        r#"
        SELECT id, account_id, plan, price_cents, status, started_at, next_billing_date
        FROM subscriptions
        WHERE id = $1
        "#,
    )
    .bind(subscription_id)
    .fetch_optional(executor)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_strings() {
        for status in [SubscriptionStatus::Active, SubscriptionStatus::Cancelled] {
            let parsed: SubscriptionStatus = status.as_str().parse().unwrap();
            assert_eq!(parsed, status);
        }
        assert!("expired".parse::<SubscriptionStatus>().is_err());
    }
}
