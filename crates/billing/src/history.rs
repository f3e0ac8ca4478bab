//! Billing history log: append-only record of every plan-change event.
//!
//! No update or delete operation is exposed; rows are written once inside
//! the transition engine's transaction and only ever read afterwards.

use planpilot_shared::PlanKey;
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

/// What kind of plan-change event a history row records.
///
/// `Upgrade` is written for any newly opened paid subscription regardless of
/// price direction; the UI decides how to label it. `Downgrade` is reserved
/// for moves to the free tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingEventType {
    Upgrade,
    Downgrade,
    Cancellation,
}

impl BillingEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillingEventType::Upgrade => "upgrade",
            BillingEventType::Downgrade => "downgrade",
            BillingEventType::Cancellation => "cancellation",
        }
    }
}

impl std::fmt::Display for BillingEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BillingEventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upgrade" => Ok(BillingEventType::Upgrade),
            "downgrade" => Ok(BillingEventType::Downgrade),
            "cancellation" => Ok(BillingEventType::Cancellation),
            other => Err(format!("unknown billing event type: {other}")),
        }
    }
}

impl sqlx::Type<sqlx::Postgres> for BillingEventType {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <&str as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <&str as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

impl<'q> sqlx::Encode<'q, sqlx::Postgres> for BillingEventType {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <&str as sqlx::Encode<'q, sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
    }
}

impl<'r> sqlx::Decode<'r, sqlx::Postgres> for BillingEventType {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <&str as sqlx::Decode<'r, sqlx::Postgres>>::decode(value)?;
        s.parse().map_err(Into::into)
    }
}

/// A persisted billing history row.
///
/// `subscription_id` is a weak reference and null for pure free-tier events.
/// `status` is always `completed` in this simulation.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct BillingHistoryEntry {
    pub id: Uuid,
    pub account_id: Uuid,
    pub subscription_id: Option<Uuid>,
    pub amount_cents: i64,
    pub plan: PlanKey,
    pub event_type: BillingEventType,
    pub status: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Fields for appending a history entry.
#[derive(Debug, Clone)]
pub struct NewHistoryEntry {
    pub account_id: Uuid,
    pub subscription_id: Option<Uuid>,
    pub amount_cents: i64,
    pub plan: PlanKey,
    pub event_type: BillingEventType,
    pub created_at: OffsetDateTime,
}

/// Append a history entry and return its id.
pub async fn append<'e, E>(executor: E, entry: &NewHistoryEntry) -> Result<Uuid, sqlx::Error>
where
    E: sqlx::PgExecutor<'e>,
{
    sqlx::query_scalar(
        r#"
        INSERT INTO billing_history
            (account_id, subscription_id, amount_cents, plan, event_type, status, created_at)
        VALUES ($1, $2, $3, $4, $5, 'completed', $6)
        RETURNING id
        "#,
    )
    .bind(entry.account_id)
    .bind(entry.subscription_id)
    .bind(entry.amount_cents)
    .bind(entry.plan)
    .bind(entry.event_type)
    .bind(entry.created_at)
    .fetch_one(executor)
    .await
}

/// List an account's history, newest first.
pub async fn list_by_account<'e, E>(
    executor: E,
    account_id: Uuid,
) -> Result<Vec<BillingHistoryEntry>, sqlx::Error>
where
    E: sqlx::PgExecutor<'e>,
{
    sqlx::query_as::<_, BillingHistoryEntry>(
        r#"
        SELECT id, account_id, subscription_id, amount_cents, plan, event_type, status, created_at
        FROM billing_history
        WHERE account_id = $1
        ORDER BY created_at DESC, seq DESC
        "#,
    )
    .bind(account_id)
    .fetch_all(executor)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_type_round_trips_through_strings() {
        for event in [
            BillingEventType::Upgrade,
            BillingEventType::Downgrade,
            BillingEventType::Cancellation,
        ] {
            let parsed: BillingEventType = event.as_str().parse().unwrap();
            assert_eq!(parsed, event);
        }
        assert!("refund".parse::<BillingEventType>().is_err());
    }
}
