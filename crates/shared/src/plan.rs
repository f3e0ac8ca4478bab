//! Plan key type shared between the billing engine and the API layer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The four fixed plans, in catalog declaration order.
///
/// Stored as lowercase TEXT in the `accounts`, `subscriptions`, and
/// `billing_history` tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanKey {
    Free,
    Pro,
    Ultra,
    Extreme,
}

/// Error returned when a string is not a known plan key.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown plan key: {0}")]
pub struct ParsePlanError(pub String);

impl PlanKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanKey::Free => "free",
            PlanKey::Pro => "pro",
            PlanKey::Ultra => "ultra",
            PlanKey::Extreme => "extreme",
        }
    }

    /// Whether this plan carries a recurring charge.
    /// Free-tier accounts have no subscription row by convention.
    pub fn is_paid(&self) -> bool {
        !matches!(self, PlanKey::Free)
    }
}

impl fmt::Display for PlanKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlanKey {
    type Err = ParsePlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(PlanKey::Free),
            "pro" => Ok(PlanKey::Pro),
            "ultra" => Ok(PlanKey::Ultra),
            "extreme" => Ok(PlanKey::Extreme),
            other => Err(ParsePlanError(other.to_string())),
        }
    }
}

// Map to/from Postgres TEXT rather than a database enum type so the schema
// stays plain and migrations never have to ALTER TYPE.
impl sqlx::Type<sqlx::Postgres> for PlanKey {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <&str as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <&str as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

impl<'q> sqlx::Encode<'q, sqlx::Postgres> for PlanKey {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <&str as sqlx::Encode<'q, sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
    }
}

impl<'r> sqlx::Decode<'r, sqlx::Postgres> for PlanKey {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <&str as sqlx::Decode<'r, sqlx::Postgres>>::decode(value)?;
        Ok(s.parse()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_catalog_keys() {
        assert_eq!("free".parse::<PlanKey>().unwrap(), PlanKey::Free);
        assert_eq!("pro".parse::<PlanKey>().unwrap(), PlanKey::Pro);
        assert_eq!("ultra".parse::<PlanKey>().unwrap(), PlanKey::Ultra);
        assert_eq!("extreme".parse::<PlanKey>().unwrap(), PlanKey::Extreme);
    }

    #[test]
    fn rejects_unknown_and_mixed_case_keys() {
        assert!("enterprise".parse::<PlanKey>().is_err());
        assert!("Pro".parse::<PlanKey>().is_err());
        assert!("".parse::<PlanKey>().is_err());
    }

    #[test]
    fn display_round_trips() {
        for plan in [PlanKey::Free, PlanKey::Pro, PlanKey::Ultra, PlanKey::Extreme] {
            assert_eq!(plan.to_string().parse::<PlanKey>().unwrap(), plan);
        }
    }

    #[test]
    fn only_free_is_unpaid() {
        assert!(!PlanKey::Free.is_paid());
        assert!(PlanKey::Pro.is_paid());
        assert!(PlanKey::Ultra.is_paid());
        assert!(PlanKey::Extreme.is_paid());
    }
}
