//! The static plan catalog.
//!
//! Fixed at compile time and immutable for the process lifetime. The engine
//! snapshots prices from here at transition time; a subscription or history
//! row never re-derives its amount from the catalog.

use planpilot_shared::PlanKey;
use serde::Serialize;

/// A catalog entry: display name and monthly price in cents.
#[derive(Debug, Clone, Serialize)]
pub struct PlanInfo {
    pub key: PlanKey,
    pub name: &'static str,
    pub price_cents: i64,
}

impl PlanInfo {
    /// Human-readable dollar price, e.g. `$19.99`.
    pub fn price_display(&self) -> String {
        format!("${}.{:02}", self.price_cents / 100, self.price_cents % 100)
    }
}

/// All plans, in declaration order. This order is the API listing order.
pub const CATALOG: [PlanInfo; 4] = [
    PlanInfo {
        key: PlanKey::Free,
        name: "Free",
        price_cents: 0,
    },
    PlanInfo {
        key: PlanKey::Pro,
        name: "Pro",
        price_cents: 19_99,
    },
    PlanInfo {
        key: PlanKey::Ultra,
        name: "Ultra",
        price_cents: 199_99,
    },
    PlanInfo {
        key: PlanKey::Extreme,
        name: "Extreme",
        price_cents: 499_99,
    },
];

/// Look up a plan. Total over `PlanKey`: unknown plan strings are rejected
/// earlier, when parsing into `PlanKey`.
pub fn get(key: PlanKey) -> &'static PlanInfo {
    match key {
        PlanKey::Free => &CATALOG[0],
        PlanKey::Pro => &CATALOG[1],
        PlanKey::Ultra => &CATALOG[2],
        PlanKey::Extreme => &CATALOG[3],
    }
}

/// The full catalog in declaration order.
pub fn all() -> &'static [PlanInfo] {
    &CATALOG
}
