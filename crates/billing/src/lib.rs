// Test code patterns (expected in test files):
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! PlanPilot Billing Module
//!
//! The subscription lifecycle core: a static plan catalog, the transition
//! engine that moves accounts between plans, and the append-only billing
//! history behind it.
//!
//! ## Features
//!
//! - **Plan Catalog**: Fixed free/pro/ultra/extreme pricing, immutable at runtime
//! - **Transition Engine**: Atomic close-old / open-new / record-history plan changes
//! - **Subscription Ledger**: Active/cancelled subscription records, never deleted
//! - **Billing History**: Append-only audit trail of every plan-change event
//!
//! Billing is simulated; no payment gateway is involved.

pub mod accounts;
pub mod error;
pub mod history;
pub mod ledger;
pub mod plans;
pub mod subscriptions;
pub mod transition;

// Accounts
pub use accounts::{Account, AccountCredentials};

// Error
pub use error::{BillingError, BillingResult};

// History
pub use history::{BillingEventType, BillingHistoryEntry, NewHistoryEntry};

// Ledger
pub use ledger::{NewSubscription, Subscription, SubscriptionStatus};

// Plans
pub use plans::PlanInfo;

// Subscriptions
pub use subscriptions::{PlanState, SubscriptionService};

// Transition
pub use transition::{add_one_month, plan_transition, CancelStep, OpenStep, TransitionPlan};
