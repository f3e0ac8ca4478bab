// Shared crate clippy configuration
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! PlanPilot shared types and helpers
//!
//! Home of the pieces every other crate needs: the plan key type,
//! database pool construction, and the clock abstraction used to make
//! time-dependent billing logic testable.

pub mod clock;
pub mod db;
pub mod plan;

pub use clock::{Clock, FixedClock, SystemClock};
pub use db::{create_pool, run_migrations};
pub use plan::{ParsePlanError, PlanKey};
