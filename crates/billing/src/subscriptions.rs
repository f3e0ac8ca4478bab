//! Subscription transition engine.
//!
//! The single authoritative path for changing an account's plan. Every
//! change — upgrade, downgrade, or re-selection — goes through
//! [`SubscriptionService::change_plan`], which executes the close-old /
//! open-new / record-history sequence as one transaction.

use std::sync::Arc;

use planpilot_shared::{Clock, PlanKey, SystemClock};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::accounts;
use crate::error::{BillingError, BillingResult};
use crate::history::{self, BillingEventType, BillingHistoryEntry, NewHistoryEntry};
use crate::ledger::{self, NewSubscription, Subscription, SubscriptionStatus};
use crate::plans::{self, PlanInfo};
use crate::transition::plan_transition;

/// An account's effective subscription state.
#[derive(Debug, Clone, Serialize)]
pub struct PlanState {
    pub plan: PlanKey,
    pub plan_details: PlanInfo,
    pub subscription: Option<Subscription>,
}

/// Service owning the plan-change transaction.
///
/// Holds an injected pool handle and clock; no process-wide state.
pub struct SubscriptionService {
    pool: PgPool,
    clock: Arc<dyn Clock>,
}

impl SubscriptionService {
    pub fn new(pool: PgPool) -> Self {
        Self::with_clock(pool, Arc::new(SystemClock))
    }

    /// Construct with an explicit clock, for tests that pin timestamps.
    pub fn with_clock(pool: PgPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }

    /// Change an account's plan.
    ///
    /// Atomically closes the previous paid subscription (if any), opens the
    /// new one (unless the target is free), appends the matching billing
    /// history entries, and updates the account's current plan. Concurrent
    /// calls for the same account serialize on the account row lock; either
    /// all writes commit or none do.
    ///
    /// Re-selecting the current plan is not short-circuited: the full
    /// cancel/open sequence runs again and appends fresh history rows.
    pub async fn change_plan(
        &self,
        account_id: Uuid,
        requested_plan: &str,
    ) -> BillingResult<PlanState> {
        let requested: PlanKey = requested_plan
            .parse()
            .map_err(|_| BillingError::InvalidPlan(requested_plan.to_string()))?;

        let now = self.clock.now();
        let mut tx = self.pool.begin().await?;

        // Row lock doubles as the per-account mutex for the whole sequence.
        let current = accounts::plan_for_update(&mut *tx, account_id)
            .await?
            .ok_or(BillingError::AccountNotFound(account_id))?;

        let active = if current.is_paid() {
            ledger::find_active_by_account(&mut *tx, account_id).await?
        } else {
            None
        };

        let plan = plan_transition(current, requested, active.as_ref(), now);

        if let Some(cancel) = &plan.cancel {
            ledger::set_status(
                &mut *tx,
                cancel.subscription_id,
                SubscriptionStatus::Cancelled,
            )
            .await?;
            history::append(
                &mut *tx,
                &NewHistoryEntry {
                    account_id,
                    subscription_id: Some(cancel.subscription_id),
                    amount_cents: cancel.amount_cents,
                    plan: cancel.plan,
                    event_type: BillingEventType::Cancellation,
                    created_at: now,
                },
            )
            .await?;
        }

        let subscription = match &plan.open {
            Some(open) => {
                let sub = ledger::create(
                    &mut *tx,
                    &NewSubscription {
                        account_id,
                        plan: open.plan,
                        price_cents: open.price_cents,
                        started_at: open.started_at,
                        next_billing_date: Some(open.next_billing_date),
                    },
                )
                .await?;
                history::append(
                    &mut *tx,
                    &NewHistoryEntry {
                        account_id,
                        subscription_id: Some(sub.id),
                        amount_cents: open.price_cents,
                        plan: open.plan,
                        event_type: BillingEventType::Upgrade,
                        created_at: now,
                    },
                )
                .await?;
                Some(sub)
            }
            None => {
                if plan.free_downgrade {
                    history::append(
                        &mut *tx,
                        &NewHistoryEntry {
                            account_id,
                            subscription_id: None,
                            amount_cents: 0,
                            plan: PlanKey::Free,
                            event_type: BillingEventType::Downgrade,
                            created_at: now,
                        },
                    )
                    .await?;
                }
                None
            }
        };

        accounts::set_plan(&mut *tx, account_id, requested).await?;

        tx.commit().await?;

        tracing::info!(
            account_id = %account_id,
            from_plan = %current,
            to_plan = %requested,
            "Plan changed"
        );

        Ok(PlanState {
            plan: requested,
            plan_details: plans::get(requested).clone(),
            subscription,
        })
    }

    /// Current effective state: account plan, catalog details, and the
    /// active subscription if one exists.
    pub async fn current_state(&self, account_id: Uuid) -> BillingResult<PlanState> {
        let account = accounts::find_by_id(&self.pool, account_id)
            .await?
            .ok_or(BillingError::AccountNotFound(account_id))?;

        let subscription = ledger::find_active_by_account(&self.pool, account_id).await?;

        Ok(PlanState {
            plan: account.plan,
            plan_details: plans::get(account.plan).clone(),
            subscription,
        })
    }

    /// Billing history for an account, newest first.
    pub async fn history(&self, account_id: Uuid) -> BillingResult<Vec<BillingHistoryEntry>> {
        Ok(history::list_by_account(&self.pool, account_id).await?)
    }
}
