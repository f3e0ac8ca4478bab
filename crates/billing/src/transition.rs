//! Pure decision logic for plan transitions.
//!
//! `plan_transition` computes what a plan change must do to storage without
//! touching storage: which subscription to close, which to open, and which
//! history entries to append. The engine applies the result inside a single
//! transaction. Keeping this step pure makes every transition shape
//! testable without a database.

use planpilot_shared::PlanKey;
use time::{Date, Month, OffsetDateTime};
use uuid::Uuid;

use crate::ledger::Subscription;
use crate::plans;

/// Close-out of the previous paid subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancelStep {
    pub subscription_id: Uuid,
    /// The plan being left. The cancellation history amount is this plan's
    /// catalog price.
    pub plan: PlanKey,
    pub amount_cents: i64,
}

/// Opening of the new paid subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenStep {
    pub plan: PlanKey,
    pub price_cents: i64,
    pub started_at: OffsetDateTime,
    pub next_billing_date: OffsetDateTime,
}

/// Everything a plan change must write, in order.
///
/// The steps are independent of whether the change is nominally an upgrade
/// or downgrade by price: whatever is open gets closed, whatever the new
/// plan requires gets opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionPlan {
    pub requested: PlanKey,
    /// Present when the account was on a paid plan with an active
    /// subscription to close.
    pub cancel: Option<CancelStep>,
    /// Present when the requested plan is paid.
    pub open: Option<OpenStep>,
    /// True when the requested plan is free: append a zero-amount downgrade
    /// entry with no subscription reference.
    pub free_downgrade: bool,
}

/// Compute the transition from `current` to `requested`.
///
/// `active` is the account's active subscription, if any. An account
/// nominally on a paid plan but with no active row (should not happen) has
/// nothing to cancel, matching the storage contract.
pub fn plan_transition(
    current: PlanKey,
    requested: PlanKey,
    active: Option<&Subscription>,
    now: OffsetDateTime,
) -> TransitionPlan {
    let cancel = if current.is_paid() {
        active.map(|sub| CancelStep {
            subscription_id: sub.id,
            plan: current,
            amount_cents: plans::get(current).price_cents,
        })
    } else {
        None
    };

    let open = requested.is_paid().then(|| OpenStep {
        plan: requested,
        price_cents: plans::get(requested).price_cents,
        started_at: now,
        next_billing_date: add_one_month(now),
    });

    TransitionPlan {
        requested,
        cancel,
        free_downgrade: !requested.is_paid(),
        open,
    }
}

/// Advance a timestamp by one calendar month, clamping the day to the target
/// month's length (Jan 31 -> Feb 28/29).
pub fn add_one_month(from: OffsetDateTime) -> OffsetDateTime {
    let date = from.date();
    let (year, month) = match date.month() {
        Month::December => (date.year() + 1, Month::January),
        m => (date.year(), m.next()),
    };
    let day = date.day().min(time::util::days_in_month(month, year));
    let next = Date::from_calendar_date(year, month, day).unwrap_or(date);
    from.replace_date(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::SubscriptionStatus;
    use time::macros::datetime;

    const NOW: OffsetDateTime = datetime!(2024-06-15 10:30:00 UTC);

    fn active_sub(plan: PlanKey) -> Subscription {
        Subscription {
            id: Uuid::new_v4(),
            account_id: Uuid::new_v4(),
            plan,
            price_cents: plans::get(plan).price_cents,
            status: SubscriptionStatus::Active,
            started_at: datetime!(2024-05-15 10:30:00 UTC),
            next_billing_date: Some(NOW),
        }
    }

    #[test]
    fn free_to_paid_opens_without_cancelling() {
        let plan = plan_transition(PlanKey::Free, PlanKey::Pro, None, NOW);

        assert!(plan.cancel.is_none(), "nothing to cancel on free tier");
        assert!(!plan.free_downgrade);
        let open = plan.open.unwrap();
        assert_eq!(open.plan, PlanKey::Pro);
        assert_eq!(open.price_cents, 1999);
        assert_eq!(open.started_at, NOW);
        assert_eq!(open.next_billing_date, datetime!(2024-07-15 10:30:00 UTC));
    }

    #[test]
    fn paid_to_paid_closes_old_and_opens_new() {
        let sub = active_sub(PlanKey::Pro);
        let plan = plan_transition(PlanKey::Pro, PlanKey::Ultra, Some(&sub), NOW);

        let cancel = plan.cancel.unwrap();
        assert_eq!(cancel.subscription_id, sub.id);
        assert_eq!(cancel.plan, PlanKey::Pro);
        assert_eq!(cancel.amount_cents, 1999, "cancellation carries old plan price");

        let open = plan.open.unwrap();
        assert_eq!(open.plan, PlanKey::Ultra);
        assert_eq!(open.price_cents, 19999);
        assert!(!plan.free_downgrade);
    }

    #[test]
    fn paid_to_free_cancels_and_records_downgrade_only() {
        let sub = active_sub(PlanKey::Extreme);
        let plan = plan_transition(PlanKey::Extreme, PlanKey::Free, Some(&sub), NOW);

        let cancel = plan.cancel.unwrap();
        assert_eq!(cancel.amount_cents, 49999);
        assert!(plan.open.is_none(), "free tier opens no subscription");
        assert!(plan.free_downgrade);
    }

    #[test]
    fn free_to_free_still_records_downgrade_entry() {
        // No short-circuit: repeating a selection churns history by design.
        let plan = plan_transition(PlanKey::Free, PlanKey::Free, None, NOW);

        assert!(plan.cancel.is_none());
        assert!(plan.open.is_none());
        assert!(plan.free_downgrade);
    }

    #[test]
    fn same_paid_plan_churns_full_cancel_open_pair() {
        let sub = active_sub(PlanKey::Pro);
        let plan = plan_transition(PlanKey::Pro, PlanKey::Pro, Some(&sub), NOW);

        assert_eq!(plan.cancel.unwrap().subscription_id, sub.id);
        assert_eq!(plan.open.unwrap().plan, PlanKey::Pro);
    }

    #[test]
    fn price_direction_never_changes_shape() {
        // Upgrade and downgrade between paid plans produce the same step
        // structure; only plans and amounts differ.
        let up_sub = active_sub(PlanKey::Pro);
        let up = plan_transition(PlanKey::Pro, PlanKey::Extreme, Some(&up_sub), NOW);
        let down_sub = active_sub(PlanKey::Extreme);
        let down = plan_transition(PlanKey::Extreme, PlanKey::Pro, Some(&down_sub), NOW);

        assert!(up.cancel.is_some() && up.open.is_some());
        assert!(down.cancel.is_some() && down.open.is_some());
        assert_eq!(down.open.unwrap().price_cents, 1999);
    }

    #[test]
    fn paid_plan_with_no_active_row_has_nothing_to_cancel() {
        // Defensive: account says "pro" but the ledger lost the row.
        let plan = plan_transition(PlanKey::Pro, PlanKey::Ultra, None, NOW);

        assert!(plan.cancel.is_none());
        assert!(plan.open.is_some());
    }

    #[test]
    fn month_addition_clamps_to_shorter_months() {
        assert_eq!(
            add_one_month(datetime!(2024-01-31 00:00:00 UTC)),
            datetime!(2024-02-29 00:00:00 UTC),
            "leap year February"
        );
        assert_eq!(
            add_one_month(datetime!(2023-01-31 00:00:00 UTC)),
            datetime!(2023-02-28 00:00:00 UTC)
        );
        assert_eq!(
            add_one_month(datetime!(2024-03-31 09:00:00 UTC)),
            datetime!(2024-04-30 09:00:00 UTC)
        );
    }

    #[test]
    fn month_addition_rolls_over_december() {
        assert_eq!(
            add_one_month(datetime!(2024-12-05 23:59:59 UTC)),
            datetime!(2025-01-05 23:59:59 UTC)
        );
    }

    #[test]
    fn month_addition_preserves_time_of_day() {
        let next = add_one_month(datetime!(2024-06-15 10:30:45 UTC));
        assert_eq!(next, datetime!(2024-07-15 10:30:45 UTC));
    }
}
