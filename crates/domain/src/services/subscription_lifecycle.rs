//! Subscription lifecycle evaluator.
//!
//! Pure functions over already-fetched subscription rows. "Now" is an
//! injectable parameter so callers and tests control the clock; no I/O.

use chrono::{DateTime, Utc};

use crate::models::subscription::{Subscription, SubscriptionStatus};

/// Whether a subscription is active at the given instant.
///
/// Active iff `is_paid` and the end date is null (unbounded) or in the future.
pub fn is_active(subscription: &Subscription, now: DateTime<Utc>) -> bool {
    subscription.is_active_at(now)
}

/// Selects the authoritative current subscription record.
///
/// Rows are ordered by `begins_at` descending, a null `begins_at` sorting as
/// the earliest. The first active row wins. When none are active the most
/// recent row is returned as the "last known" state so callers can still show
/// when access ended. Only an empty history yields `None`.
///
/// The sort is stable: rows with equal `begins_at` keep their input order,
/// which the store provides in `created_at` order.
pub fn select_current(
    subscriptions: &[Subscription],
    now: DateTime<Utc>,
) -> Option<&Subscription> {
    let mut ordered: Vec<&Subscription> = subscriptions.iter().collect();
    ordered.sort_by_key(|s| {
        std::cmp::Reverse(s.begins_at.unwrap_or(DateTime::<Utc>::UNIX_EPOCH))
    });

    ordered
        .iter()
        .find(|s| s.is_active_at(now))
        .copied()
        .or_else(|| ordered.first().copied())
}

/// Evaluates the status verdict for an enrollment's subscription history.
pub fn evaluate_status(subscriptions: &[Subscription], now: DateTime<Utc>) -> SubscriptionStatus {
    match select_current(subscriptions, now) {
        Some(current) if current.is_active_at(now) => SubscriptionStatus::Active,
        Some(_) => SubscriptionStatus::Expired,
        None => SubscriptionStatus::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn sub(
        begins_at: Option<DateTime<Utc>>,
        ends_at: Option<DateTime<Utc>>,
        is_paid: bool,
    ) -> Subscription {
        Subscription {
            id: Uuid::new_v4(),
            enrollment_id: Uuid::new_v4(),
            begins_at,
            ends_at,
            is_paid,
            created_at: Utc::now(),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_select_current_empty() {
        let now = Utc::now();
        assert!(select_current(&[], now).is_none());
        assert_eq!(evaluate_status(&[], now), SubscriptionStatus::None);
    }

    #[test]
    fn test_select_current_prefers_active_renewal() {
        // A bounded expired period followed by an unbounded active renewal;
        // the renewal wins.
        let now = date(2024, 4, 1);
        let old = sub(Some(date(2024, 1, 1)), Some(date(2024, 2, 1)), true);
        let renewal = sub(Some(date(2024, 3, 1)), None, true);

        let subs = [old.clone(), renewal.clone()];
        let current = select_current(&subs, now).unwrap();
        assert_eq!(current.id, renewal.id);
        assert_eq!(
            evaluate_status(&[old, renewal], now),
            SubscriptionStatus::Active
        );
    }

    #[test]
    fn test_select_current_most_recent_wins_when_none_active() {
        // The most recent record wins the fallback branch even though an
        // earlier record was once active.
        let now = date(2024, 4, 1);
        let once_active = sub(Some(date(2024, 1, 1)), Some(date(2024, 2, 1)), true);
        let unpaid = sub(Some(date(2024, 3, 1)), None, false);

        let subs = [once_active.clone(), unpaid.clone()];
        let current = select_current(&subs, now).unwrap();
        assert_eq!(current.id, unpaid.id);
        assert_eq!(
            evaluate_status(&[once_active, unpaid], now),
            SubscriptionStatus::Expired
        );
    }

    #[test]
    fn test_select_current_order_invariant() {
        let now = date(2024, 4, 1);
        let a = sub(Some(date(2024, 1, 1)), Some(date(2024, 2, 1)), true);
        let b = sub(Some(date(2024, 3, 1)), None, true);

        let forward = select_current(&[a.clone(), b.clone()], now).unwrap().id;
        let reversed = select_current(&[b, a], now).unwrap().id;
        assert_eq!(forward, reversed);
    }

    #[test]
    fn test_select_current_null_begin_sorts_earliest() {
        let now = date(2024, 4, 1);
        let undated = sub(None, None, true);
        let dated = sub(Some(date(2024, 3, 1)), None, true);

        let subs = [undated, dated.clone()];
        let current = select_current(&subs, now).unwrap();
        assert_eq!(current.id, dated.id);
    }

    #[test]
    fn test_select_current_undated_only() {
        let now = Utc::now();
        let undated = sub(None, None, true);
        let current = select_current(std::slice::from_ref(&undated), now).unwrap();
        assert_eq!(current.id, undated.id);
    }

    #[test]
    fn test_select_current_equal_begin_dates_stable() {
        // Equal begins_at: stable sort keeps input order, so the first listed
        // (store returns created_at order) wins.
        let now = date(2024, 4, 1);
        let begins = Some(date(2024, 3, 1));
        let first = sub(begins, None, true);
        let second = sub(begins, None, true);

        let subs = [first.clone(), second];
        let current = select_current(&subs, now).unwrap();
        assert_eq!(current.id, first.id);
    }

    #[test]
    fn test_is_active_truth_table() {
        let now = Utc::now();
        assert!(is_active(&sub(None, None, true), now));
        assert!(!is_active(
            &sub(None, Some(now - chrono::Duration::days(1)), true),
            now
        ));
        assert!(!is_active(
            &sub(None, Some(now + chrono::Duration::days(1)), false),
            now
        ));
    }

    #[test]
    fn test_expired_fallback_reports_last_known_record() {
        let now = date(2024, 6, 1);
        let a = sub(Some(date(2024, 1, 1)), Some(date(2024, 2, 1)), true);
        let b = sub(Some(date(2024, 3, 1)), Some(date(2024, 4, 1)), true);

        let subs = [a, b.clone()];
        let current = select_current(&subs, now).unwrap();
        assert_eq!(current.id, b.id);
        assert!(!current.is_active_at(now));
    }
}
