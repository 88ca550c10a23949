//! Elapsed-time status transitions.
//!
//! One table drives both the background worker and the lazy advancement
//! applied on reads:
//!
//! | from       | after | to         |
//! |------------|-------|------------|
//! | created    | 1s    | pending    |
//! | pending    | 5s    | confirmed  |
//! | confirmed  | 5s    | cooking    |
//! | cooking    | 5m    | delivering |
//! | delivering | 10m   | completed  |
//!
//! Any other status never moves on its own.

use chrono::{DateTime, TimeDelta, Utc};

use crate::models::{Order, OrderStatus};

/// The step out of `status`, if the table has one: how long the order must
/// sit in `status` and where it goes next.
pub fn next_transition(status: OrderStatus) -> Option<(TimeDelta, OrderStatus)> {
    match status {
        OrderStatus::Created => Some((TimeDelta::seconds(1), OrderStatus::Pending)),
        OrderStatus::Pending => Some((TimeDelta::seconds(5), OrderStatus::Confirmed)),
        OrderStatus::Confirmed => Some((TimeDelta::seconds(5), OrderStatus::Cooking)),
        OrderStatus::Cooking => Some((TimeDelta::minutes(5), OrderStatus::Delivering)),
        OrderStatus::Delivering => Some((TimeDelta::minutes(10), OrderStatus::Completed)),
        _ => None,
    }
}

/// Time the order has spent in its current status.
pub fn time_in_status(now: DateTime<Utc>, order: &Order) -> TimeDelta {
    now - order.status_changed_at
}

/// Applies at most one transition to `order`. Returns whether the status
/// changed; on change `status_changed_at` and `updated_at` are both `now`.
pub fn advance(now: DateTime<Utc>, order: &mut Order) -> bool {
    if order.is_deleted || order.status.is_terminal() {
        return false;
    }
    let Some((threshold, next)) = next_transition(order.status) else {
        return false;
    };
    if time_in_status(now, order) < threshold {
        return false;
    }

    order.status = next;
    order.status_changed_at = now;
    order.updated_at = now;
    true
}

/// Earliest instant a freshly created order can reach `completed`.
pub fn estimated_delivery(created_at: DateTime<Utc>) -> DateTime<Utc> {
    let mut status = OrderStatus::Created;
    let mut at = created_at;
    while let Some((threshold, next)) = next_transition(status) {
        at += threshold;
        status = next;
    }
    at
}
