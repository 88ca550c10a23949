mod common;

use chrono::TimeDelta;
use common::{order_in, t0};
use food_order_service::{
    models::OrderStatus,
    status::{advance, next_transition},
};

const ALL: [OrderStatus; 10] = [
    OrderStatus::Created,
    OrderStatus::Pending,
    OrderStatus::Confirmed,
    OrderStatus::Cooking,
    OrderStatus::Delivering,
    OrderStatus::Delivered,
    OrderStatus::Completed,
    OrderStatus::Canceled,
    OrderStatus::Updated,
    OrderStatus::Deleted,
];

#[test]
fn transition_table_matches_lifecycle() {
    let table = [
        (OrderStatus::Created, TimeDelta::seconds(1), OrderStatus::Pending),
        (OrderStatus::Pending, TimeDelta::seconds(5), OrderStatus::Confirmed),
        (OrderStatus::Confirmed, TimeDelta::seconds(5), OrderStatus::Cooking),
        (OrderStatus::Cooking, TimeDelta::minutes(5), OrderStatus::Delivering),
        (OrderStatus::Delivering, TimeDelta::minutes(10), OrderStatus::Completed),
    ];
    for (from, after, to) in table {
        assert_eq!(next_transition(from), Some((after, to)), "from {from}");
    }
    for status in [
        OrderStatus::Delivered,
        OrderStatus::Completed,
        OrderStatus::Canceled,
        OrderStatus::Updated,
        OrderStatus::Deleted,
    ] {
        assert_eq!(next_transition(status), None, "from {status}");
    }
}

#[test]
fn every_step_fires_exactly_at_its_threshold() {
    for status in ALL {
        let Some((threshold, next)) = next_transition(status) else {
            continue;
        };
        let since = t0();

        let mut before = order_in(status, since);
        assert!(!advance(since + threshold - TimeDelta::milliseconds(1), &mut before));
        assert_eq!(before.status, status);

        let mut at = order_in(status, since);
        let now = since + threshold;
        assert!(advance(now, &mut at));
        assert_eq!(at.status, next);
        assert_eq!(at.status_changed_at, now);
        assert_eq!(at.updated_at, now);
    }
}

#[test]
fn never_more_than_one_step_per_call() {
    for status in ALL {
        let mut order = order_in(status, t0());
        advance(t0() + TimeDelta::days(365), &mut order);
        match next_transition(status) {
            Some((_, next)) => assert_eq!(order.status, next),
            None => assert_eq!(order.status, status),
        }
    }
}

#[test]
fn terminal_statuses_never_move() {
    for status in [OrderStatus::Canceled, OrderStatus::Completed, OrderStatus::Deleted] {
        let mut order = order_in(status, t0());
        let before = order.clone();
        for days in [0, 1, 30, 3650] {
            assert!(!advance(t0() + TimeDelta::days(days), &mut order));
        }
        assert_eq!(order, before);
    }
}

#[test]
fn soft_deleted_orders_never_move() {
    let mut order = order_in(OrderStatus::Cooking, t0());
    order.is_deleted = true;
    assert!(!advance(t0() + TimeDelta::hours(1), &mut order));
    assert_eq!(order.status, OrderStatus::Cooking);
}

#[test]
fn elapsed_time_counts_from_last_status_change_not_creation() {
    let mut order = order_in(OrderStatus::Pending, t0());
    order.created_at = t0() - TimeDelta::hours(1);

    assert!(!advance(t0() + TimeDelta::seconds(4), &mut order));
    assert!(advance(t0() + TimeDelta::seconds(5), &mut order));
    assert_eq!(order.status, OrderStatus::Confirmed);
}
