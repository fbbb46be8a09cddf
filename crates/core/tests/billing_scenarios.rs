//! End-to-end billing scenarios and properties for the visit calculator.

use chrono::{Duration, TimeZone, Utc};
use uuid::Uuid;

use xspace_core::billing::{
    bill_visit, billable_hours, billable_hours_with, products_total, time_cost, visit_total,
};
use xspace_core::rates::RateConfig;
use xspace_core::types::Timestamp;
use xspace_core::visit::{PauseInterval, ProductLine, RoomTier, Visit};

fn at(hour: u32, minute: u32) -> Timestamp {
    Utc.with_ymd_and_hms(2024, 3, 1, hour, minute, 0).unwrap()
}

fn visit(start: Timestamp, end: Timestamp) -> Visit {
    Visit::new(Uuid::nil(), start).with_end(end)
}

/// A clock well after every visit in this file; ended visits ignore it.
fn late_now() -> Timestamp {
    at(23, 0)
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn scenario_a_grace_period_is_free() {
    let v = visit(at(9, 0), at(9, 10));
    let hours = billable_hours(&v, late_now());
    assert_eq!(hours, 0);
    assert_eq!(
        time_cost(hours, 1, RoomTier::Standard, &RateConfig::default()),
        0.0
    );
}

#[test]
fn scenario_b_remainder_rounds_up() {
    let v = visit(at(9, 0), at(10, 20));
    let hours = billable_hours(&v, late_now());
    assert_eq!(hours, 2);
    assert_eq!(
        time_cost(hours, 1, RoomTier::Standard, &RateConfig::default()),
        15.0
    );
}

#[test]
fn scenario_c_small_remainder_is_dropped() {
    let v = visit(at(9, 0), at(10, 10)).with_people(2);
    let hours = billable_hours(&v, late_now());
    assert_eq!(hours, 1);
    assert_eq!(
        time_cost(hours, 2, RoomTier::Standard, &RateConfig::default()),
        20.0
    );
}

#[test]
fn scenario_d_large_hall() {
    let v = visit(at(9, 0), at(12, 0))
        .with_people(3)
        .with_tier(RoomTier::Large);
    let hours = billable_hours(&v, late_now());
    assert_eq!(hours, 3);
    assert_eq!(
        time_cost(hours, 3, RoomTier::Large, &RateConfig::default()),
        900.0
    );
    assert_eq!(visit_total(&v, late_now(), &RateConfig::default()), 900.0);
}

#[test]
fn scenario_e_pause_is_subtracted() {
    let v = visit(at(9, 0), at(10, 30)).with_pause(PauseInterval::closed(at(9, 30), at(10, 0)));
    let hours = billable_hours(&v, late_now());
    assert_eq!(hours, 1);
    assert_eq!(visit_total(&v, late_now(), &RateConfig::default()), 10.0);
}

#[test]
fn scenario_f_products_only() {
    let v = visit(at(9, 0), at(9, 5))
        .with_product(ProductLine::new("coffee", 5.0, 2))
        .with_product(ProductLine::new("biscuit", 3.0, 1));
    assert_eq!(billable_hours(&v, late_now()), 0);
    assert_eq!(visit_total(&v, late_now(), &RateConfig::default()), 13.0);
}

#[test]
fn configured_grace_and_threshold_reach_the_total() {
    let rates = RateConfig {
        grace_minutes: 30,
        round_up_threshold_minutes: 45,
        ..RateConfig::default()
    };

    // 20 min: billed one hour by default, free under a 30 minute grace.
    let short = visit(at(9, 0), at(9, 20));
    assert_eq!(billable_hours(&short, late_now()), 1);
    assert_eq!(billable_hours_with(&short, late_now(), &rates), 0);
    assert_eq!(visit_total(&short, late_now(), &rates), 0.0);

    // 100 min: a 40 minute remainder rounds up by default but not at 45.
    let v = visit(at(9, 0), at(10, 40)).with_product(ProductLine::new("tea", 2.5, 2));
    assert_eq!(visit_total(&v, late_now(), &RateConfig::default()), 20.0);
    let bill = bill_visit(&v, late_now(), &rates);
    assert_eq!(bill.billable_hours, 1);
    assert_eq!(bill.time_cost, 10.0);
    assert_eq!(bill.total, 15.0);
    assert_eq!(visit_total(&v, late_now(), &rates), bill.total);

    // 110 min: a 50 minute remainder still rounds up.
    let longer = visit(at(9, 0), at(10, 50));
    assert_eq!(billable_hours_with(&longer, late_now(), &rates), 2);
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

#[test]
fn under_grace_is_free_for_every_tier_and_headcount() {
    let rates = RateConfig::default();
    for minutes in 0..15 {
        for tier in RoomTier::ALL {
            for people in 1..=5 {
                let v = visit(at(9, 0), at(9, 0) + Duration::minutes(minutes))
                    .with_people(people)
                    .with_tier(tier);
                assert_eq!(billable_hours(&v, late_now()), 0);
                assert_eq!(visit_total(&v, late_now(), &rates), 0.0);
            }
        }
    }
}

#[test]
fn billable_hours_never_decrease_with_more_time() {
    let rates = RateConfig::default();
    let mut previous = 0;
    for minutes in 0..=(10 * 60) {
        let v = visit(at(0, 0), at(0, 0) + Duration::minutes(minutes));
        let hours = billable_hours_with(&v, late_now(), &rates);
        assert!(
            hours >= previous,
            "{minutes} minutes billed {hours} h, fewer than {previous} h"
        );
        previous = hours;
    }
}

#[test]
fn zero_hours_cost_nothing_for_any_headcount() {
    let rates = RateConfig::default();
    for tier in RoomTier::ALL {
        for people in [1, 2, 10, 100] {
            assert_eq!(time_cost(0, people, tier, &rates), 0.0);
        }
    }
}

#[test]
fn visit_total_is_products_plus_time_cost() {
    let rates = RateConfig {
        first_hour_rate: 12.0,
        next_hour_rate: 4.5,
        ..RateConfig::default()
    };
    let now = at(14, 7);
    let visits = [
        Visit::new(Uuid::nil(), at(9, 0)),
        Visit::new(Uuid::nil(), at(9, 0))
            .with_people(4)
            .with_tier(RoomTier::Small)
            .with_pause(PauseInterval::open(at(13, 0))),
        visit(at(8, 12), at(11, 59))
            .with_tier(RoomTier::Large)
            .with_product(ProductLine::new("water", 1.25, 3)),
    ];

    for v in &visits {
        let direct = products_total(v)
            + time_cost(
                billable_hours_with(v, now, &rates),
                v.number_of_people,
                v.room_tier,
                &rates,
            );
        assert_eq!(visit_total(v, now, &rates), direct);
    }
}

#[test]
fn thirty_minute_pause_equals_shorter_visit() {
    for tier in RoomTier::ALL {
        for people in [1, 3] {
            let paused = visit(at(9, 0), at(11, 0))
                .with_pause(PauseInterval::closed(at(10, 0), at(10, 30)))
                .with_people(people)
                .with_tier(tier);
            let shorter = visit(at(9, 0), at(10, 30))
                .with_people(people)
                .with_tier(tier);
            assert_eq!(
                billable_hours(&paused, late_now()),
                billable_hours(&shorter, late_now())
            );
        }
    }
}

#[test]
fn live_total_is_idempotent_and_grows_with_clock() {
    let rates = RateConfig::default();
    let v = Visit::new(Uuid::nil(), at(9, 0));

    let first = visit_total(&v, at(10, 20), &rates);
    let again = visit_total(&v, at(10, 20), &rates);
    assert_eq!(first, again);

    let later = visit_total(&v, at(12, 0), &rates);
    assert!(later >= first);
}
