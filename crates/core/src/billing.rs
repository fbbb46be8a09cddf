//! Visit time-and-billing calculator.
//!
//! The only place visit cost is derived. Every display surface (live
//! running totals, check-out receipts, daily summaries) goes through
//! [`visit_total`] or [`bill_visit`] instead of re-deriving the formula.
//!
//! All functions are pure: `now` is always passed in, nothing is cached,
//! and repeated calls against an open visit are safe.

use chrono::Duration;
use serde::Serialize;

use crate::rates::{RateConfig, MINUTES_PER_HOUR};
use crate::types::{Amount, Timestamp};
use crate::visit::{RoomTier, Visit, VisitStatus};

// ---------------------------------------------------------------------------
// Elapsed time
// ---------------------------------------------------------------------------

/// Elapsed time of `visit` minus all pauses, never negative.
///
/// Open visits and open pauses are measured up to `now`. Malformed pause
/// histories (overlapping, or extending past the visit end) can push the
/// raw difference below zero; that result is clamped to zero. Callers that
/// want such records rejected should run
/// [`validate_visit`](crate::validation::validate_visit) first.
pub fn net_elapsed(visit: &Visit, now: Timestamp) -> Duration {
    let raw = visit.effective_end(now) - visit.start_time;
    let paused = visit
        .pause_history
        .iter()
        .try_fold(Duration::zero(), |acc, pause| acc.checked_add(&pause.duration(now)));

    // An overflowing pause total is treated like any other pause total
    // larger than the visit itself.
    let net = paused.and_then(|paused| raw.checked_sub(&paused));

    match net {
        Some(net) if net >= Duration::zero() => net,
        _ => {
            tracing::debug!(
                visit_id = %visit.id,
                net_seconds = ?net.map(|n| n.num_seconds()),
                "Net elapsed time is negative or out of range, clamping to zero",
            );
            Duration::zero()
        }
    }
}

/// Net elapsed time in whole minutes, truncated.
pub fn net_minutes(visit: &Visit, now: Timestamp) -> u32 {
    u32::try_from(net_elapsed(visit, now).num_minutes()).unwrap_or(u32::MAX)
}

// ---------------------------------------------------------------------------
// Billable hours
// ---------------------------------------------------------------------------

/// Apply the grace period and round-up rule to a net minute count.
///
/// Below `grace_minutes` nothing is billed. Otherwise whole hours are
/// billed, plus one more when the remainder reaches
/// `round_up_threshold_minutes`.
pub fn billable_hours_for_minutes(minutes: u32, rates: &RateConfig) -> u32 {
    if minutes < rates.grace_minutes {
        return 0;
    }
    let full_hours = minutes / MINUTES_PER_HOUR;
    let remainder = minutes % MINUTES_PER_HOUR;
    if remainder >= rates.round_up_threshold_minutes {
        full_hours + 1
    } else {
        full_hours
    }
}

/// Billable hours using the reference grace and round-up thresholds.
pub fn billable_hours(visit: &Visit, now: Timestamp) -> u32 {
    billable_hours_with(visit, now, &RateConfig::default())
}

/// Billable hours using the thresholds in `rates`.
pub fn billable_hours_with(visit: &Visit, now: Timestamp, rates: &RateConfig) -> u32 {
    billable_hours_for_minutes(net_minutes(visit, now), rates)
}

// ---------------------------------------------------------------------------
// Cost
// ---------------------------------------------------------------------------

/// Time charge for `billable_hours` hours.
///
/// Halls bill a flat rate per person per hour. The standard tier bills
/// `first_hour_rate` for hour one and `next_hour_rate` for each further
/// hour, per person. No currency rounding is applied.
pub fn time_cost(
    billable_hours: u32,
    number_of_people: u32,
    room_tier: RoomTier,
    rates: &RateConfig,
) -> Amount {
    if billable_hours == 0 {
        return 0.0;
    }
    let hours = f64::from(billable_hours);
    let people = f64::from(number_of_people);

    match room_tier {
        RoomTier::Large => rates.large_hour_rate * hours * people,
        RoomTier::Small => rates.small_hour_rate * hours * people,
        RoomTier::Standard => {
            let extra_hours = f64::from(billable_hours - 1);
            (rates.first_hour_rate + extra_hours * rates.next_hour_rate) * people
        }
    }
}

/// Sum of `unit_price * quantity` over the visit's products.
pub fn products_total(visit: &Visit) -> Amount {
    visit.products.iter().map(|line| line.subtotal()).sum()
}

/// The authoritative visit total: products plus time charge.
pub fn visit_total(visit: &Visit, now: Timestamp, rates: &RateConfig) -> Amount {
    bill_visit(visit, now, rates).total
}

// ---------------------------------------------------------------------------
// Breakdown
// ---------------------------------------------------------------------------

/// Every figure a receipt or live view shows for one visit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitBill {
    pub status: VisitStatus,
    pub net_minutes: u32,
    pub billable_hours: u32,
    pub number_of_people: u32,
    pub room_tier: RoomTier,
    pub time_cost: Amount,
    pub products_total: Amount,
    pub total: Amount,
}

/// Compute the full breakdown for `visit` at `now`.
///
/// `total` is the single place products and time charge are combined;
/// [`visit_total`] returns it.
pub fn bill_visit(visit: &Visit, now: Timestamp, rates: &RateConfig) -> VisitBill {
    let net_minutes = net_minutes(visit, now);
    let billable_hours = billable_hours_for_minutes(net_minutes, rates);
    let time_cost = time_cost(
        billable_hours,
        visit.number_of_people,
        visit.room_tier,
        rates,
    );
    let products_total = products_total(visit);

    VisitBill {
        status: visit.status(),
        net_minutes,
        billable_hours,
        number_of_people: visit.number_of_people,
        room_tier: visit.room_tier,
        time_cost,
        products_total,
        total: products_total + time_cost,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
