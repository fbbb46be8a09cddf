//! Daily revenue/expense archive figures.
//!
//! Aggregates the visits that ended on a given UTC day and the expenses
//! recorded that day. All visit figures come from [`crate::billing`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::billing::bill_visit;
use crate::rates::RateConfig;
use crate::types::{Amount, Timestamp};
use crate::visit::{RoomTier, Visit};

/// An operating expense recorded against a day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub amount: Amount,
    pub description: String,
    pub spent_at: Timestamp,
}

/// Revenue attributed to one room tier.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TierRevenue {
    pub room_tier: RoomTier,
    pub visit_count: u32,
    pub revenue: Amount,
}

/// Archive figures for one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    pub day: NaiveDate,
    pub visit_count: u32,
    pub people_count: u32,
    pub time_revenue: Amount,
    pub product_revenue: Amount,
    pub total_revenue: Amount,
    pub total_expenses: Amount,
    pub net: Amount,
    /// One entry per tier, in [`RoomTier::ALL`] order.
    pub by_tier: Vec<TierRevenue>,
}

/// Summarize `day` from ended visits and recorded expenses.
///
/// Visits still open are skipped; they belong to the day they end on.
pub fn summarize_day(
    day: NaiveDate,
    visits: &[Visit],
    expenses: &[Expense],
    rates: &RateConfig,
) -> DailySummary {
    let mut by_tier: Vec<TierRevenue> = RoomTier::ALL
        .iter()
        .map(|&room_tier| TierRevenue {
            room_tier,
            visit_count: 0,
            revenue: 0.0,
        })
        .collect();

    let mut visit_count: u32 = 0;
    let mut people_count: u32 = 0;
    let mut total_revenue = 0.0;
    let mut time_revenue = 0.0;
    let mut product_revenue = 0.0;

    for visit in visits {
        let Some(end) = visit.end_time else {
            continue;
        };
        if end.date_naive() != day {
            continue;
        }

        // Ended visits ignore `now`.
        let bill = bill_visit(visit, end, rates);
        visit_count += 1;
        people_count = people_count.saturating_add(visit.number_of_people);
        total_revenue += bill.total;
        time_revenue += bill.time_cost;
        product_revenue += bill.products_total;

        if let Some(tier) = by_tier.iter_mut().find(|t| t.room_tier == visit.room_tier) {
            tier.visit_count += 1;
            tier.revenue += bill.total;
        }
    }

    let total_expenses: Amount = expenses
        .iter()
        .filter(|e| e.spent_at.date_naive() == day)
        .map(|e| e.amount)
        .sum();

    tracing::debug!(
        %day,
        visit_count,
        total_revenue,
        total_expenses,
        "Daily summary computed",
    );

    DailySummary {
        day,
        visit_count,
        people_count,
        time_revenue,
        product_revenue,
        total_revenue,
        total_expenses,
        net: total_revenue - total_expenses,
        by_tier,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    use super::*;
    use crate::billing::visit_total;
    use crate::visit::ProductLine;

    fn at(day: u32, hour: u32, minute: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2024, 3, day, hour, minute, 0).unwrap()
    }

    fn march(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn expense(amount: Amount, spent_at: Timestamp) -> Expense {
        Expense {
            amount,
            description: "supplies".to_string(),
            spent_at,
        }
    }

    #[test]
    fn empty_day_is_all_zero() {
        let summary = summarize_day(march(1), &[], &[], &RateConfig::default());
        assert_eq!(summary.visit_count, 0);
        assert_eq!(summary.total_revenue, 0.0);
        assert_eq!(summary.net, 0.0);
        assert_eq!(summary.by_tier.len(), 3);
    }

    #[test]
    fn aggregates_ended_visits_of_the_day() {
        let rates = RateConfig::default();
        let standard = Visit::new(Uuid::nil(), at(1, 9, 0))
            .with_people(2)
            .with_product(ProductLine::new("coffee", 5.0, 2))
            .with_end(at(1, 10, 20));
        let large = Visit::new(Uuid::nil(), at(1, 13, 0))
            .with_tier(RoomTier::Large)
            .with_end(at(1, 14, 0));
        let other_day = Visit::new(Uuid::nil(), at(2, 9, 0)).with_end(at(2, 12, 0));
        let still_open = Visit::new(Uuid::nil(), at(1, 15, 0));

        let visits = [standard.clone(), large.clone(), other_day, still_open];
        let expenses = [expense(20.0, at(1, 8, 0)), expense(99.0, at(2, 8, 0))];
        let summary = summarize_day(march(1), &visits, &expenses, &rates);

        assert_eq!(summary.visit_count, 2);
        assert_eq!(summary.people_count, 3);
        // standard: 2 hours, (10 + 5) * 2 = 30; large: 100
        assert_eq!(summary.time_revenue, 130.0);
        assert_eq!(summary.product_revenue, 10.0);
        assert_eq!(summary.total_revenue, 140.0);
        assert_eq!(summary.total_expenses, 20.0);
        assert_eq!(summary.net, 120.0);

        let standard_tier = &summary.by_tier[0];
        assert_eq!(standard_tier.room_tier, RoomTier::Standard);
        assert_eq!(standard_tier.visit_count, 1);
        assert_eq!(standard_tier.revenue, visit_total(&standard, at(1, 23, 0), &rates));

        let large_tier = &summary.by_tier[1];
        assert_eq!(large_tier.visit_count, 1);
        assert_eq!(large_tier.revenue, visit_total(&large, at(1, 23, 0), &rates));
    }

    #[test]
    fn total_revenue_sums_visit_totals() {
        let rates = RateConfig {
            grace_minutes: 30,
            round_up_threshold_minutes: 45,
            ..RateConfig::default()
        };
        let visits = [
            Visit::new(Uuid::nil(), at(1, 9, 0))
                .with_product(ProductLine::new("tea", 2.5, 3))
                .with_end(at(1, 10, 40)),
            Visit::new(Uuid::nil(), at(1, 11, 0))
                .with_tier(RoomTier::Small)
                .with_people(2)
                .with_end(at(1, 11, 20)),
        ];
        let summary = summarize_day(march(1), &visits, &[], &rates);

        let expected: Amount = visits.iter().map(|v| visit_total(v, at(1, 23, 0), &rates)).sum();
        assert_eq!(summary.total_revenue, expected);
        let by_tier: Amount = summary.by_tier.iter().map(|t| t.revenue).sum();
        assert_eq!(summary.total_revenue, by_tier);
    }

    #[test]
    fn people_count_saturates() {
        let mut crowded = Visit::new(Uuid::nil(), at(1, 9, 0)).with_end(at(1, 9, 5));
        crowded.number_of_people = u32::MAX;
        let visits = [crowded.clone(), crowded];
        let summary = summarize_day(march(1), &visits, &[], &RateConfig::default());
        assert_eq!(summary.visit_count, 2);
        assert_eq!(summary.people_count, u32::MAX);
    }

    #[test]
    fn visit_spanning_midnight_counts_on_end_day() {
        let late = Visit::new(Uuid::nil(), at(1, 23, 0)).with_end(at(2, 1, 0));
        let rates = RateConfig::default();
        assert_eq!(summarize_day(march(1), &[late.clone()], &[], &rates).visit_count, 0);
        assert_eq!(summarize_day(march(2), &[late], &[], &rates).visit_count, 1);
    }
}
