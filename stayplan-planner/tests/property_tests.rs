//! Property-based tests for the planner.
//!
//! # Invariants tested
//!
//! - **Coverage:** every waypoint belongs to exactly one group, in order.
//! - **Group bounds:** no group exceeds the maximum size; members are
//!   contiguous and the hub is a member.
//! - **Satellites:** satellites never receive nights.
//! - **Exact sum:** a non-degenerate allocation sums to the target.
//! - **Date continuity:** each arrival equals the previous departure.


use chrono::NaiveDate;
use proptest::prelude::*;
use stayplan_planner::{
    AllocationOutcome, Planner, PlannerConfig, allocate_nights, group_waypoints,
};

use proptest_support::itinerary_strategy;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Groups partition the sequence into bounded contiguous runs.
    #[test]
    fn groups_are_contiguous_and_bounded(
        mut stops in itinerary_strategy(0, 30),
        threshold in 5.0_f64..80.0,
        max_size in 1_usize..6,
    ) {
        let config = PlannerConfig::default()
            .with_distance_threshold_km(threshold)
            .with_max_group_size(max_size);
        let groups = group_waypoints(&mut stops, &config);

        let flattened: Vec<usize> = groups.iter().flat_map(|g| g.members.clone()).collect();
        prop_assert_eq!(flattened, (0..stops.len()).collect::<Vec<_>>());
        for group in &groups {
            prop_assert!(!group.is_empty());
            prop_assert!(group.len() <= max_size);
            prop_assert!(group.contains(group.hub));
            prop_assert!(group.members.windows(2).all(|w| w[1] == w[0] + 1));
        }
    }

    /// Satellites carry no nights after grouping and after allocation.
    #[test]
    fn satellites_never_sleep(
        mut stops in itinerary_strategy(1, 25),
        target in 0_u32..40,
    ) {
        let config = PlannerConfig::default();
        group_waypoints(&mut stops, &config);
        prop_assert!(stops.iter().filter(|s| s.is_satellite()).all(|s| s.nights == 0));

        allocate_nights(&mut stops, target, &config);
        prop_assert!(stops.iter().filter(|s| s.is_satellite()).all(|s| s.nights == 0));
    }

    /// Allocations hit the target exactly or report a degenerate outcome.
    #[test]
    fn nights_sum_to_target_or_degenerate(
        stops in itinerary_strategy(1, 25),
        target in 0_u32..60,
    ) {
        let report = Planner::default().plan(stops, &[], target, None);
        if report.allocation.is_degenerate() {
            prop_assert_eq!(report.total_nights, 0);
        } else {
            prop_assert_eq!(report.total_nights, target);
        }
    }

    /// With enough nights every eligible hub gets at least one.
    #[test]
    fn eligible_hubs_get_a_night_when_affordable(
        stops in itinerary_strategy(1, 20),
        extra in 0_u32..20,
    ) {
        let target = u32::try_from(stops.len()).expect("small itinerary") + extra;
        let report = Planner::default().plan(stops, &[], target, None);
        if let AllocationOutcome::Allocated(allocation) = &report.allocation {
            prop_assert!(allocation.starved_hubs.is_empty());
            for &hub in &allocation.eligible_hubs {
                prop_assert!(report.waypoints[hub].nights >= 1);
            }
        }
    }

    /// Dates chain without gaps or overlaps.
    #[test]
    fn dates_are_continuous(
        stops in itinerary_strategy(1, 25),
        target in 0_u32..60,
        day_offset in 0_u64..3_000,
    ) {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|d| d.checked_add_days(chrono::Days::new(day_offset)));
        let report = Planner::default().plan(stops, &[], target, start);

        prop_assert_eq!(report.waypoints.first().and_then(|s| s.arrival_date), start);
        for pair in report.waypoints.windows(2) {
            prop_assert_eq!(pair[1].arrival_date, pair[0].departure_date);
        }
        for stop in &report.waypoints {
            prop_assert!(stop.arrival_date.is_some() && stop.departure_date.is_some());
            if let (Some(arrival), Some(departure)) = (stop.arrival_date, stop.departure_date) {
                prop_assert_eq!((departure - arrival).num_days(), i64::from(stop.nights));
            }
        }
    }
}
