//! Unit tests for night allocation.

use rstest::{fixture, rstest};
use stayplan_core::Waypoint;
use stayplan_core::test_support::waypoint_at;

use super::*;
use crate::group_waypoints;

fn rated(id: u64, lon: f64, rating: f64) -> Waypoint {
    waypoint_at(id, lon, 45.0)
        .with_rating(rating)
        .expect("rating within scale")
}

/// Planned stops roughly 40 km apart so every stop becomes its own hub.
fn spaced(ratings: &[f64]) -> Vec<Waypoint> {
    let mut stops: Vec<Waypoint> = ratings
        .iter()
        .zip(0_u32..)
        .map(|(&rating, i)| rated(u64::from(i), 0.5 * f64::from(i), rating))
        .collect();
    group_waypoints(&mut stops, &PlannerConfig::default());
    stops
}

fn nights(stops: &[Waypoint]) -> Vec<u32> {
    stops.iter().map(|stop| stop.nights).collect()
}

#[fixture]
fn config() -> PlannerConfig {
    PlannerConfig::default()
}

#[rstest]
fn hub_with_satellite_and_distant_stop(config: PlannerConfig) {
    let mut stops = vec![
        waypoint_at(1, 0.0, 0.0).with_rating(9.0).expect("valid"),
        waypoint_at(2, 0.01, 0.01).with_rating(5.0).expect("valid"),
        waypoint_at(3, 5.0, 5.0).with_rating(8.0).expect("valid"),
    ];
    group_waypoints(&mut stops, &config);

    let outcome = allocate_nights(&mut stops, 6, &config);

    assert_eq!(nights(&stops), vec![4, 0, 2]);
    assert_eq!(
        outcome,
        AllocationOutcome::Allocated(AllocationReport {
            target: 6,
            eligible_hubs: vec![0, 2],
            starved_hubs: Vec::new(),
            excluded_final_stop: None,
        })
    );
}

#[rstest]
#[case(&[5.0, 5.0, 5.0], 7, &[3, 2, 2])]
#[case(&[8.0, 5.0, 6.0], 3, &[1, 1, 1])]
#[case(&[10.0, 0.0, 6.0], 12, &[7, 1, 4])]
fn nights_sum_to_target(
    config: PlannerConfig,
    #[case] ratings: &[f64],
    #[case] target: u32,
    #[case] expected: &[u32],
) {
    let mut stops = spaced(ratings);
    let outcome = allocate_nights(&mut stops, target, &config);
    assert!(!outcome.is_degenerate());
    assert_eq!(nights(&stops), expected);
    assert_eq!(nights(&stops).iter().sum::<u32>(), target);
}

#[rstest]
fn zero_target_is_degenerate(config: PlannerConfig) {
    let mut stops = spaced(&[7.0, 7.0]);
    let outcome = allocate_nights(&mut stops, 0, &config);
    assert_eq!(
        outcome,
        AllocationOutcome::Degenerate(DegenerateReason::ZeroTarget)
    );
    assert_eq!(nights(&stops), vec![0, 0]);
}

#[rstest]
fn ungrouped_stops_are_degenerate(config: PlannerConfig) {
    let mut stops = vec![rated(1, 0.0, 7.0), rated(2, 1.0, 7.0)];
    let outcome = allocate_nights(&mut stops, 4, &config);
    assert_eq!(
        outcome,
        AllocationOutcome::Degenerate(DegenerateReason::NoEligibleHubs)
    );
}

#[rstest]
fn low_rated_final_stop_gets_no_nights(config: PlannerConfig) {
    let mut stops = spaced(&[7.0, 6.0, 3.0]);
    let outcome = allocate_nights(&mut stops, 4, &config);

    assert_eq!(stops[2].nights, 0);
    assert_eq!(stops[0].nights + stops[1].nights, 4);
    let AllocationOutcome::Allocated(report) = outcome else {
        panic!("expected an allocation");
    };
    assert_eq!(report.excluded_final_stop, Some(2));
}

#[rstest]
fn stay_hint_keeps_low_rated_final_stop(config: PlannerConfig) {
    let mut stops = spaced(&[7.0, 3.0]);
    stops[1].suggested_days = Some(2);
    allocate_nights(&mut stops, 4, &config);
    assert!(stops[1].nights >= 1);
}

#[rstest]
fn unrated_final_stop_is_eligible(config: PlannerConfig) {
    let mut stops = spaced(&[7.0]);
    stops.push(waypoint_at(9, 1.0, 45.0));
    group_waypoints(&mut stops, &config);
    allocate_nights(&mut stops, 3, &config);
    assert!(stops[1].nights >= 1);
}

#[rstest]
fn fewer_nights_than_hubs_starves_lightest(config: PlannerConfig) {
    let mut stops = spaced(&[9.0, 4.0, 8.0, 6.0]);
    let outcome = allocate_nights(&mut stops, 2, &config);

    assert_eq!(nights(&stops), vec![1, 0, 1, 0]);
    assert_eq!(outcome.starved_hubs(), &[1, 3]);
}

#[rstest]
fn floor_overshoot_is_trimmed_from_light_hubs() {
    let config = PlannerConfig::default().with_min_nights_per_hub(2);
    let mut stops = spaced(&[10.0, 0.0, 5.0]);
    let outcome = allocate_nights(&mut stops, 7, &config);

    assert_eq!(nights(&stops).iter().sum::<u32>(), 7);
    assert!(stops.iter().all(|stop| stop.nights >= 2));
    assert!(outcome.starved_hubs().is_empty());
}

#[rstest]
fn allocation_is_idempotent(config: PlannerConfig) {
    let mut stops = spaced(&[9.0, 6.0, 7.5, 5.0]);
    allocate_nights(&mut stops, 11, &config);
    let first = nights(&stops);
    allocate_nights(&mut stops, 11, &config);
    assert_eq!(nights(&stops), first);
}

#[rstest]
fn zero_weights_share_evenly() {
    let weights = stayplan_scorer::HubScoreWeights {
        rating: 0.0,
        suggested_days: 0.0,
        centrality: 0.0,
        poi: 0.0,
        ..stayplan_scorer::HubScoreWeights::default()
    };
    let config = PlannerConfig::default().with_weights(weights);
    let mut stops = spaced(&[9.0, 6.0]);
    allocate_nights(&mut stops, 4, &config);
    assert_eq!(nights(&stops), vec![2, 2]);
}

#[rstest]
fn degenerate_reason_reads_naturally() {
    assert_eq!(
        DegenerateReason::NoEligibleHubs.to_string(),
        "no hub is eligible for nights"
    );
}
