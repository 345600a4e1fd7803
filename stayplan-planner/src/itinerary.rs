//! The itinerary value threaded through grouping, allocation and dates.

use chrono::NaiveDate;
use serde::Serialize;
use stayplan_core::{RouteLeg, Waypoint};

use crate::allocation::{AllocationOutcome, DegenerateReason, allocate_nights};
use crate::config::PlannerConfig;
use crate::dates::compute_dates;
use crate::grouping::{Group, group_waypoints};

/// An ordered waypoint sequence and the planning results attached to it.
///
/// Each stage consumes the itinerary and returns it updated, so the stages
/// read as a pipeline:
///
/// ```
/// use chrono::NaiveDate;
/// use geo::Coord;
/// use stayplan_core::Waypoint;
/// use stayplan_planner::{Itinerary, PlannerConfig};
///
/// let stops = vec![
///     Waypoint::new(1, "Lyon", Coord { x: 4.835, y: 45.764 }).unwrap(),
///     Waypoint::new(2, "Avignon", Coord { x: 4.805, y: 43.949 }).unwrap(),
/// ];
/// let config = PlannerConfig::default();
/// let itinerary = Itinerary::new(stops)
///     .grouped(&config)
///     .allocated(4, &config)
///     .dated(NaiveDate::from_ymd_opt(2025, 6, 1));
///
/// assert_eq!(itinerary.total_nights(), 4);
/// assert_eq!(itinerary.groups().len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Itinerary {
    waypoints: Vec<Waypoint>,
    groups: Vec<Group>,
    allocation: Option<AllocationOutcome>,
}

impl Itinerary {
    /// Start planning `waypoints` in travel order.
    #[must_use]
    pub const fn new(waypoints: Vec<Waypoint>) -> Self {
        Self {
            waypoints,
            groups: Vec::new(),
            allocation: None,
        }
    }

    /// Record routed distances from per-adjacency legs.
    ///
    /// `legs[i]` covers waypoint `i` to `i + 1`. Only routed legs are kept;
    /// approximated legs leave the distance unset so grouping falls back to
    /// the great-circle distance.
    #[must_use]
    pub fn with_leg_distances(mut self, legs: &[RouteLeg]) -> Self {
        for (waypoint, leg) in self.waypoints.iter_mut().skip(1).zip(legs) {
            waypoint.distance_from_previous_m = leg.is_routed().then_some(leg.distance_m);
        }
        self
    }

    /// Group the waypoints and mark hubs and satellites.
    #[must_use]
    pub fn grouped(mut self, config: &PlannerConfig) -> Self {
        self.groups = group_waypoints(&mut self.waypoints, config);
        self.allocation = None;
        self
    }

    /// Share `target` nights between the hubs.
    #[must_use]
    pub fn allocated(mut self, target: u32, config: &PlannerConfig) -> Self {
        self.allocation = Some(allocate_nights(&mut self.waypoints, target, config));
        self
    }

    /// Fill in arrival and departure dates from `start`.
    #[must_use]
    pub fn dated(mut self, start: Option<NaiveDate>) -> Self {
        compute_dates(&mut self.waypoints, start);
        self
    }

    /// Waypoints with their planning fields.
    #[must_use]
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// Groups from the last grouping stage.
    #[must_use]
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Outcome of the last allocation stage, if it ran.
    #[must_use]
    pub const fn allocation(&self) -> Option<&AllocationOutcome> {
        self.allocation.as_ref()
    }

    /// Sum of nights across all waypoints.
    #[must_use]
    pub fn total_nights(&self) -> u32 {
        self.waypoints
            .iter()
            .fold(0_u32, |total, waypoint| total.saturating_add(waypoint.nights))
    }

    /// Give back the planned waypoints.
    #[must_use]
    pub fn into_waypoints(self) -> Vec<Waypoint> {
        self.waypoints
    }
}

/// Everything produced by a [`Planner`] run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanReport {
    /// Planned waypoints with roles, nights and dates.
    pub waypoints: Vec<Waypoint>,
    /// Hub groups in travel order.
    pub groups: Vec<Group>,
    /// How the nights were shared.
    pub allocation: AllocationOutcome,
    /// Sum of allocated nights.
    pub total_nights: u32,
}

/// Runs every planning stage with one configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Planner {
    config: PlannerConfig,
}

impl Planner {
    /// Create a planner using `config`.
    #[must_use]
    pub const fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    #[must_use]
    pub const fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Group, allocate `target` nights and date `waypoints`.
    ///
    /// `legs` holds per-adjacency routes and may be empty.
    #[must_use]
    pub fn plan(
        &self,
        waypoints: Vec<Waypoint>,
        legs: &[RouteLeg],
        target: u32,
        start: Option<NaiveDate>,
    ) -> PlanReport {
        let itinerary = Itinerary::new(waypoints)
            .with_leg_distances(legs)
            .grouped(&self.config)
            .allocated(target, &self.config)
            .dated(start);
        let total_nights = itinerary.total_nights();
        let Itinerary {
            waypoints: planned,
            groups,
            allocation,
        } = itinerary;
        PlanReport {
            waypoints: planned,
            groups,
            allocation: allocation
                .unwrap_or(AllocationOutcome::Degenerate(DegenerateReason::ZeroTarget)),
            total_nights,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Coord;
    use rstest::rstest;
    use stayplan_core::RouteSource;
    use stayplan_core::test_support::waypoint_at;

    fn leg(distance_m: f64, source: RouteSource) -> RouteLeg {
        RouteLeg::new(
            vec![Coord { x: 0.0, y: 0.0 }, Coord { x: 0.1, y: 0.0 }],
            distance_m,
            600.0,
            source,
        )
    }

    #[rstest]
    fn routed_legs_record_distances() {
        let stops = vec![
            waypoint_at(1, 0.0, 0.0),
            waypoint_at(2, 0.1, 0.0),
            waypoint_at(3, 0.2, 0.0),
        ];
        let itinerary = Itinerary::new(stops).with_leg_distances(&[
            leg(25_000.0, RouteSource::OpenRouting),
            leg(11_000.0, RouteSource::StraightLine),
        ]);

        let waypoints = itinerary.waypoints();
        assert_eq!(waypoints[0].distance_from_previous_m, None);
        assert_eq!(waypoints[1].distance_from_previous_m, Some(25_000.0));
        assert_eq!(waypoints[2].distance_from_previous_m, None);
    }

    #[rstest]
    fn winding_road_splits_close_stops() {
        let stops = vec![waypoint_at(1, 0.0, 45.0), waypoint_at(2, 0.1, 45.0)];
        let config = PlannerConfig::default();

        let straight = Itinerary::new(stops.clone()).grouped(&config);
        let winding = Itinerary::new(stops)
            .with_leg_distances(&[leg(32_000.0, RouteSource::Directions)])
            .grouped(&config);

        assert_eq!(straight.groups().len(), 1);
        assert_eq!(winding.groups().len(), 2);
    }

    #[rstest]
    fn planner_runs_every_stage() {
        let stops = vec![
            waypoint_at(1, 4.835, 45.764),
            waypoint_at(2, 4.850, 45.770),
            waypoint_at(3, 4.805, 43.949),
        ];
        let start = NaiveDate::from_ymd_opt(2025, 6, 1);
        let report = Planner::default().plan(stops, &[], 5, start);

        assert_eq!(report.total_nights, 5);
        assert_eq!(report.groups.len(), 2);
        assert!(!report.allocation.is_degenerate());
        assert_eq!(report.waypoints[0].arrival_date, start);
        assert_eq!(
            report.waypoints[2].departure_date,
            NaiveDate::from_ymd_opt(2025, 6, 6)
        );
    }

    #[rstest]
    fn regrouping_discards_stale_allocation() {
        let config = PlannerConfig::default();
        let itinerary = Itinerary::new(vec![waypoint_at(1, 0.0, 0.0)])
            .grouped(&config)
            .allocated(2, &config)
            .grouped(&config);
        assert!(itinerary.allocation().is_none());
        assert_eq!(itinerary.total_nights(), 0);
    }

    #[rstest]
    fn report_serialises_for_the_json_boundary() {
        let report = Planner::default().plan(vec![waypoint_at(1, 0.0, 0.0)], &[], 0, None);
        let json = serde_json::to_value(&report).expect("report serialises");
        assert_eq!(json["allocation"]["status"], "degenerate");
        assert_eq!(json["allocation"]["detail"], "zeroTarget");
        assert_eq!(json["totalNights"], 0);
    }
}
