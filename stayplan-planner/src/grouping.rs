//! Hub grouping: contiguous clusters of nearby waypoints sharing one base.

use log::debug;
use serde::Serialize;
use stayplan_core::geometry::haversine_km;
use stayplan_core::{StopRole, Waypoint};
use stayplan_scorer::{HubScoreWeights, score_hub};

use crate::config::PlannerConfig;

/// A run of consecutive waypoints served by one hub.
///
/// `members` are indices into the planned waypoint slice in ascending order;
/// `hub` is always one of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    /// Indices of the member waypoints.
    pub members: Vec<usize>,
    /// Index of the member hosting the lodging base.
    pub hub: usize,
}

impl Group {
    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the group has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Whether `index` belongs to this group.
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.members.contains(&index)
    }

    /// Members other than the hub.
    pub fn satellites(&self) -> impl Iterator<Item = usize> + '_ {
        self.members.iter().copied().filter(|&index| index != self.hub)
    }
}

/// A scored hub candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HubCandidate {
    /// Index of the candidate waypoint.
    pub index: usize,
    /// Hub score at its position in the group.
    pub score: f64,
}

/// Distance in kilometres from `previous` to `current`.
///
/// Uses the routed distance recorded on `current` when it is positive and
/// falls back to the great-circle distance otherwise.
#[expect(clippy::float_arithmetic, reason = "metre to kilometre conversion")]
#[must_use]
pub fn adjacency_km(previous: &Waypoint, current: &Waypoint) -> f64 {
    match current.distance_from_previous_m {
        Some(metres) if metres.is_finite() && metres > 0.0 => metres / 1000.0,
        _ => haversine_km(previous.location, current.location),
    }
}

/// Partition `waypoints` into groups and mark hubs and satellites.
///
/// Walking the sequence in order, a waypoint joins the current group unless
/// it lies more than `distance_threshold_km` from its predecessor or the
/// group already holds `max_group_size` members. Each group's hub is the
/// member with the highest [`score_hub`]; ties go to the earliest member.
///
/// Every planning field on the waypoints is reset first, so the call is
/// repeatable. Hubs get [`StopRole::Hub`], the other members
/// [`StopRole::Satellite`], and all members record the hub index.
///
/// # Examples
///
/// ```
/// use geo::Coord;
/// use stayplan_core::Waypoint;
/// use stayplan_planner::{PlannerConfig, group_waypoints};
///
/// let mut stops = vec![
///     Waypoint::new(1, "Annecy", Coord { x: 6.129, y: 45.899 }).unwrap(),
///     Waypoint::new(2, "Talloires", Coord { x: 6.213, y: 45.840 }).unwrap(),
///     Waypoint::new(3, "Lyon", Coord { x: 4.835, y: 45.764 }).unwrap(),
/// ];
/// let groups = group_waypoints(&mut stops, &PlannerConfig::default());
///
/// assert_eq!(groups.len(), 2);
/// assert_eq!(groups[0].members, vec![0, 1]);
/// assert!(stops[2].is_hub());
/// ```
pub fn group_waypoints(waypoints: &mut [Waypoint], config: &PlannerConfig) -> Vec<Group> {
    waypoints.iter_mut().for_each(Waypoint::reset_plan);

    let groups: Vec<Group> = split_runs(waypoints, config)
        .into_iter()
        .filter_map(|members| {
            let hub = select_hub(waypoints, &members, &config.weights)?;
            debug!(
                "group {members:?} hosted by waypoint {} (score {:.2})",
                hub.index, hub.score
            );
            Some(Group {
                members,
                hub: hub.index,
            })
        })
        .collect();

    for group in &groups {
        mark_roles(waypoints, group);
    }
    groups
}

fn split_runs(waypoints: &[Waypoint], config: &PlannerConfig) -> Vec<Vec<usize>> {
    let max_size = config.max_group_size.max(1);
    let mut runs = Vec::new();
    let mut current: Vec<usize> = Vec::with_capacity(max_size);
    let mut previous: Option<&Waypoint> = None;

    for (index, waypoint) in waypoints.iter().enumerate() {
        if let Some(before) = previous {
            let km = adjacency_km(before, waypoint);
            let too_far = km > config.distance_threshold_km;
            if too_far || current.len() >= max_size {
                debug!(
                    "closing group before waypoint {} ({km:.1} km, {} members)",
                    waypoint.id,
                    current.len()
                );
                runs.push(std::mem::take(&mut current));
            }
        }
        current.push(index);
        previous = Some(waypoint);
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

fn select_hub(
    waypoints: &[Waypoint],
    members: &[usize],
    weights: &HubScoreWeights,
) -> Option<HubCandidate> {
    let size = members.len();
    members
        .iter()
        .enumerate()
        .filter_map(|(position, &index)| {
            waypoints.get(index).map(|waypoint| HubCandidate {
                index,
                score: score_hub(waypoint, size, position, weights),
            })
        })
        .fold(None, |best, candidate| match best {
            Some(current) if current.score >= candidate.score => Some(current),
            _ => Some(candidate),
        })
}

fn mark_roles(waypoints: &mut [Waypoint], group: &Group) {
    for &index in &group.members {
        if let Some(waypoint) = waypoints.get_mut(index) {
            waypoint.role = if index == group.hub {
                StopRole::Hub
            } else {
                StopRole::Satellite
            };
            waypoint.hub_index = Some(group.hub);
            waypoint.nights = 0;
        }
    }
}
