//! Night allocation across hubs.
//!
//! Nights are shared in proportion to each hub's stay weight: every eligible
//! hub first receives `floor(target * weight / total)`, raised to the
//! configured per-hub floor, and any remainder is handed out one night at a
//! time from the heaviest hub down. When the floor pushes the total above
//! the target, nights are trimmed from the lightest hubs until the sum
//! matches again.

use std::fmt;

use log::{debug, warn};
use serde::Serialize;
use stayplan_core::Waypoint;
use stayplan_scorer::stay_weight;

use crate::config::PlannerConfig;

/// Why an allocation handed out no nights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DegenerateReason {
    /// The requested night count was zero.
    ZeroTarget,
    /// No waypoint qualified as a hub eligible for nights.
    NoEligibleHubs,
}

impl fmt::Display for DegenerateReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroTarget => f.write_str("no nights were requested"),
            Self::NoEligibleHubs => f.write_str("no hub is eligible for nights"),
        }
    }
}

/// Details of a successful allocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationReport {
    /// Requested night count; the allocated nights sum to it exactly.
    pub target: u32,
    /// Hubs that took part, in itinerary order.
    pub eligible_hubs: Vec<usize>,
    /// Eligible hubs left with zero nights because the target was smaller
    /// than the per-hub floor allows.
    pub starved_hubs: Vec<usize>,
    /// Final hub excluded for a low rating and no stay hint.
    pub excluded_final_stop: Option<usize>,
}

/// Result of [`allocate_nights`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "camelCase")]
pub enum AllocationOutcome {
    /// Nights were shared between the eligible hubs.
    Allocated(AllocationReport),
    /// Every waypoint was left with zero nights.
    Degenerate(DegenerateReason),
}

impl AllocationOutcome {
    /// Whether no nights were handed out.
    #[must_use]
    pub const fn is_degenerate(&self) -> bool {
        matches!(self, Self::Degenerate(_))
    }

    /// Eligible hubs that ended with zero nights.
    #[must_use]
    pub fn starved_hubs(&self) -> &[usize] {
        match self {
            Self::Allocated(report) => &report.starved_hubs,
            Self::Degenerate(_) => &[],
        }
    }
}

#[derive(Debug)]
struct Slot {
    index: usize,
    weight: f64,
    nights: u32,
}

/// Distribute `target` nights across the hubs of `waypoints`.
///
/// Waypoints must already carry roles from
/// [`group_waypoints`](crate::group_waypoints). Every waypoint's `nights` is
/// rewritten: satellites, unassigned stops, and an ineligible final hub get
/// zero. A final hub is eligible when its rating (missing ratings use the
/// scoring default) reaches `final_stop_min_rating` or its stay hint is at
/// least one day.
///
/// A zero target or an itinerary without eligible hubs is not an error: all
/// nights are zero and the outcome is [`AllocationOutcome::Degenerate`].
/// Otherwise the nights sum to `target` exactly. Calling the function twice
/// with the same inputs yields the same nights.
///
/// # Examples
///
/// ```
/// use geo::Coord;
/// use stayplan_core::Waypoint;
/// use stayplan_planner::{PlannerConfig, allocate_nights, group_waypoints};
///
/// let mut stops = vec![
///     Waypoint::new(1, "Lyon", Coord { x: 4.835, y: 45.764 }).unwrap(),
///     Waypoint::new(2, "Avignon", Coord { x: 4.805, y: 43.949 }).unwrap(),
/// ];
/// let config = PlannerConfig::default();
/// group_waypoints(&mut stops, &config);
///
/// let outcome = allocate_nights(&mut stops, 5, &config);
/// assert!(!outcome.is_degenerate());
/// assert_eq!(stops[0].nights + stops[1].nights, 5);
/// ```
pub fn allocate_nights(
    waypoints: &mut [Waypoint],
    target: u32,
    config: &PlannerConfig,
) -> AllocationOutcome {
    for waypoint in waypoints.iter_mut() {
        waypoint.nights = 0;
    }

    let excluded_final_stop = excluded_final_stop(waypoints, config);
    let mut slots: Vec<Slot> = waypoints
        .iter()
        .enumerate()
        .filter(|(index, waypoint)| waypoint.is_hub() && Some(*index) != excluded_final_stop)
        .map(|(index, waypoint)| Slot {
            index,
            weight: stay_weight(waypoint, &config.weights),
            nights: 0,
        })
        .collect();

    if target == 0 {
        warn!("night allocation skipped: {}", DegenerateReason::ZeroTarget);
        return AllocationOutcome::Degenerate(DegenerateReason::ZeroTarget);
    }
    if slots.is_empty() {
        warn!(
            "night allocation skipped: {}",
            DegenerateReason::NoEligibleHubs
        );
        return AllocationOutcome::Degenerate(DegenerateReason::NoEligibleHubs);
    }

    slots.sort_by(|a, b| b.weight.total_cmp(&a.weight).then(a.index.cmp(&b.index)));
    assign_shares(&mut slots, target, config.min_nights_per_hub);
    let assigned: u32 = slots.iter().map(|slot| slot.nights).sum();
    let starved_hubs = if assigned > target {
        trim_overshoot(&mut slots, assigned - target, config.min_nights_per_hub)
    } else {
        distribute_remainder(&mut slots, target - assigned);
        Vec::new()
    };

    for slot in &slots {
        if let Some(waypoint) = waypoints.get_mut(slot.index) {
            waypoint.nights = slot.nights;
        }
    }

    let mut eligible_hubs: Vec<usize> = slots.iter().map(|slot| slot.index).collect();
    eligible_hubs.sort_unstable();
    debug!(
        "allocated {target} nights across hubs {eligible_hubs:?} (starved: {starved_hubs:?})"
    );
    AllocationOutcome::Allocated(AllocationReport {
        target,
        eligible_hubs,
        starved_hubs,
        excluded_final_stop,
    })
}

fn excluded_final_stop(waypoints: &[Waypoint], config: &PlannerConfig) -> Option<usize> {
    let index = waypoints.len().checked_sub(1)?;
    let last = waypoints.get(index)?;
    if !last.is_hub() || waypoints.len() == 1 {
        return None;
    }
    let rating = last.rating.unwrap_or(config.weights.default_rating);
    let hinted = last.suggested_days.is_some_and(|days| days >= 1);
    if rating >= config.final_stop_min_rating || hinted {
        None
    } else {
        debug!(
            "final hub {} excluded from allocation (rating {rating})",
            last.id
        );
        Some(index)
    }
}

#[expect(
    clippy::float_arithmetic,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    reason = "proportional shares are floored ratios bounded by the target"
)]
fn assign_shares(slots: &mut [Slot], target: u32, floor: u32) {
    let total: f64 = slots.iter().map(|slot| slot.weight).sum();
    let even = total <= 0.0 || !total.is_finite();
    let count = slots.len() as f64;
    for slot in slots.iter_mut() {
        let ratio = if even { 1.0 / count } else { slot.weight / total };
        let share = (f64::from(target) * ratio).floor().clamp(0.0, f64::from(target)) as u32;
        slot.nights = share.max(floor);
    }
}

/// Hand out `remaining` nights from the heaviest slot down, cycling.
fn distribute_remainder(slots: &mut [Slot], mut remaining: u32) {
    while remaining > 0 && !slots.is_empty() {
        for slot in slots.iter_mut() {
            if remaining == 0 {
                break;
            }
            slot.nights += 1;
            remaining -= 1;
        }
    }
}

/// Remove `excess` nights, lightest slots first; returns starved hubs.
fn trim_overshoot(slots: &mut [Slot], mut excess: u32, floor: u32) -> Vec<usize> {
    while excess > 0 {
        let mut trimmed = false;
        for slot in slots.iter_mut().rev() {
            if excess == 0 {
                break;
            }
            if slot.nights > floor {
                slot.nights -= 1;
                excess -= 1;
                trimmed = true;
            }
        }
        if !trimmed {
            break;
        }
    }

    let mut starved = Vec::new();
    for slot in slots.iter_mut().rev() {
        if excess == 0 {
            break;
        }
        let taken = slot.nights.min(excess);
        slot.nights -= taken;
        excess -= taken;
        if slot.nights == 0 {
            starved.push(slot.index);
        }
    }
    if !starved.is_empty() {
        warn!("hubs {starved:?} received no nights: target below the per-hub minimum");
    }
    starved.sort_unstable();
    starved
}

#[cfg(test)]
mod tests;
