//! Night estimates for imported itineraries.

use stayplan_core::Waypoint;

/// Nights suggested by an expected visit time in minutes.
///
/// Under four hours is a pass-through, under eight hours warrants one night
/// and under fourteen hours two; longer visits get one night per seven hours,
/// rounded up.
///
/// # Examples
///
/// ```
/// use stayplan_planner::nights_for_visit_minutes;
///
/// assert_eq!(nights_for_visit_minutes(90), 0);
/// assert_eq!(nights_for_visit_minutes(300), 1);
/// assert_eq!(nights_for_visit_minutes(1000), 3);
/// ```
#[must_use]
pub const fn nights_for_visit_minutes(minutes: u32) -> u32 {
    match minutes {
        0..240 => 0,
        240..480 => 1,
        480..840 => 2,
        _ => minutes.div_ceil(420),
    }
}

/// Collapse consecutive waypoints sharing a place onto the first of the run.
///
/// Day-by-day itineraries list one entry per night, so a run of `n` entries
/// with the same `place_id` becomes `n` nights on its first entry and zero
/// on the rest. Waypoints without a place id count as a run of one.
pub fn group_nights_by_place(waypoints: &mut [Waypoint]) {
    let mut run_start: Option<usize> = None;
    let mut run_place: Option<String> = None;

    for index in 0..waypoints.len() {
        let Some(place) = waypoints.get(index).map(|w| w.place_id.clone()) else {
            continue;
        };
        let continues = place.is_some() && place == run_place;
        if continues {
            if let Some(first) = run_start.and_then(|start| waypoints.get_mut(start)) {
                first.nights = first.nights.saturating_add(1);
            }
            if let Some(waypoint) = waypoints.get_mut(index) {
                waypoint.nights = 0;
            }
        } else {
            if let Some(waypoint) = waypoints.get_mut(index) {
                waypoint.nights = 1;
            }
            run_start = Some(index);
            run_place = place;
        }
    }
}
