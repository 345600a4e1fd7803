//! Arrival and departure dates from per-waypoint nights.

use chrono::{Days, NaiveDate};
use log::warn;
use stayplan_core::Waypoint;

/// Write arrival and departure dates onto `waypoints`.
///
/// The first waypoint arrives on `start`; each departure is its arrival plus
/// its nights, and the next waypoint arrives on that day. Without a start
/// date every date is cleared. If a date would pass [`NaiveDate::MAX`], the
/// offending waypoint and all later ones are left without dates.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use geo::Coord;
/// use stayplan_core::Waypoint;
/// use stayplan_planner::compute_dates;
///
/// let mut stops = vec![
///     Waypoint::new(1, "Lyon", Coord { x: 4.835, y: 45.764 }).unwrap(),
///     Waypoint::new(2, "Avignon", Coord { x: 4.805, y: 43.949 }).unwrap(),
/// ];
/// stops[0].nights = 2;
/// let start = NaiveDate::from_ymd_opt(2025, 6, 1);
/// compute_dates(&mut stops, start);
///
/// assert_eq!(stops[1].arrival_date, NaiveDate::from_ymd_opt(2025, 6, 3));
/// ```
pub fn compute_dates(waypoints: &mut [Waypoint], start: Option<NaiveDate>) {
    let mut cursor = start;
    for waypoint in waypoints.iter_mut() {
        let departure =
            cursor.and_then(|arrival| arrival.checked_add_days(Days::new(waypoint.nights.into())));
        if cursor.is_some() && departure.is_none() {
            warn!(
                "dates stop at waypoint {}: {} nights pass the last representable date",
                waypoint.id, waypoint.nights
            );
        }
        waypoint.arrival_date = departure.and(cursor);
        waypoint.departure_date = departure;
        cursor = departure;
    }
}
