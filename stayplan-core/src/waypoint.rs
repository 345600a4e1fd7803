//! Itinerary waypoints.
//!
//! A [`Waypoint`] carries the catalogue data supplied by the caller (name,
//! location, rating, stay hints) plus the fields the planning stages write:
//! night count, hub/satellite role, owning hub and calendar dates.

use chrono::NaiveDate;
use geo::Coord;
use thiserror::Error;

/// Role assigned to a waypoint by the grouping engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum StopRole {
    /// Not yet grouped.
    #[default]
    Unassigned,
    /// Hosts the lodging base for its group.
    Hub,
    /// Visited as a day trip from its group's hub.
    Satellite,
}

/// Errors returned when constructing a [`Waypoint`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WaypointError {
    /// Latitude was outside `[-90, 90]` or not finite.
    #[error("latitude {0} is outside [-90, 90]")]
    InvalidLatitude(f64),
    /// Longitude was outside `[-180, 180]` or not finite.
    #[error("longitude {0} is outside [-180, 180]")]
    InvalidLongitude(f64),
    /// Rating was outside `[0, 10]` or not finite.
    #[error("rating {0} is outside [0, 10]")]
    InvalidRating(f64),
}

/// A stop on an itinerary.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use stayplan_core::{StopRole, Waypoint};
///
/// # fn main() -> Result<(), stayplan_core::WaypointError> {
/// let stop = Waypoint::new(1, "Annecy", Coord { x: 6.13, y: 45.90 })?
///     .with_rating(8.5)?
///     .with_suggested_days(2);
/// assert_eq!(stop.role, StopRole::Unassigned);
/// assert_eq!(stop.nights, 0);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "record::WaypointRecord", into = "record::WaypointRecord")
)]
pub struct Waypoint {
    /// Caller-assigned identifier.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Position with `x = longitude`, `y = latitude`.
    pub location: Coord<f64>,
    /// Quality rating in `[0, 10]`, when known.
    pub rating: Option<f64>,
    /// Suggested length of stay in days, when known.
    pub suggested_days: Option<u32>,
    /// Estimated visit time in minutes, when known.
    pub visit_minutes: Option<u32>,
    /// Number of visits and activities attached to the stop.
    pub poi_count: u32,
    /// Catalogue place identifier shared by repeated days at one place.
    pub place_id: Option<String>,
    /// Routed distance in metres from the previous waypoint, when known.
    pub distance_from_previous_m: Option<f64>,
    /// Nights spent at this waypoint.
    pub nights: u32,
    /// Role assigned by grouping.
    pub role: StopRole,
    /// Index of the hub this waypoint belongs to (itself for hubs).
    pub hub_index: Option<usize>,
    /// Arrival date, when a start date is known.
    pub arrival_date: Option<NaiveDate>,
    /// Departure date, when a start date is known.
    pub departure_date: Option<NaiveDate>,
}

impl Waypoint {
    /// Validate coordinates and construct an unplanned waypoint.
    ///
    /// # Errors
    /// Returns [`WaypointError`] when latitude or longitude are out of range.
    pub fn new(
        id: u64,
        name: impl Into<String>,
        location: Coord<f64>,
    ) -> Result<Self, WaypointError> {
        if !location.y.is_finite() || !(-90.0..=90.0).contains(&location.y) {
            return Err(WaypointError::InvalidLatitude(location.y));
        }
        if !location.x.is_finite() || !(-180.0..=180.0).contains(&location.x) {
            return Err(WaypointError::InvalidLongitude(location.x));
        }
        Ok(Self {
            id,
            name: name.into(),
            location,
            rating: None,
            suggested_days: None,
            visit_minutes: None,
            poi_count: 0,
            place_id: None,
            distance_from_previous_m: None,
            nights: 0,
            role: StopRole::Unassigned,
            hub_index: None,
            arrival_date: None,
            departure_date: None,
        })
    }

    /// Set the quality rating.
    ///
    /// # Errors
    /// Returns [`WaypointError::InvalidRating`] outside `[0, 10]`.
    pub fn with_rating(mut self, rating: f64) -> Result<Self, WaypointError> {
        if !rating.is_finite() || !(0.0..=10.0).contains(&rating) {
            return Err(WaypointError::InvalidRating(rating));
        }
        self.rating = Some(rating);
        Ok(self)
    }

    /// Set the suggested stay length in days.
    #[must_use]
    pub fn with_suggested_days(mut self, days: u32) -> Self {
        self.suggested_days = Some(days);
        self
    }

    /// Set the number of attached visits and activities.
    #[must_use]
    pub fn with_poi_count(mut self, count: u32) -> Self {
        self.poi_count = count;
        self
    }

    /// Set the catalogue place identifier.
    #[must_use]
    pub fn with_place_id(mut self, place_id: impl Into<String>) -> Self {
        self.place_id = Some(place_id.into());
        self
    }

    /// Latitude in degrees.
    #[must_use]
    pub const fn lat(&self) -> f64 {
        self.location.y
    }

    /// Longitude in degrees.
    #[must_use]
    pub const fn lon(&self) -> f64 {
        self.location.x
    }

    /// Report whether grouping selected this waypoint as a hub.
    #[must_use]
    pub fn is_hub(&self) -> bool {
        self.role == StopRole::Hub
    }

    /// Report whether grouping made this waypoint a satellite.
    #[must_use]
    pub fn is_satellite(&self) -> bool {
        self.role == StopRole::Satellite
    }

    /// Clear every field written by the planning stages.
    pub fn reset_plan(&mut self) {
        self.nights = 0;
        self.role = StopRole::Unassigned;
        self.hub_index = None;
        self.arrival_date = None;
        self.departure_date = None;
    }
}

#[cfg(feature = "serde")]
mod record {
    //! JSON boundary shape: flat `lat`/`lon` fields, camelCase names.

    use chrono::NaiveDate;
    use geo::Coord;
    use serde::{Deserialize, Serialize};

    use super::{StopRole, Waypoint, WaypointError};

    #[derive(Debug, Clone, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub(super) struct WaypointRecord {
        #[serde(default)]
        id: u64,
        #[serde(default)]
        name: String,
        lat: f64,
        lon: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rating: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        suggested_days: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        visit_minutes: Option<u32>,
        #[serde(default)]
        poi_count: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        place_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        distance_from_previous_m: Option<f64>,
        #[serde(default)]
        nights: u32,
        #[serde(default)]
        role: StopRole,
        #[serde(default)]
        is_hub: bool,
        #[serde(default)]
        is_satellite: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        hub_index: Option<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        arrival_date: Option<NaiveDate>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        departure_date: Option<NaiveDate>,
    }

    impl TryFrom<WaypointRecord> for Waypoint {
        type Error = WaypointError;

        fn try_from(record: WaypointRecord) -> Result<Self, Self::Error> {
            let mut waypoint = Self::new(
                record.id,
                record.name,
                Coord {
                    x: record.lon,
                    y: record.lat,
                },
            )?;
            if let Some(rating) = record.rating {
                waypoint = waypoint.with_rating(rating)?;
            }
            waypoint.suggested_days = record.suggested_days;
            waypoint.visit_minutes = record.visit_minutes;
            waypoint.poi_count = record.poi_count;
            waypoint.place_id = record.place_id;
            waypoint.distance_from_previous_m = record.distance_from_previous_m;
            waypoint.nights = record.nights;
            waypoint.role = match record.role {
                StopRole::Unassigned if record.is_hub => StopRole::Hub,
                StopRole::Unassigned if record.is_satellite => StopRole::Satellite,
                role => role,
            };
            waypoint.hub_index = record.hub_index;
            waypoint.arrival_date = record.arrival_date;
            waypoint.departure_date = record.departure_date;
            Ok(waypoint)
        }
    }

    impl From<Waypoint> for WaypointRecord {
        fn from(waypoint: Waypoint) -> Self {
            Self {
                id: waypoint.id,
                name: waypoint.name,
                lat: waypoint.location.y,
                lon: waypoint.location.x,
                rating: waypoint.rating,
                suggested_days: waypoint.suggested_days,
                visit_minutes: waypoint.visit_minutes,
                poi_count: waypoint.poi_count,
                place_id: waypoint.place_id,
                distance_from_previous_m: waypoint.distance_from_previous_m,
                nights: waypoint.nights,
                role: waypoint.role,
                is_hub: waypoint.role == StopRole::Hub,
                is_satellite: waypoint.role == StopRole::Satellite,
                hub_index: waypoint.hub_index,
                arrival_date: waypoint.arrival_date,
                departure_date: waypoint.departure_date,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn annecy() -> Waypoint {
        Waypoint::new(7, "Annecy", Coord { x: 6.13, y: 45.90 }).expect("valid waypoint")
    }

    #[rstest]
    #[case(91.0, 0.0)]
    #[case(-90.5, 0.0)]
    #[case(f64::NAN, 0.0)]
    fn rejects_out_of_range_latitude(#[case] lat: f64, #[case] lon: f64) {
        let err = Waypoint::new(1, "x", Coord { x: lon, y: lat }).expect_err("latitude invalid");
        assert!(matches!(err, WaypointError::InvalidLatitude(_)));
    }

    #[rstest]
    #[case(180.5)]
    #[case(f64::INFINITY)]
    fn rejects_out_of_range_longitude(#[case] lon: f64) {
        let err = Waypoint::new(1, "x", Coord { x: lon, y: 0.0 }).expect_err("longitude invalid");
        assert!(matches!(err, WaypointError::InvalidLongitude(_)));
    }

    #[rstest]
    #[case(0.0)]
    #[case(10.0)]
    fn accepts_boundary_ratings(annecy: Waypoint, #[case] rating: f64) {
        assert!(annecy.with_rating(rating).is_ok());
    }

    #[rstest]
    #[case(-0.1)]
    #[case(10.5)]
    fn rejects_out_of_range_rating(annecy: Waypoint, #[case] rating: f64) {
        assert_eq!(
            annecy.with_rating(rating),
            Err(WaypointError::InvalidRating(rating))
        );
    }

    #[rstest]
    fn reset_plan_clears_engine_fields(mut annecy: Waypoint) {
        annecy.nights = 3;
        annecy.role = StopRole::Satellite;
        annecy.hub_index = Some(2);
        annecy.arrival_date = NaiveDate::from_ymd_opt(2025, 6, 1);
        annecy.reset_plan();
        assert_eq!(annecy.nights, 0);
        assert_eq!(annecy.role, StopRole::Unassigned);
        assert!(annecy.hub_index.is_none());
        assert!(annecy.arrival_date.is_none());
    }

    #[cfg(feature = "serde")]
    #[rstest]
    fn deserialises_flat_lat_lon_input() {
        let json = r#"{"id": 3, "name": "Lyon", "lat": 45.76, "lon": 4.84, "rating": 8, "suggestedDays": 2}"#;
        let waypoint: Waypoint = serde_json::from_str(json).expect("waypoint parses");
        assert_eq!(waypoint.location, Coord { x: 4.84, y: 45.76 });
        assert_eq!(waypoint.rating, Some(8.0));
        assert_eq!(waypoint.suggested_days, Some(2));
        assert_eq!(waypoint.role, StopRole::Unassigned);
    }

    #[cfg(feature = "serde")]
    #[rstest]
    fn deserialisation_validates_coordinates() {
        let json = r#"{"lat": 120.0, "lon": 4.84}"#;
        let result: Result<Waypoint, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[cfg(feature = "serde")]
    #[rstest]
    fn serialises_plan_fields(mut annecy: Waypoint) {
        annecy.role = StopRole::Hub;
        annecy.hub_index = Some(0);
        annecy.nights = 2;
        annecy.arrival_date = NaiveDate::from_ymd_opt(2025, 6, 1);
        let json = serde_json::to_value(&annecy).expect("waypoint serialises");
        assert_eq!(json["role"], "hub");
        assert_eq!(json["isHub"], true);
        assert_eq!(json["isSatellite"], false);
        assert_eq!(json["hubIndex"], 0);
        assert_eq!(json["nights"], 2);
        assert_eq!(json["arrivalDate"], "2025-06-01");
        assert_eq!(json["lat"], 45.90);
    }

    #[cfg(feature = "serde")]
    #[rstest]
    fn role_flags_round_trip(mut annecy: Waypoint) {
        annecy.role = StopRole::Satellite;
        let json = serde_json::to_value(&annecy).expect("waypoint serialises");
        assert_eq!(json["isHub"], false);
        assert_eq!(json["isSatellite"], true);

        let flagged = r#"{"lat": 45.9, "lon": 6.13, "isHub": true}"#;
        let hub: Waypoint = serde_json::from_str(flagged).expect("waypoint parses");
        assert_eq!(hub.role, StopRole::Hub);
    }
}
