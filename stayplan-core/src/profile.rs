//! Travel profiles: the mode of transport a route is computed for.
//!
//! Each routing service names its profiles differently, so the enum carries
//! the mapping for every provider family alongside the speed assumed when a
//! route has to be approximated geometrically.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Mode of transport used when routing between waypoints.
///
/// # Examples
/// ```
/// use stayplan_core::TravelProfile;
///
/// let profile: TravelProfile = "cycling".parse().unwrap();
/// assert_eq!(profile.osrm_profile(), "bike");
/// assert_eq!(profile.directions_profile(), "cycling");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum TravelProfile {
    /// Travel by car.
    #[default]
    Driving,
    /// Travel by bicycle.
    Cycling,
    /// Travel on foot.
    Walking,
}

impl TravelProfile {
    /// Profile segment understood by OSRM-style open routing services.
    #[must_use]
    pub const fn osrm_profile(self) -> &'static str {
        match self {
            Self::Driving => "car",
            Self::Cycling => "bike",
            Self::Walking => "foot",
        }
    }

    /// Profile segment understood by the commercial directions API and the
    /// two-point proxy.
    #[must_use]
    pub const fn directions_profile(self) -> &'static str {
        match self {
            Self::Driving => "driving",
            Self::Cycling => "cycling",
            Self::Walking => "walking",
        }
    }

    /// Average speed assumed when estimating durations without a router.
    #[must_use]
    pub const fn assumed_speed_kmh(self) -> f64 {
        match self {
            Self::Driving => 60.0,
            Self::Cycling => 15.0,
            Self::Walking => 5.0,
        }
    }
}

impl fmt::Display for TravelProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.directions_profile())
    }
}

/// Error returned when parsing an unknown travel profile name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown travel profile {0:?} (expected driving, cycling or walking)")]
pub struct TravelProfileParseError(pub String);

impl FromStr for TravelProfile {
    type Err = TravelProfileParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "driving" | "car" => Ok(Self::Driving),
            "cycling" | "bike" => Ok(Self::Cycling),
            "walking" | "foot" => Ok(Self::Walking),
            other => Err(TravelProfileParseError(other.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("driving", TravelProfile::Driving)]
    #[case("car", TravelProfile::Driving)]
    #[case("Cycling", TravelProfile::Cycling)]
    #[case(" foot ", TravelProfile::Walking)]
    fn parses_known_profiles(#[case] raw: &str, #[case] expected: TravelProfile) {
        assert_eq!(raw.parse::<TravelProfile>(), Ok(expected));
    }

    #[rstest]
    fn rejects_unknown_profile() {
        let err = "transit"
            .parse::<TravelProfile>()
            .expect_err("transit is not routable");
        assert_eq!(err, TravelProfileParseError("transit".to_owned()));
    }

    #[rstest]
    #[case(TravelProfile::Driving, "car", "driving")]
    #[case(TravelProfile::Cycling, "bike", "cycling")]
    #[case(TravelProfile::Walking, "foot", "walking")]
    fn maps_provider_profiles(
        #[case] profile: TravelProfile,
        #[case] osrm: &str,
        #[case] directions: &str,
    ) {
        assert_eq!(profile.osrm_profile(), osrm);
        assert_eq!(profile.directions_profile(), directions);
        assert_eq!(profile.to_string(), directions);
    }
}
