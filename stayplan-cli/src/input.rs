//! Loading waypoint lists and checking input paths.

use std::io::BufReader;

use camino::Utf8Path;
use log::debug;
use stayplan_core::Waypoint;
use stayplan_fs::open_utf8_file;
use stayplan_planner::nights_for_visit_minutes;

use crate::CliError;

/// Fail unless `path` names an existing regular file.
pub(crate) fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match stayplan_fs::file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Loads a JSON array of waypoints from disk.
///
/// Records without an `id` are numbered from 1 in file order. A missing
/// `suggestedDays` is derived from `visitMinutes` when that yields at least
/// one night.
pub(crate) fn load_waypoints(path: &Utf8Path) -> Result<Vec<Waypoint>, CliError> {
    let file = open_utf8_file(path).map_err(|source| CliError::OpenWaypoints {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    let mut waypoints: Vec<Waypoint> =
        serde_json::from_reader(reader).map_err(|source| CliError::ParseWaypoints {
            path: path.to_path_buf(),
            source,
        })?;
    for (waypoint, ordinal) in waypoints.iter_mut().zip(1_u64..) {
        fill_defaults(waypoint, ordinal);
    }
    debug!("loaded {} waypoints from {path}", waypoints.len());
    Ok(waypoints)
}

fn fill_defaults(waypoint: &mut Waypoint, ordinal: u64) {
    if waypoint.id == 0 {
        waypoint.id = ordinal;
    }
    if waypoint.suggested_days.is_none()
        && let Some(minutes) = waypoint.visit_minutes
    {
        let nights = nights_for_visit_minutes(minutes);
        if nights > 0 {
            waypoint.suggested_days = Some(nights);
        }
    }
}
