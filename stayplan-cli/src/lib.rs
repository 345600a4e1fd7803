//! Command-line interface for the Stayplan itinerary engine.
#![forbid(unsafe_code)]

use std::io::Write;

use clap::{Parser, Subcommand};
use serde::Serialize;

mod error;
mod input;
mod plan;
mod providers;
mod route;

pub use error::CliError;

use plan::{PlanArgs, run_plan};
use route::{RouteArgs, run_route};

pub(crate) const ARG_WAYPOINTS: &str = "waypoints";
pub(crate) const ARG_PROFILE: &str = "profile";
pub(crate) const ARG_OSRM_BASE_URL: &str = "osrm-base-url";
pub(crate) const ARG_DIRECTIONS_BASE_URL: &str = "directions-base-url";
pub(crate) const ARG_DIRECTIONS_TOKEN: &str = "directions-token";
pub(crate) const ARG_PROXY_BASE_URL: &str = "proxy-base-url";
pub(crate) const ARG_NIGHTS: &str = "nights";
pub(crate) const ARG_START_DATE: &str = "start-date";
pub(crate) const ARG_DISTANCE_THRESHOLD_KM: &str = "distance-threshold-km";
pub(crate) const ARG_MAX_GROUP_SIZE: &str = "max-group-size";
pub(crate) const ARG_ROUTE: &str = "route";
pub(crate) const ARG_OUTPUT: &str = "output";
pub(crate) const ENV_ROUTE_WAYPOINTS: &str = "STAYPLAN_CMDS_ROUTE_WAYPOINTS_PATH";
pub(crate) const ENV_PLAN_WAYPOINTS: &str = "STAYPLAN_CMDS_PLAN_WAYPOINTS_PATH";
pub(crate) const ENV_PLAN_NIGHTS: &str = "STAYPLAN_CMDS_PLAN_NIGHTS";

/// Run the Stayplan CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Route(args) => run_route(args),
        Command::Plan(args) => run_plan(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "stayplan",
    about = "Route and plan multi-stop itineraries",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compute a route through an ordered waypoint list.
    Route(RouteArgs),
    /// Group waypoints into hubs, allocate nights and assign dates.
    Plan(PlanArgs),
}

/// Pretty-print `value` as JSON followed by a newline.
pub(crate) fn write_json<T: Serialize>(writer: &mut dyn Write, value: &T) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerialiseOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
mod tests;
