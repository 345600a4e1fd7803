//! Route command implementation for the Stayplan CLI.

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use geo::Coord;
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use stayplan_core::RouteLeg;

use crate::input::{load_waypoints, require_existing};
use crate::providers::{
    ChainBuilder, DefaultChainBuilder, ProviderArgs, ProviderSettings, block_on, uncancelled,
};
use crate::{
    ARG_DIRECTIONS_BASE_URL, ARG_DIRECTIONS_TOKEN, ARG_OSRM_BASE_URL, ARG_PROFILE,
    ARG_PROXY_BASE_URL, ARG_WAYPOINTS, CliError, ENV_ROUTE_WAYPOINTS, write_json,
};

/// CLI arguments for the `route` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "route",
    long_about = "Route through an ordered list of waypoints. The open \
                 routing service is tried first, then the directions API \
                 when a token is configured, then the two-point proxy. If \
                 every service fails the route is approximated with \
                 straight lines.",
    about = "Compute a route through a waypoint list"
)]
#[ortho_config(prefix = "STAYPLAN")]
pub(crate) struct RouteArgs {
    /// Path to a JSON array of waypoints.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) waypoints_path: Option<Utf8PathBuf>,
    /// Travel profile: driving, cycling or walking.
    #[arg(long = ARG_PROFILE, value_name = "profile")]
    #[serde(default)]
    pub(crate) profile: Option<String>,
    /// Base URL for the open routing service (e.g. "http://localhost:5000").
    #[arg(long = ARG_OSRM_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) osrm_base_url: Option<String>,
    /// Base URL for the directions API.
    #[arg(long = ARG_DIRECTIONS_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) directions_base_url: Option<String>,
    /// Directions API access token.
    #[arg(long = ARG_DIRECTIONS_TOKEN, value_name = "token")]
    #[serde(default)]
    pub(crate) directions_token: Option<String>,
    /// Base URL for the two-point routing proxy.
    #[arg(long = ARG_PROXY_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) proxy_base_url: Option<String>,
}

impl RouteArgs {
    pub(crate) fn into_config(self) -> Result<RouteConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        RouteConfig::try_from(merged)
    }
}

/// Resolved `route` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RouteConfig {
    /// Path to the waypoints file.
    pub(crate) waypoints_path: Utf8PathBuf,
    /// Providers and travel profile.
    pub(crate) providers: ProviderSettings,
}

impl TryFrom<RouteArgs> for RouteConfig {
    type Error = CliError;

    fn try_from(args: RouteArgs) -> Result<Self, Self::Error> {
        let waypoints_path = args.waypoints_path.ok_or(CliError::MissingArgument {
            field: ARG_WAYPOINTS,
            env: ENV_ROUTE_WAYPOINTS,
        })?;
        let providers = ProviderSettings::try_from(ProviderArgs {
            profile: args.profile,
            osrm_base_url: args.osrm_base_url,
            directions_base_url: args.directions_base_url,
            directions_token: args.directions_token,
            proxy_base_url: args.proxy_base_url,
        })?;
        Ok(Self {
            waypoints_path,
            providers,
        })
    }
}

pub(crate) fn run_route(args: RouteArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_route_with(args, &DefaultChainBuilder, &mut stdout)
}

pub(crate) fn run_route_with(
    args: RouteArgs,
    builder: &dyn ChainBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let leg = execute_route(args, builder)?;
    write_json(writer, &leg)
}

fn execute_route(args: RouteArgs, builder: &dyn ChainBuilder) -> Result<RouteLeg, CliError> {
    let config = args.into_config()?;
    require_existing(&config.waypoints_path, ARG_WAYPOINTS)?;
    let points = load_points(&config.waypoints_path)?;
    let chain = builder.build(&config.providers)?;
    let profile = config.providers.profile;
    let cancel = uncancelled();
    let leg = block_on(chain.route(&points, profile, &cancel))??;
    info!(
        "routed {} waypoints via {:?}: {:.1} km",
        points.len(),
        leg.source,
        leg.distance_km()
    );
    Ok(leg)
}

fn load_points(path: &Utf8Path) -> Result<Vec<Coord<f64>>, CliError> {
    let waypoints = load_waypoints(path)?;
    if waypoints.len() < 2 {
        return Err(CliError::TooFewWaypoints {
            path: path.to_path_buf(),
            count: waypoints.len(),
        });
    }
    Ok(waypoints.iter().map(|waypoint| waypoint.location).collect())
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<RouteConfig, CliError> {
    let merged = RouteArgs::merge_from_layers(layers).map_err(CliError::from)?;
    RouteConfig::try_from(merged)
}
