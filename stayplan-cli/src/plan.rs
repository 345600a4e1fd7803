//! Plan command implementation for the Stayplan CLI.

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use chrono::NaiveDate;
use clap::Parser;
use log::{info, warn};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use stayplan_core::{RouteLeg, Waypoint};
use stayplan_planner::{PlanReport, Planner, PlannerConfig};

use crate::input::{load_waypoints, require_existing};
use crate::providers::{
    ChainBuilder, DefaultChainBuilder, ProviderArgs, ProviderSettings, block_on, uncancelled,
};
use crate::{
    ARG_DIRECTIONS_BASE_URL, ARG_DIRECTIONS_TOKEN, ARG_DISTANCE_THRESHOLD_KM,
    ARG_MAX_GROUP_SIZE, ARG_NIGHTS, ARG_OSRM_BASE_URL, ARG_OUTPUT, ARG_PROFILE,
    ARG_PROXY_BASE_URL, ARG_ROUTE, ARG_START_DATE, ARG_WAYPOINTS, CliError, ENV_PLAN_NIGHTS,
    ENV_PLAN_WAYPOINTS, write_json,
};

/// CLI arguments for the `plan` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "plan",
    long_about = "Group an ordered waypoint list into hubs and day-trip \
                 satellites, share the requested nights between the hubs, \
                 and date every stop from an optional start date. With \
                 --route, leg distances come from the routing providers \
                 instead of great-circle estimates.",
    about = "Plan hubs, nights and dates for a waypoint list"
)]
#[ortho_config(prefix = "STAYPLAN")]
pub(crate) struct PlanArgs {
    /// Path to a JSON array of waypoints.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) waypoints_path: Option<Utf8PathBuf>,
    /// Total nights to allocate.
    #[arg(long = ARG_NIGHTS, value_name = "count")]
    #[serde(default)]
    pub(crate) nights: Option<u32>,
    /// First arrival date (YYYY-MM-DD).
    #[arg(long = ARG_START_DATE, value_name = "date")]
    #[serde(default)]
    pub(crate) start_date: Option<String>,
    /// Largest gap in kilometres between stops of one group.
    #[arg(long = ARG_DISTANCE_THRESHOLD_KM, value_name = "km")]
    #[serde(default)]
    pub(crate) distance_threshold_km: Option<f64>,
    /// Most stops one hub may serve.
    #[arg(long = ARG_MAX_GROUP_SIZE, value_name = "count")]
    #[serde(default)]
    pub(crate) max_group_size: Option<usize>,
    /// Route each leg before grouping.
    #[arg(
        long = ARG_ROUTE,
        value_name = "bool",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    #[serde(default)]
    pub(crate) route: Option<bool>,
    /// Travel profile used with --route.
    #[arg(long = ARG_PROFILE, value_name = "profile")]
    #[serde(default)]
    pub(crate) profile: Option<String>,
    /// Base URL for the open routing service.
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
    /// Write the plan here instead of stdout.
    #[arg(long = ARG_OUTPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
}

impl PlanArgs {
    pub(crate) fn into_config(self) -> Result<PlanConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        PlanConfig::try_from(merged)
    }
}

/// Resolved `plan` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PlanConfig {
    /// Path to the waypoints file.
    pub(crate) waypoints_path: Utf8PathBuf,
    /// Nights to allocate.
    pub(crate) nights: u32,
    /// First arrival date.
    pub(crate) start_date: Option<NaiveDate>,
    /// Validated planner tuning.
    pub(crate) planner: PlannerConfig,
    /// Whether legs are routed before grouping.
    pub(crate) route: bool,
    /// Providers used when routing.
    pub(crate) providers: ProviderSettings,
    /// Output file, when not writing to stdout.
    pub(crate) output: Option<Utf8PathBuf>,
}

impl TryFrom<PlanArgs> for PlanConfig {
    type Error = CliError;

    fn try_from(args: PlanArgs) -> Result<Self, Self::Error> {
        let waypoints_path = args.waypoints_path.ok_or(CliError::MissingArgument {
            field: ARG_WAYPOINTS,
            env: ENV_PLAN_WAYPOINTS,
        })?;
        let nights = args.nights.ok_or(CliError::MissingArgument {
            field: ARG_NIGHTS,
            env: ENV_PLAN_NIGHTS,
        })?;
        let start_date = args.start_date.as_deref().map(parse_start_date).transpose()?;

        let mut planner = PlannerConfig::default();
        if let Some(km) = args.distance_threshold_km {
            planner = planner.with_distance_threshold_km(km);
        }
        if let Some(size) = args.max_group_size {
            planner = planner.with_max_group_size(size);
        }
        planner.validate()?;

        let providers = ProviderSettings::try_from(ProviderArgs {
            profile: args.profile,
            osrm_base_url: args.osrm_base_url,
            directions_base_url: args.directions_base_url,
            directions_token: args.directions_token,
            proxy_base_url: args.proxy_base_url,
        })?;

        Ok(Self {
            waypoints_path,
            nights,
            start_date,
            planner,
            route: args.route.unwrap_or(false),
            providers,
            output: args.output,
        })
    }
}

fn parse_start_date(value: &str) -> Result<NaiveDate, CliError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|source| CliError::InvalidStartDate {
        value: value.to_owned(),
        source,
    })
}

pub(crate) fn run_plan(args: PlanArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_plan_with(args, &DefaultChainBuilder, &mut stdout)
}

pub(crate) fn run_plan_with(
    args: PlanArgs,
    builder: &dyn ChainBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    let report = execute_plan(&config, builder)?;
    match &config.output {
        Some(path) => write_report_file(path, &report),
        None => write_json(writer, &report),
    }
}

fn execute_plan(config: &PlanConfig, builder: &dyn ChainBuilder) -> Result<PlanReport, CliError> {
    require_existing(&config.waypoints_path, ARG_WAYPOINTS)?;
    let waypoints = load_waypoints(&config.waypoints_path)?;
    let legs = if config.route {
        route_legs(&waypoints, config, builder)?
    } else {
        Vec::new()
    };

    let planner = Planner::new(config.planner);
    let report = planner.plan(waypoints, &legs, config.nights, config.start_date);
    if report.allocation.is_degenerate() {
        warn!("no nights were allocated for {}", config.waypoints_path);
    } else {
        info!(
            "planned {} nights across {} groups",
            report.total_nights,
            report.groups.len()
        );
    }
    Ok(report)
}

fn route_legs(
    waypoints: &[Waypoint],
    config: &PlanConfig,
    builder: &dyn ChainBuilder,
) -> Result<Vec<RouteLeg>, CliError> {
    if waypoints.len() < 2 {
        return Ok(Vec::new());
    }
    let points: Vec<_> = waypoints.iter().map(|waypoint| waypoint.location).collect();
    let chain = builder.build(&config.providers)?;
    let cancel = uncancelled();
    let legs = block_on(chain.route_legs(&points, config.providers.profile, &cancel))??;
    Ok(legs)
}

fn write_report_file(path: &Utf8Path, report: &PlanReport) -> Result<(), CliError> {
    let mut payload = serde_json::to_vec_pretty(report).map_err(CliError::SerialiseOutput)?;
    payload.push(b'\n');
    stayplan_fs::write_utf8_file(path, &payload).map_err(|source| CliError::WriteOutputFile {
        path: path.to_path_buf(),
        source,
    })?;
    info!("wrote plan to {path}");
    Ok(())
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<PlanConfig, CliError> {
    let merged = PlanArgs::merge_from_layers(layers).map_err(CliError::from)?;
    PlanConfig::try_from(merged)
}
