//! Error types emitted by the Stayplan CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use stayplan_core::{RoutingError, TravelProfileParseError};
use stayplan_planner::PlannerConfigError;
use stayplan_routing::ProviderBuildError;
use thiserror::Error;

/// Errors emitted by the Stayplan CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        field: &'static str,
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Opening the waypoints file failed.
    #[error("failed to open waypoints at {path:?}: {source}")]
    OpenWaypoints {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Waypoints JSON could not be decoded.
    #[error("failed to parse waypoints JSON at {path:?}: {source}")]
    ParseWaypoints {
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// Routing needs at least two waypoints.
    #[error("{path:?} holds {count} waypoint(s); routing needs at least two")]
    TooFewWaypoints { path: Utf8PathBuf, count: usize },
    /// The travel profile name is unknown.
    #[error(transparent)]
    InvalidProfile(#[from] TravelProfileParseError),
    /// The start date is not an ISO `YYYY-MM-DD` date.
    #[error("start date {value:?} is not a YYYY-MM-DD date: {source}")]
    InvalidStartDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    /// Planner tuning was rejected.
    #[error(transparent)]
    InvalidPlannerConfig(#[from] PlannerConfigError),
    /// Constructing a routing provider failed.
    #[error("failed to build routing provider for {base_url:?}: {source}")]
    BuildProvider {
        base_url: String,
        #[source]
        source: ProviderBuildError,
    },
    /// The async runtime could not be started.
    #[error("failed to start async runtime: {0}")]
    StartRuntime(#[source] std::io::Error),
    /// The provider chain failed.
    #[error("routing failed: {0}")]
    Routing(#[from] RoutingError),
    /// Serialising the command output failed.
    #[error("failed to serialise output: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Writing the command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
    /// Writing the output file failed.
    #[error("failed to write output to {path:?}: {source}")]
    WriteOutputFile {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
}
