//! Test helpers: temporary waypoint files and stub provider chains.

use std::cell::RefCell;

use camino::{Utf8Path, Utf8PathBuf};
use stayplan_core::{RouteSource, RoutingError};
use stayplan_routing::test_support::StubRouteProvider;
use stayplan_routing::{ChainConfig, ProviderChain};
use tempfile::TempDir;

use crate::CliError;
use crate::providers::{ChainBuilder, ProviderSettings};

/// Annecy and Talloires share a lake shore; Lyon is a day's drive away.
pub(super) const LAKE_AND_CITY: &str = r#"[
  {"name": "Annecy", "lat": 45.899, "lon": 6.129, "rating": 9},
  {"name": "Talloires", "lat": 45.840, "lon": 6.213, "rating": 5},
  {"name": "Lyon", "lat": 45.764, "lon": 4.835, "rating": 8}
]"#;

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    stayplan_fs::write_utf8_file(path, contents).expect("write test file");
}

/// A temporary directory addressed with UTF-8 paths.
#[derive(Debug)]
pub(super) struct Workspace {
    _tmp: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let tmp = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace");
        Self { _tmp: tmp, root }
    }

    pub(super) fn path(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }

    pub(super) fn write(&self, name: &str, contents: &str) -> Utf8PathBuf {
        let path = self.path(name);
        write_utf8(&path, contents.as_bytes());
        path
    }
}

/// How the stub primary provider answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum StubMode {
    /// Echo the input points as a routed leg.
    Echo,
    /// Fail every request so the chain falls back to straight lines.
    Fail,
}

/// Builds chains around a stub provider and records the settings it saw.
#[derive(Debug)]
pub(super) struct StubChainBuilder {
    mode: StubMode,
    seen: RefCell<Option<ProviderSettings>>,
}

impl StubChainBuilder {
    pub(super) const fn new(mode: StubMode) -> Self {
        Self {
            mode,
            seen: RefCell::new(None),
        }
    }

    pub(super) fn seen(&self) -> Option<ProviderSettings> {
        self.seen.borrow().clone()
    }
}

impl ChainBuilder for StubChainBuilder {
    fn build(&self, settings: &ProviderSettings) -> Result<ProviderChain, CliError> {
        self.seen.replace(Some(settings.clone()));
        let provider = match self.mode {
            StubMode::Echo => StubRouteProvider::echoing("osrm", RouteSource::OpenRouting),
            StubMode::Fail => StubRouteProvider::failing(
                "osrm",
                RoutingError::Unavailable {
                    provider: "osrm".to_owned(),
                },
            ),
        };
        Ok(ProviderChain::new(ChainConfig::default()).with_primary(provider))
    }
}
