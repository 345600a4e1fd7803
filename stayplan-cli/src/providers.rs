//! Routing provider wiring shared by the `route` and `plan` commands.

use std::future::Future;

use stayplan_core::TravelProfile;
use stayplan_routing::{
    ChainConfig, DEFAULT_DIRECTIONS_URL, DEFAULT_OPEN_ROUTING_URL, HttpRouteProvider,
    HttpRouteProviderConfig, ProviderChain, ProxyRouteProvider, ProxyRouteProviderConfig,
};
use tokio_util::sync::CancellationToken;

use crate::CliError;

/// Provider options as merged from flags, files and environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ProviderArgs {
    pub(crate) profile: Option<String>,
    pub(crate) osrm_base_url: Option<String>,
    pub(crate) directions_base_url: Option<String>,
    pub(crate) directions_token: Option<String>,
    pub(crate) proxy_base_url: Option<String>,
}

/// Resolved provider settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ProviderSettings {
    /// Travel profile for every request.
    pub(crate) profile: TravelProfile,
    /// Base URL for the open routing service.
    pub(crate) osrm_base_url: String,
    /// Base URL for the directions API.
    pub(crate) directions_base_url: String,
    /// Directions access token, when configured.
    pub(crate) directions_token: Option<String>,
    /// Proxy base URL, when configured.
    pub(crate) proxy_base_url: Option<String>,
}

impl TryFrom<ProviderArgs> for ProviderSettings {
    type Error = CliError;

    fn try_from(args: ProviderArgs) -> Result<Self, Self::Error> {
        let profile = args
            .profile
            .as_deref()
            .map(str::parse::<TravelProfile>)
            .transpose()?
            .unwrap_or_default();
        Ok(Self {
            profile,
            osrm_base_url: args
                .osrm_base_url
                .unwrap_or_else(|| DEFAULT_OPEN_ROUTING_URL.to_owned()),
            directions_base_url: args
                .directions_base_url
                .unwrap_or_else(|| DEFAULT_DIRECTIONS_URL.to_owned()),
            directions_token: args.directions_token.filter(|token| !token.is_empty()),
            proxy_base_url: args.proxy_base_url.filter(|url| !url.is_empty()),
        })
    }
}

/// Builds the provider chain for the current invocation.
pub(crate) trait ChainBuilder {
    fn build(&self, settings: &ProviderSettings) -> Result<ProviderChain, CliError>;
}

/// Wires the HTTP providers in priority order.
pub(crate) struct DefaultChainBuilder;

impl ChainBuilder for DefaultChainBuilder {
    fn build(&self, settings: &ProviderSettings) -> Result<ProviderChain, CliError> {
        let osrm = HttpRouteProvider::new(settings.osrm_base_url.clone()).map_err(|source| {
            CliError::BuildProvider {
                base_url: settings.osrm_base_url.clone(),
                source,
            }
        })?;
        let mut chain = ProviderChain::new(ChainConfig::default()).with_primary(osrm);

        if let Some(token) = &settings.directions_token {
            let config =
                HttpRouteProviderConfig::directions(settings.directions_base_url.clone(), token);
            let directions = HttpRouteProvider::with_config(config).map_err(|source| {
                CliError::BuildProvider {
                    base_url: settings.directions_base_url.clone(),
                    source,
                }
            })?;
            chain = chain.with_secondary(directions);
        }

        if let Some(base_url) = &settings.proxy_base_url {
            let proxy =
                ProxyRouteProvider::with_config(ProxyRouteProviderConfig::new(base_url.clone()))
                    .map_err(|source| CliError::BuildProvider {
                        base_url: base_url.clone(),
                        source,
                    })?;
            chain = chain.with_proxy(proxy);
        }
        Ok(chain)
    }
}

/// Drive `future` to completion on a single-threaded runtime.
pub(crate) fn block_on<F: Future>(future: F) -> Result<F::Output, CliError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::StartRuntime)?;
    Ok(runtime.block_on(future))
}

/// A token nothing cancels; the CLI runs each request to completion.
pub(crate) fn uncancelled() -> CancellationToken {
    CancellationToken::new()
}
