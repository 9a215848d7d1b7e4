//! Upstream source settings shared by every subcommand.

use std::sync::Arc;
use std::time::Duration;

use log::debug;
use sitescout_core::PoiSource;
use sitescout_data::{DEFAULT_ENDPOINT, DEFAULT_USER_AGENT, OverpassConfig, OverpassPoiSource};

use crate::CliError;

/// Default upstream timeout in seconds.
pub(crate) const DEFAULT_TIMEOUT_SECS: u64 = 25;

/// Resolved Overpass client settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SourceSettings {
    pub(crate) endpoint: String,
    pub(crate) timeout_secs: u64,
    pub(crate) user_agent: String,
}

impl SourceSettings {
    /// Fill unset values with the Overpass defaults.
    pub(crate) fn resolve(
        endpoint: Option<String>,
        timeout_secs: Option<u64>,
        user_agent: Option<String>,
    ) -> Result<Self, CliError> {
        let timeout_secs = timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(CliError::InvalidTimeout);
        }
        Ok(Self {
            endpoint: endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.to_owned()),
            timeout_secs,
            user_agent: user_agent.unwrap_or_else(|| DEFAULT_USER_AGENT.to_owned()),
        })
    }

    pub(crate) fn overpass_config(&self) -> OverpassConfig {
        OverpassConfig::new(self.endpoint.clone())
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .with_user_agent(self.user_agent.clone())
    }
}

/// Builds the POI source for the current invocation.
pub(crate) trait SourceBuilder {
    fn build(&self, settings: &SourceSettings) -> Result<Arc<dyn PoiSource>, CliError>;
}

pub(crate) struct OverpassSourceBuilder;

impl SourceBuilder for OverpassSourceBuilder {
    fn build(&self, settings: &SourceSettings) -> Result<Arc<dyn PoiSource>, CliError> {
        let source = OverpassPoiSource::with_config(settings.overpass_config()).map_err(
            |source| CliError::BuildSource {
                endpoint: settings.endpoint.clone(),
                source,
            },
        )?;
        debug!(
            "using Overpass endpoint {} with {}s timeout",
            settings.endpoint, settings.timeout_secs
        );
        Ok(Arc::new(source))
    }
}
