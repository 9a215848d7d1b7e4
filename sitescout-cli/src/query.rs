//! One-shot `density`, `nearby` and `score` commands.
//!
//! Each command reads the same JSON body the HTTP API accepts from a file,
//! runs it once against the configured source and prints the response.

use std::io::{BufReader, Write};

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sitescout_core::{
    DensityBody, DensityRequest, NearbyBody, NearbyRequest, RequestError, ScorecardBody,
    ScorecardRequest,
};
use sitescout_density::SiteService;

use crate::source::{OverpassSourceBuilder, SourceBuilder, SourceSettings};
use crate::{
    ARG_OVERPASS_ENDPOINT, ARG_REQUEST, ARG_TIMEOUT_SECS, ARG_USER_AGENT, CliError, ENV_REQUEST,
};

/// Which engine operation a one-shot command runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum QueryKind {
    Density,
    Nearby,
    Score,
}

/// CLI arguments shared by the one-shot commands.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Run a single query. The request file holds the same JSON \
                 body the HTTP API accepts; the response is printed to \
                 stdout. Upstream settings can come from CLI flags, \
                 configuration files, or environment variables.",
    about = "Run a single query from a JSON request file"
)]
#[ortho_config(prefix = "SITESCOUT")]
pub(crate) struct QueryArgs {
    /// Path to a JSON file containing the request body.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) request_path: Option<Utf8PathBuf>,
    /// Overpass interpreter endpoint.
    #[arg(long = ARG_OVERPASS_ENDPOINT, value_name = "url")]
    #[serde(default)]
    pub(crate) overpass_endpoint: Option<String>,
    /// Upstream timeout in seconds.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
    /// User agent sent upstream.
    #[arg(long = ARG_USER_AGENT, value_name = "agent")]
    #[serde(default)]
    pub(crate) user_agent: Option<String>,
}

impl QueryArgs {
    pub(crate) fn into_config(self) -> Result<QueryConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        QueryConfig::try_from(merged)
    }
}

/// Resolved one-shot command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct QueryConfig {
    pub(crate) request_path: Utf8PathBuf,
    pub(crate) source: SourceSettings,
}

impl TryFrom<QueryArgs> for QueryConfig {
    type Error = CliError;

    fn try_from(args: QueryArgs) -> Result<Self, Self::Error> {
        let request_path = args.request_path.ok_or(CliError::MissingArgument {
            field: ARG_REQUEST,
            env: ENV_REQUEST,
        })?;
        let source =
            SourceSettings::resolve(args.overpass_endpoint, args.timeout_secs, args.user_agent)?;
        Ok(Self {
            request_path,
            source,
        })
    }
}

pub(crate) async fn run_query(kind: QueryKind, args: QueryArgs) -> Result<(), CliError> {
    let config = args.into_config()?;
    let mut stdout = std::io::stdout().lock();
    run_query_with(kind, &config, &OverpassSourceBuilder, &mut stdout).await
}

pub(crate) async fn run_query_with(
    kind: QueryKind,
    config: &QueryConfig,
    builder: &dyn SourceBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let path = config.request_path.as_path();
    // The request is validated before any client is built.
    let response = match kind {
        QueryKind::Density => {
            let request: DensityRequest = load_request::<DensityBody, _>(path)?;
            let service = SiteService::new(builder.build(&config.source)?);
            serde_json::to_value(service.competitor_density(&request).await?)
        }
        QueryKind::Nearby => {
            let request: NearbyRequest = load_request::<NearbyBody, _>(path)?;
            let service = SiteService::new(builder.build(&config.source)?);
            serde_json::to_value(service.nearby_places(&request).await?)
        }
        QueryKind::Score => {
            let request: ScorecardRequest = load_request::<ScorecardBody, _>(path)?;
            let service = SiteService::new(builder.build(&config.source)?);
            serde_json::to_value(service.score_location(&request).await?)
        }
    }
    .map_err(CliError::SerialiseResponse)?;
    write_response(writer, &response)
}

/// Decode and validate a request body stored at `path`.
pub(crate) fn load_request<B, R>(path: &Utf8Path) -> Result<R, CliError>
where
    B: DeserializeOwned,
    R: TryFrom<B, Error = RequestError>,
{
    let file = fs_utf8::File::open_ambient(path, ambient_authority()).map_err(|source| {
        CliError::OpenRequest {
            path: path.to_path_buf(),
            source,
        }
    })?;
    let body: B = serde_json::from_reader(BufReader::new(file)).map_err(|source| {
        CliError::ParseRequest {
            path: path.to_path_buf(),
            source,
        }
    })?;
    R::try_from(body).map_err(|source| CliError::InvalidRequest {
        path: path.to_path_buf(),
        source,
    })
}

fn write_response(writer: &mut dyn Write, response: &serde_json::Value) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(response).map_err(CliError::SerialiseResponse)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}
