//! Command-line interface and HTTP service for the SiteScout engine.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod query;
mod server;
mod source;

pub use error::CliError;
pub use server::{AppState, build_router};

use query::{QueryArgs, QueryKind};
use server::ServeArgs;
use source::OverpassSourceBuilder;

const ARG_BIND: &str = "bind";
const ARG_OVERPASS_ENDPOINT: &str = "overpass-endpoint";
const ARG_TIMEOUT_SECS: &str = "timeout-secs";
const ARG_USER_AGENT: &str = "user-agent";
const ARG_REQUEST: &str = "request";
const ENV_REQUEST: &str = "SITESCOUT_CMDS_QUERY_REQUEST_PATH";

/// Run the SiteScout CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns [`CliError`] when argument parsing, configuration, the upstream
/// query or the server fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;
    let builder = OverpassSourceBuilder;
    match cli.command {
        Command::Serve(args) => runtime.block_on(server::run_serve(args, &builder)),
        Command::Density(args) => runtime.block_on(query::run_query(QueryKind::Density, args)),
        Command::Nearby(args) => runtime.block_on(query::run_query(QueryKind::Nearby, args)),
        Command::Score(args) => runtime.block_on(query::run_query(QueryKind::Score, args)),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "sitescout",
    about = "Competitor density and site scoring over OpenStreetMap data",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the JSON API over HTTP.
    Serve(ServeArgs),
    /// Build a competitor density report from a JSON request file.
    Density(QueryArgs),
    /// List places near a location from a JSON request file.
    Nearby(QueryArgs),
    /// Score a candidate location from a JSON request file.
    Score(QueryArgs),
}

#[cfg(test)]
mod tests;
