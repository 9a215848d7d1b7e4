//! Error types emitted by the SiteScout CLI.
//!
//! Keep this error type reasonably small, as most helpers return
//! `Result<_, CliError>`.

use std::net::SocketAddr;
use std::sync::Arc;

use camino::Utf8PathBuf;
use sitescout_core::RequestError;
use sitescout_data::ProviderBuildError;
use sitescout_density::SiteError;
use thiserror::Error;

/// Errors emitted by the SiteScout CLI.
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
        /// Flag name.
        field: &'static str,
        /// Environment variable consulted.
        env: &'static str,
    },
    /// The bind address did not parse.
    #[error("invalid bind address {value:?}: {source}")]
    InvalidBindAddress {
        /// Raw value.
        value: String,
        /// Parser failure.
        #[source]
        source: std::net::AddrParseError,
    },
    /// The upstream timeout was zero.
    #[error("timeout-secs must be at least 1")]
    InvalidTimeout,
    /// Constructing the Overpass client failed.
    #[error("failed to build Overpass source for {endpoint:?}: {source}")]
    BuildSource {
        /// Configured endpoint.
        endpoint: String,
        /// Construction failure.
        #[source]
        source: ProviderBuildError,
    },
    /// The async runtime could not start.
    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),
    /// Binding the HTTP listener failed.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// Requested address.
        addr: SocketAddr,
        /// IO failure.
        #[source]
        source: std::io::Error,
    },
    /// The HTTP server stopped with an error.
    #[error("server failed: {0}")]
    Serve(#[source] std::io::Error),
    /// Opening the request file failed.
    #[error("failed to open request at {path:?}: {source}")]
    OpenRequest {
        /// Request path.
        path: Utf8PathBuf,
        /// IO failure.
        #[source]
        source: std::io::Error,
    },
    /// Request JSON could not be decoded.
    #[error("failed to parse request JSON at {path:?}: {source}")]
    ParseRequest {
        /// Request path.
        path: Utf8PathBuf,
        /// Decoder failure.
        #[source]
        source: serde_json::Error,
    },
    /// The request payload failed validation.
    #[error("request in {path:?} failed validation: {source}")]
    InvalidRequest {
        /// Request path.
        path: Utf8PathBuf,
        /// First failing field.
        #[source]
        source: RequestError,
    },
    /// The engine rejected or failed the request.
    #[error("query failed: {0}")]
    Query(#[from] SiteError),
    /// Serialising the response failed.
    #[error("failed to serialise response: {0}")]
    SerialiseResponse(#[source] serde_json::Error),
    /// Writing the response failed.
    #[error("failed to write response: {0}")]
    WriteOutput(#[source] std::io::Error),
}
