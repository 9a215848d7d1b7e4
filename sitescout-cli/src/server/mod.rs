//! HTTP service exposing the engine as a JSON API.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use axum::extract::Request;
use axum::http::{Method, header};
use axum::middleware::Next;
use axum::response::Response;
use axum::routing::{get, post};
use clap::Parser;
use log::{info, warn};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use sitescout_core::PoiSource;
use sitescout_density::SiteService;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

use crate::source::{SourceBuilder, SourceSettings};
use crate::{ARG_BIND, ARG_OVERPASS_ENDPOINT, ARG_TIMEOUT_SECS, ARG_USER_AGENT, CliError};

mod error;
mod routes;

pub use error::ApiError;

/// Default listen address.
pub(crate) const DEFAULT_BIND: &str = "127.0.0.1:3000";

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    service: Arc<SiteService<Arc<dyn PoiSource>>>,
}

impl AppState {
    /// State serving requests from `source`.
    #[must_use]
    pub fn new(source: Arc<dyn PoiSource>) -> Self {
        Self {
            service: Arc::new(SiteService::new(source)),
        }
    }
}

/// Build the API router with CORS and request logging.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(routes::health))
        .route("/api/competitor-density", post(routes::competitor_density))
        .route("/api/places-nearby", post(routes::places_nearby))
        .route("/api/location-score", post(routes::location_score))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(log_request)),
        )
        .with_state(state)
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let started = Instant::now();
    let response = next.run(request).await;
    info!(
        "{method} {path} {} in {}ms",
        response.status().as_u16(),
        started.elapsed().as_millis()
    );
    response
}

/// CLI arguments for the `serve` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Serve the competitor density, nearby places and location \
                 score endpoints over HTTP. Settings can come from CLI \
                 flags, configuration files, or environment variables.",
    about = "Serve the JSON API"
)]
#[ortho_config(prefix = "SITESCOUT")]
pub(crate) struct ServeArgs {
    /// Address to listen on.
    #[arg(long = ARG_BIND, value_name = "addr")]
    #[serde(default)]
    pub(crate) bind: Option<String>,
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

impl ServeArgs {
    pub(crate) fn into_config(self) -> Result<ServeConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ServeConfig::try_from(merged)
    }
}

/// Resolved `serve` configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ServeConfig {
    pub(crate) bind: SocketAddr,
    pub(crate) source: SourceSettings,
}

impl TryFrom<ServeArgs> for ServeConfig {
    type Error = CliError;

    fn try_from(args: ServeArgs) -> Result<Self, Self::Error> {
        let raw = args.bind.unwrap_or_else(|| DEFAULT_BIND.to_owned());
        let bind: SocketAddr = raw
            .parse()
            .map_err(|source| CliError::InvalidBindAddress { value: raw, source })?;
        let source =
            SourceSettings::resolve(args.overpass_endpoint, args.timeout_secs, args.user_agent)?;
        Ok(Self { bind, source })
    }
}

pub(crate) async fn run_serve(
    args: ServeArgs,
    builder: &dyn SourceBuilder,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    let app = build_router(AppState::new(builder.build(&config.source)?));
    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .map_err(|source| CliError::Bind {
            addr: config.bind,
            source,
        })?;
    info!(
        "listening on {} (upstream {})",
        config.bind, config.source.endpoint
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(CliError::Serve)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!("cannot listen for ctrl-c: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                warn!("cannot install SIGTERM handler: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("shutdown signal received, draining connections");
}
