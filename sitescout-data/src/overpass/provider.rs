//! HTTP-based `PoiSource` using the Overpass interpreter.
//!
//! [`OverpassPoiSource`] POSTs a rendered Overpass QL query as `text/plain`
//! and decodes the JSON answer. The underlying `reqwest` client holds a
//! connection pool and is cheap to share behind an `Arc`.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use sitescout_core::{PoiQuery, PoiSource, PoiSourceError, RawElement};
use thiserror::Error;
use url::Url;

use super::query::render_query;
use super::response::OverpassResponse;

/// Error type for [`OverpassPoiSource`] construction failures.
#[derive(Debug, Error)]
pub enum ProviderBuildError {
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// The configured endpoint is not an absolute URL.
    #[error("invalid Overpass endpoint {endpoint:?}: {source}")]
    InvalidEndpoint {
        /// Endpoint as configured.
        endpoint: String,
        /// Parser detail.
        #[source]
        source: url::ParseError,
    },
}

/// Public Overpass interpreter.
pub const DEFAULT_ENDPOINT: &str = "https://overpass-api.de/api/interpreter";

/// Default user agent for Overpass requests.
pub const DEFAULT_USER_AGENT: &str = "sitescout/0.1";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 25;

/// Configuration for [`OverpassPoiSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverpassConfig {
    /// Interpreter URL queries are POSTed to.
    pub endpoint: String,
    /// Client-side request timeout, also sent as the server-side limit.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl Default for OverpassConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl OverpassConfig {
    /// Create a configuration for the given interpreter endpoint.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Overpass-backed POI source.
#[derive(Debug, Clone)]
pub struct OverpassPoiSource {
    client: Client,
    config: OverpassConfig,
    endpoint: Url,
}

impl OverpassPoiSource {
    /// Create a source for `endpoint` with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is not a URL or the HTTP client fails
    /// to build.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(OverpassConfig::new(endpoint))
    }

    /// Create a source with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is not a URL or the HTTP client fails
    /// to build.
    pub fn with_config(config: OverpassConfig) -> Result<Self, ProviderBuildError> {
        let endpoint =
            Url::parse(&config.endpoint).map_err(|source| ProviderBuildError::InvalidEndpoint {
                endpoint: config.endpoint.clone(),
                source,
            })?;
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(ProviderBuildError::HttpClient)?;
        Ok(Self {
            client,
            config,
            endpoint,
        })
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &OverpassConfig {
        &self.config
    }

    /// Convert a reqwest error to a `PoiSourceError`.
    fn convert_reqwest_error(&self, error: &reqwest::Error) -> PoiSourceError {
        let url = self.endpoint.to_string();
        if error.is_timeout() {
            return PoiSourceError::Timeout {
                url,
                timeout_secs: self.config.timeout.as_secs(),
            };
        }

        if let Some(status) = error.status() {
            return PoiSourceError::HttpError {
                url,
                status: status.as_u16(),
                message: error.to_string(),
            };
        }

        PoiSourceError::NetworkError {
            url,
            message: error.to_string(),
        }
    }
}

#[async_trait]
impl PoiSource for OverpassPoiSource {
    async fn fetch_elements(&self, query: &PoiQuery) -> Result<Vec<RawElement>, PoiSourceError> {
        let body = render_query(query, self.config.timeout.as_secs());
        debug!(
            "querying {} for {} filter(s) within {} m",
            self.endpoint,
            query.filters.len(),
            query.radius_m
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "text/plain")
            .body(body)
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err))?
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(&err))?;

        let decoded: OverpassResponse = response.json().await.map_err(|err| {
            if err.is_timeout() {
                self.convert_reqwest_error(&err)
            } else {
                PoiSourceError::ParseError {
                    message: err.to_string(),
                }
            }
        })?;

        let elements = decoded.into_elements();
        debug!("overpass returned {} elements", elements.len());
        Ok(elements)
    }
}
