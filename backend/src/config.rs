//! Upstream credentials and endpoints loaded via OrthoConfig.
//!
//! Credentials and endpoints are optional at load time so the CLI can start
//! and report a precise [`ConfigError`] for the one adapter that actually
//! needs a value. Numeric tuning knobs carry defaults so an empty environment
//! still loads.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::domain::Error;

const DEFAULT_GOOGLE_MAPS_BASE_URL: &str = "https://maps.googleapis.com/maps/api/";
const DEFAULT_ODPT_BASE_URL: &str = "https://api.odpt.org/api/v4/";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;
const DEFAULT_FETCH_ATTEMPTS: u32 = 2;
const DEFAULT_LANGUAGE: &str = "ja";

/// Configuration failures raised when an adapter is built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A required API key is absent or blank.
    #[error("missing credential: set {name}")]
    MissingCredential {
        /// Environment variable that supplies the credential.
        name: &'static str,
    },
    /// A base URL does not parse or cannot carry a path.
    #[error("invalid endpoint {name}: {message}")]
    InvalidEndpoint {
        /// Setting holding the endpoint.
        name: &'static str,
        /// Parser message.
        message: String,
    },
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {message}")]
    HttpClient {
        /// Client builder message.
        message: String,
    },
}

impl From<ConfigError> for Error {
    fn from(error: ConfigError) -> Self {
        Self::misconfigured(error.to_string())
    }
}

/// Upstream API settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "MAPBRIDGE")]
pub struct MapbridgeSettings {
    /// Places/routing/geocoding API key.
    pub google_maps_api_key: Option<String>,
    /// Places/routing/geocoding API base URL.
    pub google_maps_base_url: Option<String>,
    /// Transit linked-data consumer key.
    pub odpt_api_key: Option<String>,
    /// Transit linked-data base URL.
    pub odpt_base_url: Option<String>,
    /// Per-request timeout in seconds.
    #[ortho_config(default = DEFAULT_REQUEST_TIMEOUT_SECS)]
    pub request_timeout_secs: u64,
    /// Total attempts per transit fetch, including the first.
    #[ortho_config(default = DEFAULT_FETCH_ATTEMPTS)]
    pub fetch_attempts: u32,
    /// Response language for the places/routing/geocoding API.
    pub language: Option<String>,
}

impl MapbridgeSettings {
    /// Return the places/routing/geocoding API key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingCredential`] when the key is absent or
    /// blank.
    pub fn google_maps_api_key(&self) -> Result<&str, ConfigError> {
        required_credential(
            self.google_maps_api_key.as_deref(),
            "MAPBRIDGE_GOOGLE_MAPS_API_KEY",
        )
    }

    /// Return the transit linked-data consumer key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingCredential`] when the key is absent or
    /// blank.
    pub fn odpt_api_key(&self) -> Result<&str, ConfigError> {
        required_credential(self.odpt_api_key.as_deref(), "MAPBRIDGE_ODPT_API_KEY")
    }

    /// Return the places/routing/geocoding base URL, ending with `/`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEndpoint`] when the URL does not parse.
    pub fn google_maps_base_url(&self) -> Result<Url, ConfigError> {
        base_url(
            self.google_maps_base_url.as_deref(),
            DEFAULT_GOOGLE_MAPS_BASE_URL,
            "google_maps_base_url",
        )
    }

    /// Return the transit linked-data base URL, ending with `/`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEndpoint`] when the URL does not parse.
    pub fn odpt_base_url(&self) -> Result<Url, ConfigError> {
        base_url(
            self.odpt_base_url.as_deref(),
            DEFAULT_ODPT_BASE_URL,
            "odpt_base_url",
        )
    }

    /// Return the per-request timeout, at least one second.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Return the total attempts per transit fetch, at least one.
    pub fn fetch_attempts(&self) -> u32 {
        self.fetch_attempts.max(1)
    }

    /// Return the response language, falling back to Japanese.
    pub fn language(&self) -> &str {
        self.language
            .as_deref()
            .map(str::trim)
            .filter(|language| !language.is_empty())
            .unwrap_or(DEFAULT_LANGUAGE)
    }
}

fn required_credential<'a>(
    value: Option<&'a str>,
    name: &'static str,
) -> Result<&'a str, ConfigError> {
    value
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .ok_or(ConfigError::MissingCredential { name })
}

fn base_url(
    configured: Option<&str>,
    default: &str,
    name: &'static str,
) -> Result<Url, ConfigError> {
    let raw = configured
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .unwrap_or(default);
    let mut url = Url::parse(raw).map_err(|error| ConfigError::InvalidEndpoint {
        name,
        message: error.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidEndpoint {
            name,
            message: format!("{raw} cannot be used as a base URL"),
        });
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
