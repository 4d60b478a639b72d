//! Client configuration.
//!
//! A `Config` is built once and never mutated; every request reads the API
//! key, base URL and default list from it.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::classify::ResponseFormat;
use crate::error::ConfigError;

pub const ENV_API_KEY: &str = "SENDY_API_KEY";
pub const ENV_URL: &str = "SENDY_URL";
pub const ENV_LIST_ID: &str = "SENDY_LIST_ID";
pub const ENV_TRANSPORT: &str = "SENDY_TRANSPORT";
pub const ENV_RESPONSE_FORMAT: &str = "SENDY_RESPONSE_FORMAT";

/// Which `Transport` implementation executes requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportMode {
    /// Full HTTP client: request timeout and bounded redirect following.
    #[default]
    DirectHttp,
    /// Bare curl-style POST: no timeout, redirects are not followed.
    LegacyCurlLike,
}

impl FromStr for TransportMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "direct" | "direct_http" => Ok(TransportMode::DirectHttp),
            "curl" | "legacy_curl_like" => Ok(TransportMode::LegacyCurlLike),
            other => Err(ConfigError::InvalidTransportMode(other.to_string())),
        }
    }
}

impl TransportMode {
    /// Options used when the config does not set any.
    pub fn default_options(self) -> TransportOptions {
        match self {
            TransportMode::DirectHttp => TransportOptions::default(),
            TransportMode::LegacyCurlLike => TransportOptions::CURL,
        }
    }
}

/// Timeout and redirect policy handed to the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportOptions {
    pub timeout: Option<Duration>,
    pub max_redirects: u32,
}

impl TransportOptions {
    /// What a bare curl POST does: wait forever, never follow a redirect.
    pub const CURL: TransportOptions = TransportOptions {
        timeout: None,
        max_redirects: 0,
    };
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(45)),
            max_redirects: 5,
        }
    }
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub api_key: String,
    pub base_url: String,
    #[serde(default)]
    pub default_list_id: Option<String>,
    #[serde(default)]
    pub transport_mode: TransportMode,
    #[serde(default)]
    pub response_format: ResponseFormat,
    /// `None` means the defaults of `transport_mode`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transport_options: Option<TransportOptions>,
}

impl Config {
    /// A trailing `/` on `base_url` is dropped so paths join cleanly.
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            api_key: api_key.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
            default_list_id: None,
            transport_mode: TransportMode::default(),
            response_format: ResponseFormat::default(),
            transport_options: None,
        }
    }

    pub fn with_default_list(mut self, list_id: impl Into<String>) -> Self {
        self.default_list_id = Some(list_id.into());
        self
    }

    pub fn with_transport_mode(mut self, mode: TransportMode) -> Self {
        self.transport_mode = mode;
        self
    }

    pub fn with_response_format(mut self, format: ResponseFormat) -> Self {
        self.response_format = format;
        self
    }

    /// Override the mode's default options, whichever order the `with_*`
    /// calls come in.
    pub fn with_transport_options(mut self, options: TransportOptions) -> Self {
        self.transport_options = Some(options);
        self
    }

    /// The options the transport is built with.
    pub fn transport_options(&self) -> TransportOptions {
        self.transport_options
            .unwrap_or_else(|| self.transport_mode.default_options())
    }

    /// Read the configuration from `SENDY_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let api_key = non_empty(ENV_API_KEY).ok_or(ConfigError::Missing(ENV_API_KEY))?;
        let base_url = non_empty(ENV_URL).ok_or(ConfigError::Missing(ENV_URL))?;
        let mut config = Config::new(api_key, base_url);

        if let Some(list_id) = non_empty(ENV_LIST_ID) {
            config = config.with_default_list(list_id);
        }
        if let Some(mode) = non_empty(ENV_TRANSPORT) {
            config = config.with_transport_mode(mode.parse()?);
        }
        if let Some(format) = non_empty(ENV_RESPONSE_FORMAT) {
            config = config.with_response_format(format.parse()?);
        }
        Ok(config)
    }
}

// The API key stays out of Debug output so configs can be logged.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("default_list_id", &self.default_list_id)
            .field("transport_mode", &self.transport_mode)
            .field("response_format", &self.response_format)
            .field("transport_options", &self.transport_options())
            .finish()
    }
}
