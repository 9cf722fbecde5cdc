//! Configuration loading from the process environment.

use thiserror::Error;

use crate::config::schema::GatewayConfig;
use crate::config::secret::ApiKey;
use crate::upstream::games_endpoint;

pub const ENV_API_KEY: &str = "API_KEY";
pub const ENV_CLIENT_DOMAIN: &str = "CLIENT_DOMAIN";
pub const ENV_PORT: &str = "PORT";
pub const ENV_UPSTREAM_BASE_URL: &str = "UPSTREAM_BASE_URL";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("API key not found in environment variables.")]
    MissingApiKey,

    #[error("invalid PORT value {value:?}: {source}")]
    InvalidPort {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    #[error("invalid UPSTREAM_BASE_URL value {value:?}: {source}")]
    InvalidUpstreamUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
}

impl GatewayConfig {
    /// Build configuration from a variable lookup.
    ///
    /// `main` passes `std::env::var` after applying any `.env` file.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = GatewayConfig::default();

        let api_key = lookup(ENV_API_KEY)
            .map(ApiKey::new)
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;
        config.upstream.api_key = api_key;

        config.cors.allowed_origin = lookup(ENV_CLIENT_DOMAIN).filter(|origin| !origin.is_empty());

        if let Some(value) = lookup(ENV_PORT).filter(|v| !v.is_empty()) {
            config.listener.port = value
                .trim()
                .parse()
                .map_err(|source| ConfigError::InvalidPort { value, source })?;
        }

        if let Some(value) = lookup(ENV_UPSTREAM_BASE_URL).filter(|v| !v.is_empty()) {
            games_endpoint(&value).map_err(|source| ConfigError::InvalidUpstreamUrl {
                value: value.clone(),
                source,
            })?;
            config.upstream.base_url = value;
        }

        Ok(config)
    }
}
