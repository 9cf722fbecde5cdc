//! HTTP client for the game-catalog API.

use axum::http::header;
use serde_json::value::RawValue;
use url::Url;

use crate::config::{ApiKey, ConfigError, UpstreamConfig};
use crate::http::response::RelayError;

/// Path segment appended to the configured base URL.
pub const GAMES_PATH: &str = "games";

/// Value sent as `search` when the client omitted it.
pub const SEARCH_PLACEHOLDER: &str = "undefined";

/// Opaque JSON document returned by the upstream.
pub type Payload = Box<RawValue>;

/// Resolve `<base>/games`, keeping any path already on the base.
pub fn games_endpoint(base_url: &str) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(base_url)?;
    url.path_segments_mut()
        .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
        .pop_if_empty()
        .push(GAMES_PATH);
    url.set_query(None);
    Ok(url)
}

/// Client for the game search endpoint.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    games_url: Url,
    api_key: ApiKey,
}

impl UpstreamClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self, ConfigError> {
        let games_url =
            games_endpoint(&config.base_url).map_err(|source| ConfigError::InvalidUpstreamUrl {
                value: config.base_url.clone(),
                source,
            })?;

        Ok(Self {
            http: reqwest::Client::new(),
            games_url,
            api_key: config.api_key.clone(),
        })
    }

    /// The search URL for `search`, credential included.
    ///
    /// Both parameters are percent-encoded, so a search term cannot inject
    /// extra query parameters.
    pub fn search_url(&self, search: Option<&str>) -> Url {
        let mut url = self.games_url.clone();
        url.query_pairs_mut()
            .append_pair("key", self.api_key.expose())
            .append_pair("search", search.unwrap_or(SEARCH_PLACEHOLDER));
        url
    }

    /// Run one search against the upstream. No retries.
    pub async fn search(&self, search: Option<&str>) -> Result<Payload, RelayError> {
        let response = self
            .http
            .get(self.search_url(search))
            .header(header::CONTENT_TYPE, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RelayError::UpstreamStatus(status));
        }

        let body = response.bytes().await?;
        let payload: Payload = serde_json::from_slice(&body)?;

        tracing::debug!(
            upstream_status = %status,
            bytes = body.len(),
            "Upstream search succeeded"
        );
        Ok(payload)
    }

    /// Upstream endpoint without credentials, safe to log.
    pub fn endpoint(&self) -> &Url {
        &self.games_url
    }
}

impl std::fmt::Debug for UpstreamClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamClient")
            .field("games_url", &self.games_url.as_str())
            .field("api_key", &self.api_key)
            .finish()
    }
}
