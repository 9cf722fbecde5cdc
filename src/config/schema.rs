//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits so a resolved config can be dumped for
//! debugging; the credential serializes as a redacted placeholder.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::secret::ApiKey;

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (host, port).
    pub listener: ListenerConfig,

    /// Cross-origin policy.
    pub cors: CorsConfig,

    /// Per-IP rate limiting.
    pub rate_limit: RateLimitConfig,

    /// Game-catalog upstream.
    pub upstream: UpstreamConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Interface to bind.
    pub host: String,

    /// TCP port (`PORT`).
    pub port: u16,
}

impl ListenerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

/// Cross-origin policy configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct CorsConfig {
    /// The single browser origin allowed to call the API (`CLIENT_DOMAIN`).
    /// `None` allows every origin.
    pub allowed_origin: Option<String>,
}

/// Rate limiting configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Enable rate limiting.
    pub enabled: bool,

    /// Window length in milliseconds.
    pub window_ms: u64,

    /// Maximum requests per client per window.
    pub max_requests: u32,

    /// Body sent with a 429 response.
    pub message: String,
}

impl RateLimitConfig {
    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            window_ms: 15 * 60 * 1000,
            max_requests: 100,
            message: "Too many requests from this IP, please try again later.".to_string(),
        }
    }
}

/// Upstream game-catalog configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL; the relay appends `/games` (`UPSTREAM_BASE_URL`).
    pub base_url: String,

    /// Server-held credential (`API_KEY`).
    pub api_key: ApiKey,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.rawg.io/api".to_string(),
            api_key: ApiKey::default(),
        }
    }
}
