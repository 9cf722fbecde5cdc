//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! .env file (optional, dotenvy, applied in main)
//!     → process environment
//!     → loader.rs (read API_KEY, CLIENT_DOMAIN, PORT, UPSTREAM_BASE_URL)
//!     → GatewayConfig (validated, immutable)
//!     → handed to GatewayServer at startup
//! ```
//!
//! # Design Decisions
//! - Config is read once; there is no reload
//! - Every section has defaults so tests can build configs directly
//! - A missing credential is fatal before any socket is bound

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::ConfigError;
pub use schema::{CorsConfig, GatewayConfig, ListenerConfig, RateLimitConfig, UpstreamConfig};
pub use secret::ApiKey;
