//! Game search gateway library.

pub mod config;
pub mod http;
pub mod observability;
pub mod security;
pub mod upstream;

pub use config::schema::GatewayConfig;
pub use http::GatewayServer;
