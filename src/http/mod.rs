//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware chain)
//!     → relay.rs (read `search`, call upstream)
//!     → response.rs (map upstream failure to fixed 500)
//!     → Send to client
//! ```

pub mod relay;
pub mod response;
pub mod server;

pub use response::{RelayError, UPSTREAM_FAILURE_MESSAGE};
pub use server::{shutdown_signal, AppState, GatewayServer, StartupError};
