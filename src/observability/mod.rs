//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events with structured fields
//!     → logging.rs (registry + EnvFilter + fmt layer)
//!     → stdout
//! ```
//!
//! Per-request spans come from `tower_http::trace::TraceLayer` in the server.

pub mod logging;
