//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → cors.rs (origin check, preflight, allow headers)
//!     → rate_limit.rs (per-IP fixed window)
//!     → Pass to relay handler
//! ```
//!
//! # Design Decisions
//! - CORS runs outermost so preflights never consume rate-limit budget
//! - Rate-limit state is an explicit struct injected as middleware state

pub mod cors;
pub mod rate_limit;

pub use cors::cors_layer;
pub use rate_limit::{rate_limit_middleware, Decision, RateLimiter};
