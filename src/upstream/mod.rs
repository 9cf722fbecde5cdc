//! Upstream game-catalog API.
//!
//! # Data Flow
//! ```text
//! search term (optional)
//!     → client.rs (build <base>/games?key=..&search=.., GET)
//!     → status check, JSON validation
//!     → opaque payload back to the relay handler
//! ```

pub mod client;

pub use client::{games_endpoint, Payload, UpstreamClient, SEARCH_PLACEHOLDER};
