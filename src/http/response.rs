//! Mapping relay failures onto client responses.
//!
//! # Responsibilities
//! - Classify what went wrong talking to the upstream
//! - Log the real cause server-side
//! - Send the client one fixed error body regardless of cause
//!
//! # Design Decisions
//! - Upstream status, transport and decode failures are indistinguishable
//!   to the client
//! - The credential never appears in a logged error (URLs are stripped)

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Body sent to the client for every upstream failure.
pub const UPSTREAM_FAILURE_MESSAGE: &str = "Failed to fetch data from external API";

/// Error type for a single relay attempt.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Upstream answered with a non-success status.
    #[error("upstream returned status {0}")]
    UpstreamStatus(StatusCode),

    /// Connection, TLS or body read failure.
    #[error("upstream request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// Upstream body was not a JSON document.
    #[error("upstream body is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<reqwest::Error> for RelayError {
    fn from(err: reqwest::Error) -> Self {
        // reqwest includes the request URL in Display, and that URL carries the key.
        RelayError::Transport(err.without_url())
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: &'static str,
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        match &self {
            RelayError::UpstreamStatus(status) => {
                tracing::warn!(upstream_status = %status, "Upstream rejected request");
            }
            RelayError::Transport(_) | RelayError::Decode(_) => {
                tracing::error!(error = %self, "Upstream request failed");
            }
        }

        let body = Json(ErrorResponse {
            error: UPSTREAM_FAILURE_MESSAGE,
        });
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}
