//! The game search relay endpoint.

use axum::{
    extract::{Query, State},
    Json,
};

use crate::http::response::RelayError;
use crate::http::server::AppState;
use crate::upstream::Payload;

/// Extract the first `search` value from the query string.
///
/// Takes raw pairs rather than a typed struct so that repeated or unknown
/// parameters never cause a rejection.
fn search_term(pairs: &[(String, String)]) -> Option<&str> {
    pairs
        .iter()
        .find(|(name, _)| name == "search")
        .map(|(_, value)| value.as_str())
}

/// `GET /api/games?search=<query>`
///
/// Forwards the search to the upstream with the server credential attached
/// and relays the upstream JSON unchanged.
pub async fn search_games(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Payload>, RelayError> {
    let search = search_term(&pairs);

    tracing::debug!(search = ?search, "Relaying game search");

    let payload = state.upstream.search(search).await?;
    Ok(Json(payload))
}
