//! Game Search Gateway
//!
//! Relays game searches from browser clients to the RAWG catalog API while
//! keeping the API key on the server.
//!
//! # Architecture Overview
//!
//! ```text
//!                       ┌───────────────────────────────────────────────┐
//!                       │                   GATEWAY                     │
//!   Client Request      │  ┌──────┐   ┌────────────┐   ┌────────────┐  │
//!   ────────────────────┼─▶│ CORS │──▶│ rate limit │──▶│   relay    │──┼──▶ RAWG API
//!                       │  └──────┘   └────────────┘   │  handler   │  │  (key injected)
//!   Client Response     │                              │            │  │
//!   ◀───────────────────┼──────────────────────────────│  response  │◀─┼──
//!                       │                              │  mapping   │  │
//!                       │                              └────────────┘  │
//!                       └───────────────────────────────────────────────┘
//! ```

use games_gateway::http::{shutdown_signal, GatewayServer};
use games_gateway::observability::logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Variables already set in the environment win over .env entries.
    let dotenv = dotenvy::dotenv();
    logging::init();
    if let Ok(path) = &dotenv {
        tracing::debug!(path = %path.display(), "Loaded .env file");
    }

    tracing::info!("games-gateway v{} starting", env!("CARGO_PKG_VERSION"));

    // Nothing is bound until the credential is known to be present.
    let (server, listener) = GatewayServer::bind(|name| std::env::var(name).ok())
        .await
        .inspect_err(|e| {
            tracing::error!(error = %e, "Startup failed");
        })?;

    server.run(listener, shutdown_signal()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
