//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the relay handler
//! - Wire up middleware (trace, CORS, rate limit)
//! - Load config and bind the listener, in that order
//! - Run the rate-limit sweeper alongside the server

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{http::StatusCode, middleware, routing::get, Router};
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::config::{ConfigError, GatewayConfig};
use crate::http::relay::search_games;
use crate::security::{cors_layer, rate_limit_middleware, RateLimiter};
use crate::upstream::UpstreamClient;

/// Application state injected into handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    pub upstream: UpstreamClient,
}

/// Error type for bringing the gateway up.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
}

/// HTTP server for the gateway.
pub struct GatewayServer {
    router: Router,
    config: GatewayConfig,
    limiter: Arc<RateLimiter>,
}

impl GatewayServer {
    /// Create a new server with the given configuration.
    pub fn new(config: GatewayConfig) -> Result<Self, ConfigError> {
        let upstream = UpstreamClient::new(&config.upstream)?;
        let limiter = Arc::new(RateLimiter::new(&config.rate_limit));

        tracing::info!(
            upstream = %upstream.endpoint(),
            allowed_origin = config.cors.allowed_origin.as_deref().unwrap_or("*"),
            rate_limit_enabled = config.rate_limit.enabled,
            rate_limit_max = config.rate_limit.max_requests,
            rate_limit_window_ms = config.rate_limit.window_ms,
            "Gateway configured"
        );

        let state = AppState { upstream };
        let router = Self::build_router(&config, state, limiter.clone());
        Ok(Self {
            router,
            config,
            limiter,
        })
    }

    /// Load configuration from `lookup`, then bind the configured port.
    ///
    /// Configuration errors return before any socket is opened.
    pub async fn bind<F>(lookup: F) -> Result<(Self, TcpListener), StartupError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = GatewayConfig::from_lookup(lookup)?;
        let address = config.listener.bind_address();
        let server = Self::new(config)?;

        let listener = TcpListener::bind(&address)
            .await
            .map_err(|source| StartupError::Bind {
                address: address.clone(),
                source,
            })?;
        let port = listener
            .local_addr()
            .map_err(|source| StartupError::Bind { address, source })?
            .port();

        tracing::info!("Server is running on port {}", port);
        Ok((server, listener))
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Layers run outermost-last: trace → CORS → rate limit → handler.
    fn build_router(config: &GatewayConfig, state: AppState, limiter: Arc<RateLimiter>) -> Router {
        let mut router = Router::new()
            .route("/api/games", get(search_games))
            .fallback(not_found)
            .with_state(state);

        if config.rate_limit.enabled {
            router = router.layer(middleware::from_fn_with_state(limiter, rate_limit_middleware));
        }

        router
            .layer(cors_layer(&config.cors))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server until `shutdown` resolves.
    pub async fn run<F>(self, listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let sweeper = self
            .config
            .rate_limit
            .enabled
            .then(|| self.limiter.spawn_sweeper());

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();
        let result = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await;

        if let Some(sweeper) = sweeper {
            sweeper.abort();
        }

        tracing::info!("HTTP server stopped");
        result
    }
}

async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}

/// Wait for Ctrl+C.
pub async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => {
            // Without a signal handler the server simply runs until killed.
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    }
}
