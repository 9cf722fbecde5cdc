//! Cross-origin policy.

use axum::http::{header, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::CorsConfig;

/// Build the CORS layer.
///
/// With an allowed origin configured only that origin is echoed back in
/// `Access-Control-Allow-Origin`; otherwise every origin gets `*`. Preflight
/// requests are answered by the layer itself.
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let allow_origin = match config.allowed_origin.as_deref() {
        Some(origin) => match HeaderValue::from_str(origin) {
            Ok(value) => AllowOrigin::list([value]),
            Err(e) => {
                // An origin that cannot be a header value can never match a request.
                tracing::warn!(origin = %origin, error = %e, "Ignoring unusable CLIENT_DOMAIN");
                AllowOrigin::list(Vec::<HeaderValue>::new())
            }
        },
        None => AllowOrigin::any(),
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::PUT,
            Method::PATCH,
            Method::POST,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}
