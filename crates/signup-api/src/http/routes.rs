//! HTTP route definitions.

use std::any::Any;
use std::sync::Arc;

use axum::{
    http::{HeaderValue, Method},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, warn};

use signup_config::CorsConfig;

use crate::error::ApiError;
use crate::http::handlers::submit_signup;
use crate::http::monitoring;
use crate::state::AppState;

/// Create the router.
///
/// ```text
/// POST /signup  - Validate and relay a signup
/// GET  /health  - Version, uptime, request count and relay mode
/// GET  /livez   - Liveness probe
/// ```
pub fn create_router(state: Arc<AppState>, cors: &CorsConfig) -> Router {
    let api_routes = Router::new()
        .route("/signup", post(submit_signup))
        .route("/health", get(monitoring::health_check))
        .with_state(state);

    // Liveness probe has no state dependency
    let liveness_route = Router::new().route("/livez", get(monitoring::liveness_probe));

    let router = Router::new()
        .merge(api_routes)
        .merge(liveness_route)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http());

    if cors.enabled {
        router.layer(cors_layer(cors))
    } else {
        router
    }
}

/// Build the CORS policy.
///
/// An empty origin list mirrors the caller's origin; credentials are allowed
/// either way.
pub fn cors_layer(cors: &CorsConfig) -> CorsLayer {
    let origins = if cors.allowed_origins.is_empty() {
        AllowOrigin::mirror_request()
    } else {
        let list: Vec<HeaderValue> = cors
            .allowed_origins
            .iter()
            .filter_map(|origin| match origin.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!("Ignoring invalid CORS origin: {}", origin);
                    None
                }
            })
            .collect();
        AllowOrigin::list(list)
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(AllowMethods::list([Method::GET, Method::POST, Method::OPTIONS]))
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    error!("Handler panicked: {}", detail);
    ApiError::Internal(detail).into_response()
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;
